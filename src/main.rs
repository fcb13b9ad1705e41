mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::case_tickets::{
    routes as case_tickets_routes, CaseSyncWorker, CaseTicketRequestBuilder, CaseTicketService,
};
use crate::features::order_changes::{
    routes as order_changes_routes, OrderRequestBuilder, OrderService, OrderSyncWorker,
};
use crate::modules::zendesk::{TagResolver, ZendeskClient};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pools: CRM for reads, BR for write-backs
    let crm_pool = database::create_crm_pool(&config.database).await?;
    let br_pool = database::create_br_pool(&config.database).await?;
    tracing::info!("Database connection pools created");

    // Build the immutable tag resolver once and share it
    let zendesk_config = Arc::new(config.zendesk.clone());
    let tag_resolver = Arc::new(TagResolver::from_config(&config.zendesk));
    tracing::info!("Tag resolver initialized");

    // Zendesk client shared by both workers
    let zendesk_client = Arc::new(ZendeskClient::new(&config.zendesk));
    tracing::info!("Zendesk client initialized for {}", config.zendesk.base_url);

    // Case ticket sync worker
    let case_ticket_service = Arc::new(CaseTicketService::new(crm_pool.clone(), br_pool.clone()));
    let case_sync_worker = Arc::new(CaseSyncWorker::new(
        case_ticket_service,
        Arc::clone(&zendesk_client),
        CaseTicketRequestBuilder::new(Arc::clone(&zendesk_config), Arc::clone(&tag_resolver)),
        config.case_job.clone(),
    ));
    tracing::info!("Case ticket sync worker initialized");

    // Order change sync worker
    let order_service = Arc::new(OrderService::new(crm_pool.clone(), br_pool.clone()));
    let order_sync_worker = Arc::new(OrderSyncWorker::new(
        order_service,
        Arc::clone(&zendesk_client),
        OrderRequestBuilder::new(Arc::clone(&zendesk_config), Arc::clone(&tag_resolver)),
        config.order_job.clone(),
    ));
    tracing::info!("Order change sync worker initialized");

    // Cooperative shutdown signal for the polling loops
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    if config.case_job.enabled {
        let worker = Arc::clone(&case_sync_worker);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            worker.run(shutdown).await;
        });
        tracing::info!("Case ticket sync worker spawned");
    } else {
        tracing::info!("Case ticket sync timer disabled by configuration");
    }

    if config.order_job.enabled {
        let worker = Arc::clone(&order_sync_worker);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            worker.run(shutdown).await;
        });
        tracing::info!("Order change sync worker spawned");
    } else {
        tracing::info!("Order change sync timer disabled by configuration");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(case_tickets_routes::routes(Arc::clone(&case_sync_worker)))
        .merge(order_changes_routes::routes(Arc::clone(&order_sync_worker)))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    Ok(())
}
