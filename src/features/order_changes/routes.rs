use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::order_changes::handlers;
use crate::features::order_changes::workers::PgOrderSyncWorker;

/// Create routes for the order-change sync job trigger
pub fn routes(worker: Arc<PgOrderSyncWorker>) -> Router {
    Router::new()
        .route(
            "/api/jobs/order-changes/run",
            post(handlers::run_order_change_sync),
        )
        .with_state(worker)
}
