use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::case_tickets::handlers;
use crate::features::case_tickets::workers::PgCaseSyncWorker;

/// Create routes for the case-ticket sync job trigger
pub fn routes(worker: Arc<PgCaseSyncWorker>) -> Router {
    Router::new()
        .route(
            "/api/jobs/case-tickets/run",
            post(handlers::run_case_ticket_sync),
        )
        .with_state(worker)
}
