use std::sync::Arc;

use axum::{extract::State, Json};

use crate::features::order_changes::workers::PgOrderSyncWorker;
use crate::shared::types::{ApiResponse, JobTriggerResponse};

/// Trigger one order-change synchronization batch.
///
/// The batch runs in the background; this endpoint acknowledges
/// immediately. Outcomes are observable via logs and the persisted ticket
/// references.
#[utoipa::path(
    post,
    path = "/api/jobs/order-changes/run",
    responses(
        (status = 200, description = "Batch accepted or already running", body = ApiResponse<JobTriggerResponse>),
    ),
    tag = "jobs"
)]
pub async fn run_order_change_sync(
    State(worker): State<Arc<PgOrderSyncWorker>>,
) -> Json<ApiResponse<JobTriggerResponse>> {
    let accepted = worker.spawn_batch();

    let message = if accepted {
        "Order change synchronization started; see logs for progress"
    } else {
        "Order change synchronization is already running"
    };

    Json(ApiResponse::success(
        Some(JobTriggerResponse {
            job: "order-changes".to_string(),
            accepted,
        }),
        Some(message.to_string()),
    ))
}
