use std::sync::Arc;

use axum::{extract::State, Json};

use crate::features::case_tickets::workers::PgCaseSyncWorker;
use crate::shared::types::{ApiResponse, JobTriggerResponse};

/// Trigger one case-ticket synchronization batch.
///
/// The batch runs in the background; this endpoint acknowledges
/// immediately. Outcomes are observable via logs and the persisted ticket
/// references.
#[utoipa::path(
    post,
    path = "/api/jobs/case-tickets/run",
    responses(
        (status = 200, description = "Batch accepted or already running", body = ApiResponse<JobTriggerResponse>),
    ),
    tag = "jobs"
)]
pub async fn run_case_ticket_sync(
    State(worker): State<Arc<PgCaseSyncWorker>>,
) -> Json<ApiResponse<JobTriggerResponse>> {
    let accepted = worker.spawn_batch();

    let message = if accepted {
        "Case ticket synchronization started; see logs for progress"
    } else {
        "Case ticket synchronization is already running"
    };

    Json(ApiResponse::success(
        Some(JobTriggerResponse {
            job: "case-tickets".to_string(),
            accepted,
        }),
        Some(message.to_string()),
    ))
}
