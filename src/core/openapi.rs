use utoipa::{Modify, OpenApi};

use crate::features::case_tickets::handlers as case_handlers;
use crate::features::order_changes::handlers as order_handlers;
use crate::shared::types::{ApiResponse, JobTriggerResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        case_handlers::run_case_ticket_sync,
        order_handlers::run_order_change_sync,
    ),
    components(schemas(JobTriggerResponse, ApiResponse<JobTriggerResponse>,)),
    tags(
        (name = "jobs", description = "Zendesk synchronization job triggers"),
    ),
    info(
        title = "Casebridge API",
        version = "0.1.0",
        description = "Support case and order change synchronization to Zendesk",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
