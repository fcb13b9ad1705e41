use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

/// Acknowledgement returned by the job trigger endpoints. The batch runs in
/// the background; success or failure is only observable via logs and the
/// persisted ticket references.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobTriggerResponse {
    pub job: String,
    pub accepted: bool,
}

/// Synchronization progress marker persisted on source records.
///
/// Submitting is written before the remote call so that a crash mid-call is
/// distinguishable from a record that was never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    NotProcessed,
    Processed,
    Submitting,
}

impl ProcessStatus {
    pub fn code(self) -> i32 {
        match self {
            ProcessStatus::NotProcessed => 0,
            ProcessStatus::Processed => 1,
            ProcessStatus::Submitting => 2,
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessStatus::NotProcessed => write!(f, "not processed"),
            ProcessStatus::Processed => write!(f, "processed"),
            ProcessStatus::Submitting => write!(f, "submitting"),
        }
    }
}
