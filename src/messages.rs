use crate::backend::ai_backend::{Generation, GenerationError};
use chrono::{DateTime, Utc};

/// Response messages from background operations
pub enum ResponseMessage {
    Generated {
        request_id: u64,
        result: Result<Generation, GenerationError>,
    },
    ProjectSaved(Result<(String, DateTime<Utc>), String>), // (project id, saved at), error
}
