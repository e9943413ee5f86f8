use crate::format::FormatTag;
use std::time::Duration;
use thiserror::Error;

/// Central error type for the Nexus pipeline system
#[derive(Error, Debug)]
pub enum NexusError {
    // ============================================================================
    // Stage Errors
    // ============================================================================
    #[error("Empty payload received")]
    EmptyPayload,

    #[error("Invalid payload format: {0}")]
    InvalidFormat(String),

    // ============================================================================
    // Routing Errors
    // ============================================================================
    #[error("No pipeline registered for format '{0}'")]
    Routing(FormatTag),

    // ============================================================================
    // Execution Errors
    // ============================================================================
    #[error("Stage '{stage}' exceeded its deadline of {deadline:?}")]
    DeadlineExceeded { stage: String, deadline: Duration },

    #[error("Pipeline '{pipeline}' cancelled")]
    Cancelled { pipeline: String },
}

// Implement conversion to String for embedding callers
impl From<NexusError> for String {
    fn from(error: NexusError) -> Self {
        error.to_string()
    }
}

// Helper type alias for Results
pub type NexusResult<T> = Result<T, NexusError>;
