use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the turn pipeline. Only the Safety Guard is allowed to
/// short-circuit into a terminal envelope directly; every other stage returns a
/// value, never a panic, even on degenerate input. This enum is what the
/// orchestrator maps onto an ERROR envelope at the boundary.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("empty input: user_message and answer were both absent")]
    EmptyInput,

    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error("session {0} is already complete")]
    SessionComplete(Uuid),

    #[error("session {0} update conflicted after retry")]
    SessionConflict(Uuid),

    #[error("reference data missing or invalid: {0}")]
    ReferenceDataMissing(String),

    #[error("turn deadline exceeded")]
    DeadlineExceeded,

    #[error("downstream store failure: {0}")]
    DownstreamFailure(String),
}

impl TriageError {
    /// Stable machine-readable code surfaced in the ERROR envelope payload.
    pub fn code(&self) -> &'static str {
        match self {
            TriageError::EmptyInput => "EMPTY_INPUT",
            TriageError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            TriageError::SessionComplete(_) => "SESSION_COMPLETE",
            TriageError::SessionConflict(_) => "SESSION_CONFLICT",
            TriageError::ReferenceDataMissing(_) => "REFERENCE_DATA_MISSING",
            TriageError::DeadlineExceeded => "DEADLINE_EXCEEDED",
            TriageError::DownstreamFailure(_) => "DOWNSTREAM_FAILURE",
        }
    }

    /// Whether a caller may usefully retry the same turn unchanged.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            TriageError::EmptyInput
                | TriageError::SessionConflict(_)
                | TriageError::DeadlineExceeded
                | TriageError::DownstreamFailure(_)
        )
    }
}
