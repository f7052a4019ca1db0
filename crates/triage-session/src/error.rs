use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("session store backend error: {0}")]
    Backend(String),
    #[error("session state serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
