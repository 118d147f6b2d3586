/// Core errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}
