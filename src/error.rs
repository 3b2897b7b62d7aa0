use thiserror::Error;

/// Failures callers are expected to match on. Everything else travels as
/// `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("an anime name is required to {0}")]
    MissingName(&'static str),

    #[error("no scheduled anime with id {0}")]
    NotFound(String),

    #[error("catalog request failed with status {status}")]
    Catalog { status: u16 },
}

impl AppError {
    /// Whether a catalog failure is worth another attempt (rate limit or server error).
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Catalog { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
