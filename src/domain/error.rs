use thiserror::Error;

/// Outcomes the handlers dispatch on. Matching on the variant replaces the
/// original's error type inspection.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("todo not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl From<sqlx::Error> for TodoError {
    fn from(e: sqlx::Error) -> Self {
        TodoError::Storage(e.into())
    }
}
