//! Error types for plan building and workflow stores
//!
//! A missing workflow is not an error: store lookups and plan builds return
//! `Ok(None)` for it. These variants cover failures of the store itself.

/// Plan and store errors
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::IoError(err.to_string())
    }
}

/// Result type for plan and store operations
pub type PlanResult<T> = Result<T, PlanError>;
