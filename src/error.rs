use thiserror::Error;

/// Unified error type for nsv operations
#[derive(Error, Debug)]
pub enum NsvError {
    #[error("Invalid tag format: {0}")]
    InvalidTagFormat(String),

    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in nsv
pub type Result<T> = std::result::Result<T, NsvError>;

impl NsvError {
    /// Create a tag format error for the offending tag
    pub fn tag(msg: impl Into<String>) -> Self {
        NsvError::InvalidTagFormat(msg.into())
    }

    /// Create a template format error
    pub fn format(msg: impl Into<String>) -> Self {
        NsvError::InvalidFormat(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        NsvError::Config(msg.into())
    }
}
