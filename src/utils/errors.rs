use thiserror::Error;

/// Main error type for Dormlink
#[derive(Error, Debug)]
pub enum DormError {
    /// No HTTP response was received at all (DNS, connect, timeout, reset)
    #[error("Network unreachable: {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DormError {
    /// True for the transport failure class, false for everything else
    pub fn is_transport(&self) -> bool {
        matches!(self, DormError::Unreachable { .. })
    }
}

pub type Result<T> = std::result::Result<T, DormError>;
