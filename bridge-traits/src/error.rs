use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),
}

impl BridgeError {
    /// Whether the failure was caused by the request deadline elapsing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
