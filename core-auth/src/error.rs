use core_runtime::ApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Demo login is not configured")]
    DemoUnavailable,

    #[error("Unexpected login response: {0}")]
    MalformedResponse(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Whether retrying the same credentials could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AuthError::Api(ApiError::Timeout) | AuthError::Api(ApiError::Transport(_)) => true,
            AuthError::Api(ApiError::Http { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
