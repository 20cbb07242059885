//! Error types for the content layer

use core_runtime::ApiError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a fetch could not produce live records.
///
/// `Display` is the message stored in `FetchState::error_message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The body carried `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// No known envelope matched the body.
    #[error("Unexpected response format from {resource} endpoint")]
    UnrecognizedEnvelope { resource: &'static str },

    /// The envelope matched but held no records.
    #[error("No {resource} found in API response")]
    Empty { resource: &'static str },

    /// Every record failed to decode or transform.
    #[error("No valid {resource} found in API response")]
    NoValidRecords { resource: &'static str },

    /// A single record could not be decoded.
    #[error("Invalid {resource} record: {message}")]
    InvalidRecord {
        resource: &'static str,
        message: String,
    },

    /// A single record lacks a field the view model cannot do without.
    #[error("{resource} record is missing required field '{field}'")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Coarse classification of a failed fetch, exposed alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The feature switch is off. A configured mode, not an outage.
    Disabled,
    Timeout,
    Transport,
    Http,
    /// The response parsed but held no usable records.
    Shape,
}

impl From<&ContentError> for FailureKind {
    fn from(error: &ContentError) -> Self {
        match error {
            ContentError::Api(ApiError::Disabled) => FailureKind::Disabled,
            ContentError::Api(ApiError::Timeout) => FailureKind::Timeout,
            ContentError::Api(ApiError::Transport(_)) => FailureKind::Transport,
            ContentError::Api(ApiError::Http { .. }) => FailureKind::Http,
            ContentError::Api(ApiError::Shape(_))
            | ContentError::Rejected(_)
            | ContentError::UnrecognizedEnvelope { .. }
            | ContentError::Empty { .. }
            | ContentError::NoValidRecords { .. }
            | ContentError::InvalidRecord { .. }
            | ContentError::MissingField { .. } => FailureKind::Shape,
        }
    }
}

impl ContentError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::from(self)
    }

    /// Whether this is the configured offline mode rather than a failure.
    pub fn is_disabled(&self) -> bool {
        matches!(self, ContentError::Api(ApiError::Disabled))
    }
}
