//! Visitor form submissions
//!
//! Contact messages and suggestions are writes, so there is nothing to fall
//! back to: failures are returned to the caller as [`ApiError`].

use core_runtime::events::{CoreEvent, EventBus, SubmissionEvent};
use core_runtime::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmissionService {
    api: ApiClient,
    event_bus: EventBus,
}

impl SubmissionService {
    pub fn new(api: ApiClient, event_bus: EventBus) -> Self {
        Self { api, event_bus }
    }

    /// `POST /contact`
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        let path = self.api.config().endpoints.contact.clone();
        self.submit("contact", &path, message).await
    }

    /// `POST /suggestions`
    pub async fn submit_suggestion(&self, suggestion: &Suggestion) -> Result<(), ApiError> {
        let path = self.api.config().endpoints.suggestions.clone();
        self.submit("suggestion", &path, suggestion).await
    }

    #[instrument(skip(self, path, body))]
    async fn submit<T: Serialize + Sync>(
        &self,
        form: &'static str,
        path: &str,
        body: &T,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .post_json(path, body)
            .await
            .and_then(|body| check_accepted(&body));

        let event = match &result {
            Ok(()) => {
                info!("Form submitted");
                SubmissionEvent::Sent {
                    form: form.to_string(),
                }
            }
            Err(error) => {
                warn!(error = %error, "Form submission failed");
                SubmissionEvent::Failed {
                    form: form.to_string(),
                    message: error.to_string(),
                }
            }
        };
        let _ = self.event_bus.emit(CoreEvent::Submission(event));

        result
    }
}

/// A 2xx answer can still carry `success: false`.
pub(crate) fn check_accepted(body: &Value) -> Result<(), ApiError> {
    if body.get("success") != Some(&Value::Bool(false)) {
        return Ok(());
    }

    let message = ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("Request was rejected");
    Err(ApiError::Shape(message.to_string()))
}
