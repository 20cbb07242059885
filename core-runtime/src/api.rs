//! # API Call Layer
//!
//! One function for every backend request the site makes: it checks the
//! feature switch, attaches JSON headers and the admin bearer token, enforces
//! the request deadline and turns every failure into an [`ApiError`].
//!
//! Requests are attempted exactly once. Callers that can degrade (the content
//! fetchers) fall back to static data instead of retrying.

use crate::config::{ApiConfig, SiteConfig};
use async_trait::async_trait;
use bridge_traits::{BridgeError, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failure of a single API call.
///
/// `Display` yields the user-facing message stored in fetch state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The feature switch is off; no request was made.
    #[error("API calls disabled - using fallback data")]
    Disabled,

    /// The request deadline elapsed.
    #[error("Request timeout - API took too long to respond")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The response body was not what the caller expected.
    #[error("{0}")]
    Shape(String),
}

impl ApiError {
    /// Short machine-readable classification, used in logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Disabled => "disabled",
            ApiError::Timeout => "timeout",
            ApiError::Http { .. } => "http",
            ApiError::Transport(_) => "network",
            ApiError::Shape(_) => "shape",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<BridgeError> for ApiError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Timeout(_) => ApiError::Timeout,
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Supplies the bearer token attached to outgoing requests.
///
/// The admin session implements this; anonymous visitors have no token and
/// requests go out without an `Authorization` header.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Client for the site's REST backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    config: Arc<ApiConfig>,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            config: Arc::new(config),
            tokens: None,
        }
    }

    pub fn from_site_config(config: &SiteConfig) -> Self {
        Self::new(config.api.clone(), Arc::clone(&config.http_client))
    }

    /// Attaches a bearer token provider to every request.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Whether the feature switch allows live requests.
    pub fn is_enabled(&self) -> bool {
        self.config.use_api
    }

    /// `GET` a path relative to the base URL and parse the JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Get, path, None).await
    }

    /// `POST` a JSON body to a path relative to the base URL.
    pub async fn post_json<T>(&self, path: &str, body: &T) -> Result<Value, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.call(HttpMethod::Post, path, Some(body)).await
    }

    /// `POST` without a body, as used by view and download tracking.
    pub async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Post, path, None).await
    }

    /// `PUT` a JSON body, replacing fields of an existing record.
    pub async fn put_json<T>(&self, path: &str, body: &T) -> Result<Value, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.call(HttpMethod::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Delete, path, None).await
    }

    #[instrument(skip(self, method, body), fields(method = %method))]
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Value, ApiError> {
        if !self.config.use_api {
            debug!("API disabled, request not sent");
            return Err(ApiError::Disabled);
        }

        let url = self.config.url(path);
        let deadline = self.config.request_timeout;

        let mut request = HttpRequest::new(method, url)
            .header("Content-Type", "application/json")
            .timeout(deadline);
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(tokens) = &self.tokens {
            if let Some(token) = tokens.bearer_token().await {
                request = request.bearer_token(token);
            }
        }

        debug!(url = %request.url, "Sending API request");

        let response = match tokio::time::timeout(deadline, self.http.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                let error = ApiError::from(error);
                warn!(kind = error.kind(), error = %error, "API request failed");
                return Err(error);
            }
            Err(_) => {
                warn!(timeout_ms = deadline.as_millis() as u64, "API request timed out");
                return Err(ApiError::Timeout);
            }
        };

        if !response.is_success() {
            let error = ApiError::Http {
                status: response.status,
                message: error_message(&response),
            };
            warn!(status = response.status, error = %error, "API returned error status");
            return Err(error);
        }

        parse_body(&response)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_token_source", &self.tokens.is_some())
            .finish()
    }
}

/// Message for a non-2xx response: body `message`, then body `error`, then
/// the status line.
fn error_message(response: &HttpResponse) -> String {
    let from_body = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            ["message", "error"].iter().find_map(|key| {
                body.get(key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
            })
        });

    from_body.unwrap_or_else(|| match &response.status_text {
        Some(text) => format!("HTTP {}: {}", response.status, text),
        None => format!("HTTP {}", response.status),
    })
}

fn encode<T: Serialize + ?Sized>(body: &T) -> Result<Bytes, ApiError> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ApiError::Shape(format!("Failed to encode request body: {}", e)))
}

fn parse_body(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::Shape(format!("Invalid JSON in API response: {}", e)))
}
