//! # Site Configuration Module
//!
//! Provides configuration management for the site core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SiteConfig`
//! holding the API settings and the host bridges the core calls through. It
//! validates eagerly so a misconfigured deployment fails at start-up instead
//! of silently serving fallback content forever.
//!
//! ## The API feature switch
//!
//! `ApiConfig::use_api` is the administrative switch for live data. When it
//! is `false` no request is ever issued and every resource is served from its
//! fallback dataset. It defaults to `false`; only the literal value `"true"`
//! in `SITE_USE_API` turns it on.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{ApiConfig, SiteConfig};
//!
//! let config = SiteConfig::builder()
//!     .api(ApiConfig::from_env()?)
//!     .build()?;
//! ```
//!
//! ### Configuration with Custom Bridges
//!
//! ```ignore
//! use core_runtime::config::SiteConfig;
//! use std::sync::Arc;
//!
//! let config = SiteConfig::builder()
//!     .base_url("https://api.example.org/api")
//!     .use_api(true)
//!     .request_timeout(Duration::from_secs(5))
//!     .http_client(Arc::new(MyHttpClient))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Deadline for every API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Upper bound accepted for [`ApiConfig::request_timeout`].
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_API_URL: &str = "SITE_API_URL";
pub const ENV_USE_API: &str = "SITE_USE_API";
pub const ENV_API_TIMEOUT_MS: &str = "SITE_API_TIMEOUT_MS";

/// Resource paths, relative to [`ApiConfig::base_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth: String,
    pub blogs: String,
    pub projects: String,
    pub team: String,
    pub videos: String,
    pub documents: String,
    pub contact: String,
    pub suggestions: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: "/auth/login".to_string(),
            blogs: "/blog".to_string(),
            projects: "/projects".to_string(),
            team: "/team".to_string(),
            videos: "/media/videos".to_string(),
            documents: "/media/documents".to_string(),
            contact: "/contact".to_string(),
            suggestions: "/suggestions".to_string(),
        }
    }
}

/// Settings for the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint and relative media URL is resolved against
    pub base_url: String,
    /// Feature switch; `false` forces fallback-only operation
    pub use_api: bool,
    /// Deadline for a single request
    pub request_timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            use_api: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }
}

impl ApiConfig {
    /// Reads `SITE_API_URL`, `SITE_USE_API` and `SITE_API_TIMEOUT_MS` from the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.to_string();
            }
        }

        config.use_api = lookup(ENV_USE_API).is_some_and(|v| v.trim() == "true");

        if let Some(raw) = lookup(ENV_API_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    ENV_API_TIMEOUT_MS, raw
                ))
            })?;
            config.request_timeout = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolves an endpoint path to a full URL.
    ///
    /// Paths that are already absolute are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if self.use_api
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "API base URL must be absolute (http:// or https://), got '{}'",
                self.base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0ms".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 120 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Credentials accepted by the offline demo login.
#[derive(Clone, PartialEq, Eq)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for DemoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Site configuration.
///
/// Use [`SiteConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct SiteConfig {
    pub api: ApiConfig,

    /// HTTP client for API requests
    pub http_client: Arc<dyn HttpClient>,

    /// Time source for fetch timestamps and sessions
    pub clock: Arc<dyn Clock>,

    /// Buffer size of the event bus
    pub event_buffer_size: usize,

    /// Enables the offline demo login when set
    pub demo_credentials: Option<DemoCredentials>,
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("api", &self.api)
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .field("demo_credentials", &self.demo_credentials)
            .finish()
    }
}

impl SiteConfig {
    pub fn builder() -> SiteConfigBuilder {
        SiteConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if let Some(demo) = &self.demo_credentials {
            if demo.email.is_empty() || demo.password.is_empty() {
                return Err(Error::Config(
                    "Demo credentials need both an email and a password".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::try_new().map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Other hosts: inject an HttpClient adapter."
            .to_string(),
    })
}

/// Builder for [`SiteConfig`].
#[derive(Default)]
pub struct SiteConfigBuilder {
    api: ApiConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
    demo_credentials: Option<DemoCredentials>,
}

impl SiteConfigBuilder {
    /// Replaces the whole API section, e.g. with [`ApiConfig::from_env`].
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn use_api(mut self, enabled: bool) -> Self {
        self.api.use_api = enabled;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.api.request_timeout = timeout;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.api.endpoints = endpoints;
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the reqwest-based client is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn demo_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.demo_credentials = Some(DemoCredentials {
            email: email.into(),
            password: password.into(),
        });
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no HTTP client is available
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<SiteConfig> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = SiteConfig {
            api: self.api,
            http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
            demo_credentials: self.demo_credentials,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{error::Result as BridgeResult, HttpRequest, HttpResponse};
    use std::collections::HashMap;

    struct NullHttpClient;

    #[async_trait]
    impl HttpClient for NullHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse::new(204, ""))
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_disable_api() {
        let config = ApiConfig::default();
        assert!(!config.use_api);
        assert_eq!(config.request_timeout, Duration::from_millis(10_000));
        assert_eq!(config.endpoints.videos, "/media/videos");
    }

    #[test]
    fn test_from_lookup_trims_base_url() {
        let config = ApiConfig::from_lookup(env(&[
            (ENV_API_URL, " https://api.example.org/api "),
            (ENV_USE_API, "true"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.org/api");
        assert!(config.use_api);
    }

    #[test]
    fn test_use_api_requires_literal_true() {
        for value in ["TRUE", "1", "yes", ""] {
            let config = ApiConfig::from_lookup(env(&[(ENV_USE_API, value)])).unwrap();
            assert!(!config.use_api, "'{}' must not enable the API", value);
        }
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = ApiConfig::from_lookup(env(&[(ENV_API_TIMEOUT_MS, "soon")]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ApiConfig::from_lookup(env(&[(ENV_API_TIMEOUT_MS, "0")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_relative_base_url_rejected_when_api_enabled() {
        let config = ApiConfig {
            base_url: "/api".to_string(),
            use_api: true,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_joining() {
        let config = ApiConfig {
            base_url: "https://api.example.org/api/".to_string(),
            ..ApiConfig::default()
        };

        assert_eq!(config.url("/projects"), "https://api.example.org/api/projects");
        assert_eq!(config.url("team"), "https://api.example.org/api/team");
        assert_eq!(
            config.url("https://cdn.example.org/x"),
            "https://cdn.example.org/x"
        );
    }

    #[test]
    fn test_builder_with_custom_client() {
        let config = SiteConfig::builder()
            .base_url("https://api.example.org/api")
            .use_api(true)
            .request_timeout(Duration::from_secs(3))
            .http_client(Arc::new(NullHttpClient))
            .demo_credentials("admin@example.org", "demo-pass")
            .build()
            .unwrap();

        assert!(config.api.use_api);
        assert_eq!(config.api.request_timeout, Duration::from_secs(3));
        assert_eq!(config.event_buffer_size, crate::events::DEFAULT_EVENT_BUFFER_SIZE);
        assert!(!format!("{:?}", config).contains("demo-pass"));
    }

    #[test]
    fn test_builder_rejects_zero_buffer() {
        let result = SiteConfig::builder()
            .http_client(Arc::new(NullHttpClient))
            .event_buffer_size(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_is_reported() {
        let result = SiteConfig::builder().build();
        assert!(matches!(result, Err(Error::CapabilityMissing { .. })));
    }
}
