//! # Admin Session
//!
//! Explicit session handle for the admin area.
//!
//! ## Overview
//!
//! `SessionContext` is created once at application start and cloned into
//! whatever needs auth state. All clones share one session slot guarded by a
//! `tokio::sync::RwLock`. The session is never persisted; it lasts until
//! [`SessionContext::logout`] or until the last clone is dropped.
//!
//! Signing in goes through the backend (`POST /auth/login`) or, when demo
//! credentials are configured, through an offline check that never touches
//! the network.
//!
//! `SessionContext` implements [`TokenSource`], so an [`ApiClient`] built
//! with it sends `Authorization: Bearer <token>` while someone is signed in.
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::{Credentials, SessionContext};
//!
//! let session = SessionContext::new(api, clock, events);
//! session.login(&Credentials::new(email, password)).await?;
//! assert!(session.is_authenticated().await);
//! session.logout().await;
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AdminUser, Credentials, LoginResponse, Session};
use async_trait::async_trait;
use bridge_traits::time::Clock;
use core_runtime::config::DemoCredentials;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use core_runtime::logging::redact_if_sensitive;
use core_runtime::{ApiClient, ApiError, TokenSource};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

const DEMO_USER_ID: &str = "demo-admin";
const DEMO_USER_NAME: &str = "Admin User";
const DEMO_ROLE: &str = "admin";

/// Shared admin session handle.
#[derive(Clone)]
pub struct SessionContext {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    demo_credentials: Option<DemoCredentials>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// `api` should be a client without a token source; login requests are
    /// anonymous.
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, event_bus: EventBus) -> Self {
        Self {
            api,
            clock,
            event_bus,
            demo_credentials: None,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Enables [`demo_login`](Self::demo_login) for these credentials.
    pub fn with_demo_credentials(mut self, credentials: Option<DemoCredentials>) -> Self {
        self.demo_credentials = credentials;
        self
    }

    /// Signs in against the backend.
    ///
    /// On success the session holds the returned token and user. On failure
    /// the previous session, if any, is left untouched.
    #[instrument(skip(self, credentials), fields(email = %redact_if_sensitive("email", &credentials.email)))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.emit(AuthEvent::SigningIn {
            email: redact_if_sensitive("email", &credentials.email),
        });

        let result = self
            .api
            .post_json(&self.api.config().endpoints.auth, credentials)
            .await
            .map_err(login_error)
            .and_then(parse_login_response);

        match result {
            Ok(response) => {
                let session = Session {
                    token: response.token,
                    user: response.user,
                    signed_in_at: self.clock.now(),
                    demo: false,
                };
                self.start(session.clone()).await;
                Ok(session)
            }
            Err(error) => {
                warn!(error = %error, "Login failed");
                self.emit(AuthEvent::AuthError {
                    message: error.to_string(),
                    recoverable: error.is_recoverable(),
                });
                Err(error)
            }
        }
    }

    /// Signs in with the configured demo credentials, without network access.
    #[instrument(skip(self, credentials))]
    pub async fn demo_login(&self, credentials: &Credentials) -> Result<Session> {
        let Some(demo) = &self.demo_credentials else {
            debug!("Demo login requested but not configured");
            return Err(AuthError::DemoUnavailable);
        };

        if demo.email != credentials.email || demo.password != credentials.password {
            let error = AuthError::InvalidCredentials("Invalid email or password".to_string());
            self.emit(AuthEvent::AuthError {
                message: error.to_string(),
                recoverable: false,
            });
            return Err(error);
        }

        let signed_in_at = self.clock.now();
        let session = Session {
            token: format!("demo-{}", signed_in_at.timestamp()),
            user: AdminUser {
                id: DEMO_USER_ID.to_string(),
                name: DEMO_USER_NAME.to_string(),
                email: credentials.email.clone(),
                role: DEMO_ROLE.to_string(),
            },
            signed_in_at,
            demo: true,
        };
        self.start(session.clone()).await;
        Ok(session)
    }

    /// Ends the session. Signing out while signed out is a no-op apart from
    /// the event.
    pub async fn logout(&self) {
        let previous = self.current.write().await.take();
        let user_id = previous.map(|session| session.user.id);

        info!(user_id = ?user_id, "Signed out");
        self.emit(AuthEvent::SignedOut { user_id });
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<AdminUser> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.user.clone())
    }

    /// Like [`current_user`](Self::current_user) but fails when signed out.
    pub async fn require_user(&self) -> Result<AdminUser> {
        self.current_user().await.ok_or(AuthError::NotAuthenticated)
    }

    /// The session is in place before `SignedIn` goes out.
    async fn start(&self, session: Session) {
        info!(user_id = %session.user.id, demo = session.demo, "Signed in");
        let event = AuthEvent::SignedIn {
            user_id: session.user.id.clone(),
            role: session.user.role.clone(),
            demo: session.demo,
        };
        *self.current.write().await = Some(session);
        self.emit(event);
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.event_bus.emit(CoreEvent::Auth(event));
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("demo_enabled", &self.demo_credentials.is_some())
            .finish()
    }
}

#[async_trait]
impl TokenSource for SessionContext {
    async fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.token.clone())
    }
}

/// Rejected credentials come back as 401 or 403.
fn login_error(error: ApiError) -> AuthError {
    match error {
        ApiError::Http {
            status: 401 | 403,
            message,
        } => AuthError::InvalidCredentials(message),
        other => AuthError::Api(other),
    }
}

/// Accepts `{token, user}` bare or under `data`.
fn parse_login_response(body: Value) -> Result<LoginResponse> {
    if body.get("success") == Some(&Value::Bool(false)) {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or("Login failed");
        return Err(AuthError::InvalidCredentials(message.to_string()));
    }

    let payload = match body.get("data") {
        Some(data @ Value::Object(_)) => data.clone(),
        _ => body,
    };

    serde_json::from_value(payload).map_err(|e| AuthError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{BridgeError, FixedClock, HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use chrono::{TimeZone, Utc};
    use core_runtime::ApiConfig;
    use mockall::mock;
    use serde_json::json;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn context(http: MockHttpClient) -> (SessionContext, EventBus) {
        let config = ApiConfig {
            base_url: "https://api.example.org/api".to_string(),
            use_api: true,
            ..ApiConfig::default()
        };
        let bus = EventBus::new(16);
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        let session = SessionContext::new(ApiClient::new(config, Arc::new(http)), Arc::new(clock), bus.clone());
        (session, bus)
    }

    fn ok(body: Value) -> BridgeResult<HttpResponse> {
        Ok(HttpResponse::new(200, body.to_string()))
    }

    fn credentials() -> Credentials {
        Credentials::new("director@example.org", "correct horse")
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Post
                    && req.url == "https://api.example.org/api/auth/login"
                    && req.body.as_deref() == Some(br#"{"email":"director@example.org","password":"correct horse"}"#.as_slice())
            })
            .times(1)
            .returning(|_| {
                ok(json!({
                    "token": "jwt-abc",
                    "user": { "id": "u1", "name": "Marie", "email": "director@example.org", "role": "admin" }
                }))
            });
        let (session, bus) = context(http);
        let mut events = bus.subscribe();

        let started = session.login(&credentials()).await.unwrap();
        assert_eq!(started.user.name, "Marie");
        assert!(!started.demo);
        assert!(session.is_authenticated().await);
        assert_eq!(session.bearer_token().await.as_deref(), Some("jwt-abc"));

        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Auth(AuthEvent::SigningIn {
                email: "d***@[REDACTED]".to_string()
            })
        );
        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Auth(AuthEvent::SignedIn {
                user_id: "u1".to_string(),
                role: "admin".to_string(),
                demo: false,
            })
        );
    }

    #[tokio::test]
    async fn test_login_accepts_data_envelope() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|_| {
            ok(json!({
                "success": true,
                "data": { "token": "jwt-xyz", "user": { "_id": "u2", "name": "" } }
            }))
        });
        let (session, _bus) = context(http);

        let started = session.login(&credentials()).await.unwrap();
        assert_eq!(started.token, "jwt-xyz");
        assert_eq!(started.user.id, "u2");
        assert_eq!(started.user.display_name(), "Admin");
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|_| {
            Ok(HttpResponse::new(401, json!({ "error": "Invalid credentials" }).to_string()))
        });
        let (session, bus) = context(http);
        let mut events = bus.subscribe();

        let error = session.login(&credentials()).await.unwrap_err();
        assert_eq!(error, AuthError::InvalidCredentials("Invalid credentials".to_string()));
        assert!(!error.is_recoverable());
        assert!(!session.is_authenticated().await);

        events.recv().await.unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Auth(AuthEvent::AuthError {
                message: "Invalid credentials".to_string(),
                recoverable: false,
            })
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_body_and_missing_token() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| ok(json!({ "success": false, "error": "Account locked" })));
        let (session, _bus) = context(http);
        assert_eq!(
            session.login(&credentials()).await.unwrap_err(),
            AuthError::InvalidCredentials("Account locked".to_string())
        );

        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| ok(json!({ "user": { "id": "u1" } })));
        let (session, _bus) = context(http);
        assert!(matches!(
            session.login(&credentials()).await,
            Err(AuthError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_network_failure_is_recoverable() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Err(BridgeError::ConnectionFailed("refused".to_string())));
        let (session, _bus) = context(http);

        let error = session.login(&credentials()).await.unwrap_err();
        assert!(error.is_recoverable());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (session, bus) = context(MockHttpClient::new());
        let session = session.with_demo_credentials(Some(DemoCredentials {
            email: "director@example.org".to_string(),
            password: "correct horse".to_string(),
        }));
        session.demo_login(&credentials()).await.unwrap();

        let mut events = bus.subscribe();
        let observer = session.clone();
        session.logout().await;

        assert!(!observer.is_authenticated().await);
        assert_eq!(observer.bearer_token().await, None);
        assert_eq!(session.require_user().await, Err(AuthError::NotAuthenticated));
        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Auth(AuthEvent::SignedOut {
                user_id: Some("demo-admin".to_string())
            })
        );
    }

    #[tokio::test]
    async fn test_demo_login_never_calls_network() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);
        let (session, _bus) = context(http);
        let session = session.with_demo_credentials(Some(DemoCredentials {
            email: "director@example.org".to_string(),
            password: "correct horse".to_string(),
        }));

        let wrong = Credentials::new("director@example.org", "wrong");
        assert!(matches!(
            session.demo_login(&wrong).await,
            Err(AuthError::InvalidCredentials(_))
        ));

        let started = session.demo_login(&credentials()).await.unwrap();
        assert!(started.demo);
        assert_eq!(started.user.name, "Admin User");
        assert_eq!(started.token, format!("demo-{}", started.signed_in_at.timestamp()));
    }

    #[tokio::test]
    async fn test_demo_login_requires_configuration() {
        let (session, _bus) = context(MockHttpClient::new());
        assert_eq!(
            session.demo_login(&credentials()).await.unwrap_err(),
            AuthError::DemoUnavailable
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_session_is_visible_when_signed_in_is_observed() {
        let (session, bus) = context(MockHttpClient::new());
        let session = session.with_demo_credentials(Some(DemoCredentials {
            email: "director@example.org".to_string(),
            password: "correct horse".to_string(),
        }));
        let mut events = bus.subscribe();
        let observer = session.clone();

        let watcher = tokio::spawn(async move {
            loop {
                if let CoreEvent::Auth(AuthEvent::SignedIn { .. }) = events.recv().await.unwrap() {
                    return observer.is_authenticated().await;
                }
            }
        });

        session.demo_login(&credentials()).await.unwrap();
        assert!(watcher.await.unwrap());
    }
}
