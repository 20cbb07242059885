use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email and password submitted on the admin login form.
///
/// `Debug` never prints the password.
///
/// # Examples
///
/// ```
/// use core_auth::Credentials;
///
/// let credentials = Credentials::new("admin@example.org", "hunter2");
/// assert!(!format!("{:?}", credentials).contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl AdminUser {
    /// Name shown in the admin header; `"Admin"` when the backend sent none.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Admin"
        } else {
            &self.name
        }
    }
}

/// Successful `POST /auth/login` payload.
#[derive(Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: AdminUser,
}

/// An authenticated admin session.
///
/// Lives in memory only; dropping the [`SessionContext`](crate::SessionContext)
/// ends it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: AdminUser,
    pub signed_in_at: DateTime<Utc>,
    /// Created by the offline demo login rather than the backend
    pub demo: bool,
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("signed_in_at", &self.signed_in_at)
            .field("demo", &self.demo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            token: "eyJhbGciOiJIUzI1NiJ9.secret".to_string(),
            user: AdminUser {
                id: "u1".to_string(),
                name: "Admin User".to_string(),
                email: "admin@example.org".to_string(),
                role: "admin".to_string(),
            },
            signed_in_at: Utc::now(),
            demo: false,
        };

        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("Admin User"));
    }

    #[test]
    fn test_user_accepts_partial_payload() {
        let user: AdminUser =
            serde_json::from_value(json!({ "_id": "66a1", "email": "a@b.org" })).unwrap();
        assert_eq!(user.id, "66a1");
        assert_eq!(user.display_name(), "Admin");
        assert_eq!(user.role, "");
    }
}
