//! Delegated login.
//!
//! Browsing is gated on a [`Session`] marker that an [`Authenticator`]
//! produces. The server never sees it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobfeed_core::config::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Authenticated-user marker persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            authenticated_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

/// Accepts exactly one configured user/password pair.
pub struct StaticAuthenticator {
    expected: Option<Credentials>,
}

impl StaticAuthenticator {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            expected: Some(Credentials::new(user, password)),
        }
    }

    /// Unconfigured when either `CLIENT_USERNAME` or `CLIENT_PASSWORD` is unset.
    pub fn from_config(config: &ClientConfig) -> Self {
        let expected = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            _ => None,
        };
        Self { expected }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let expected = self.expected.as_ref().ok_or(AuthError::NotConfigured)?;
        if credentials.user == expected.user && credentials.password == expected.password {
            Ok(Session::new(&credentials.user))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matching_pair_yields_a_session() {
        let auth = StaticAuthenticator::new("admin", "1234");
        let session = auth.authenticate(&Credentials::new("admin", "1234")).await.unwrap();
        assert_eq!(session.user, "admin");
        assert!(session.authenticated_at <= Utc::now());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = StaticAuthenticator::new("admin", "1234");
        let err = auth.authenticate(&Credentials::new("admin", "12345")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        let err = auth.authenticate(&Credentials::new("Admin", "1234")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn missing_config_is_not_configured() {
        let config = ClientConfig {
            api_base_url: "http://localhost:5000".into(),
            state_dir: std::env::temp_dir(),
            username: Some("admin".into()),
            password: None,
        };
        let err = StaticAuthenticator::from_config(&config)
            .authenticate(&Credentials::new("admin", ""))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::NotConfigured);
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
