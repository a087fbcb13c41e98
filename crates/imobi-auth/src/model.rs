//! Session models

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 8 * 60 * 60;
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Claims carried by a session token
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
}

/// Outcome of session verification, attached to each request by the
/// session middleware
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub username: String,
    pub token_provided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            token_provided: true,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token_provided: true,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_provided && self.error.is_none() && !self.username.is_empty()
    }
}

/// Credentials posted to the login endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_context_states() {
        assert!(!SessionContext::anonymous().is_authenticated());
        assert!(!SessionContext::invalid("expired").is_authenticated());
        assert!(SessionContext::authenticated("admin").is_authenticated());
        assert!(!SessionContext::authenticated("").is_authenticated());
    }
}
