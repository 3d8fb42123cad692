use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

/// Claims carried by the signed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: Uuid,
    pub sub: String,
    pub logged_in: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Per-request authentication state.
///
/// A request starts out `Anonymous`; only a successful login produces
/// `Authenticated`, and logout or expiry returns it to `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
        expires_at: DateTime<Utc>,
    },
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Authenticated { username, .. } => Some(username),
            Session::Anonymous => None,
        }
    }
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        match Utc.timestamp_opt(claims.exp, 0).single() {
            Some(expires_at) if claims.logged_in => Session::Authenticated {
                username: claims.sub,
                expires_at,
            },
            _ => Session::Anonymous,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}
