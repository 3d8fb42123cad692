use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{info, instrument, warn};

use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_utils::session::{issue_session_token, resolve_session, session_expiry};

use crate::services::credentials::{ConfiguredCredentials, CredentialStore};

/// A freshly authenticated session and the signed token that carries it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub token: String,
}

pub struct SessionService {
    config: Arc<AppConfig>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let credentials = Arc::new(ConfiguredCredentials::from_config(&config));
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(config: Arc<AppConfig>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { config, credentials }
    }

    pub fn current_session(&self, jar: &CookieJar) -> Session {
        resolve_session(jar, &self.config.session_secret)
    }

    #[instrument(skip(self, password))]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<IssuedSession, AppError> {
        if !self.credentials.verify(username, password) {
            warn!("Failed admin login attempt for {:?}", username);
            return Err(AppError::Auth("Invalid username or password".to_string()));
        }

        let issued_at = Utc::now();
        let ttl_minutes = self.config.session_ttl_minutes;
        let expires_at = session_expiry(issued_at, ttl_minutes).map_err(AppError::Internal)?;
        let token = issue_session_token(username, &self.config.session_secret, issued_at, ttl_minutes)
            .map_err(AppError::Internal)?;

        info!("Admin {} logged in", username);

        Ok(IssuedSession {
            session: Session::Authenticated {
                username: username.to_string(),
                expires_at,
            },
            token,
        })
    }

    /// Always ends in `Anonymous`, whatever the prior state.
    pub fn logout(&self, session: &Session) -> Session {
        if let Some(username) = session.username() {
            info!("Admin {} logged out", username);
        }
        Session::Anonymous
    }
}
