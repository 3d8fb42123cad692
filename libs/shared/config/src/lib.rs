use std::env;
use tracing::warn;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 8 * 60;
pub const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Argon2 PHC string; takes precedence over `admin_password` when set.
    pub admin_password_hash: Option<String>,
    pub session_secret: String,
    pub session_ttl_minutes: i64,
    pub session_cookie_secure: bool,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_USERNAME not set, admin login disabled");
                    String::new()
                }),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .ok()
                .filter(|hash| !hash.is_empty()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_SECRET not set, sessions cannot be issued");
                    String::new()
                }),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .map(|value| parse_session_ttl(&value))
                .unwrap_or(DEFAULT_SESSION_TTL_MINUTES),
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        };

        if !config.is_admin_configured() {
            warn!("Admin credentials not fully configured - login will always fail");
        }

        config
    }

    /// True when appointments should be persisted through Supabase.
    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_admin_configured(&self) -> bool {
        !self.admin_username.is_empty()
            && (!self.admin_password.is_empty() || self.admin_password_hash.is_some())
            && !self.session_secret.is_empty()
    }
}

/// Positive minute counts are capped at 30 days; anything else falls back to the default.
fn parse_session_ttl(value: &str) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(minutes) if minutes > MAX_SESSION_TTL_MINUTES => {
            warn!(
                "SESSION_TTL_MINUTES {} exceeds the maximum, clamping to {}",
                minutes, MAX_SESSION_TTL_MINUTES
            );
            MAX_SESSION_TTL_MINUTES
        }
        Ok(minutes) if minutes > 0 => minutes,
        _ => {
            warn!("SESSION_TTL_MINUTES invalid ({}), using default", value);
            DEFAULT_SESSION_TTL_MINUTES
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            admin_username: String::new(),
            admin_password: String::new(),
            admin_password_hash: None,
            session_secret: String::new(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            session_cookie_secure: false,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
