use std::sync::Arc;
use chrono::{Duration, Utc};
use serde_json::json;

use shared_config::AppConfig;

use crate::session::{issue_session_token, SESSION_COOKIE};

pub struct TestConfig {
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-session-secret-must-be-long-enough".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "parola123".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.clone(),
            session_secret: self.session_secret.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct SessionTestUtils;

impl SessionTestUtils {
    pub fn create_session_token(config: &AppConfig, ttl_minutes: i64) -> String {
        issue_session_token(&config.admin_username, &config.session_secret, Utc::now(), ttl_minutes)
            .expect("test config has a session secret")
    }

    pub fn create_expired_token(config: &AppConfig) -> String {
        let issued_at = Utc::now() - Duration::hours(2);
        issue_session_token(&config.admin_username, &config.session_secret, issued_at, 30)
            .expect("test config has a session secret")
    }

    pub fn create_forged_token(config: &AppConfig) -> String {
        issue_session_token(&config.admin_username, "wrong-secret", Utc::now(), 30)
            .expect("non-empty secret")
    }

    /// `Cookie` header value carrying `token`.
    pub fn cookie_header(token: &str) -> String {
        format!("{}={}", SESSION_COOKIE, token)
    }

    pub fn admin_cookie(config: &AppConfig) -> String {
        Self::cookie_header(&Self::create_session_token(config, 60))
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn appointment_row(
        id: i64,
        client_name: &str,
        service: &str,
        date: &str,
        time: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "client_name": client_name,
            "client_phone": "0722000000",
            "service": service,
            "date": date,
            "time": time,
            "created_at": "2024-05-20T08:30:00Z"
        })
    }

    pub fn unique_violation() -> serde_json::Value {
        json!({
            "code": "23505",
            "details": "Key (date, \"time\") already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"appointments_slot_key\""
        })
    }
}
