use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Session, SessionClaims, TokenHeader};

pub const SESSION_COOKIE: &str = "salon_session";

type HmacSha256 = Hmac<Sha256>;

fn new_mac(secret: &str) -> Result<HmacSha256, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| "Failed to create HMAC".to_string())
}

/// Expiry of a session issued at `issued_at`. Errors instead of overflowing.
pub fn session_expiry(issued_at: DateTime<Utc>, ttl_minutes: i64) -> Result<DateTime<Utc>, String> {
    Duration::try_minutes(ttl_minutes)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .ok_or_else(|| format!("Session lifetime of {} minutes is out of range", ttl_minutes))
}

/// Signs a session token for `username`, valid for `ttl_minutes` from `issued_at`.
pub fn issue_session_token(
    username: &str,
    secret: &str,
    issued_at: DateTime<Utc>,
    ttl_minutes: i64,
) -> Result<String, String> {
    let mut mac = new_mac(secret)?;
    let expires_at = session_expiry(issued_at, ttl_minutes)?;

    let claims = SessionClaims {
        sid: Uuid::new_v4(),
        sub: username.to_string(),
        logged_in: true,
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let header = json!({ "alg": "HS256", "typ": "session" });
    let claims_json = serde_json::to_string(&claims).map_err(|e| e.to_string())?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature_b64))
}

pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        "Invalid signature encoding".to_string()
    })?;

    let mut mac = new_mac(secret)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Session signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let header: TokenHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| "Invalid header encoding".to_string())?;
    if header.alg != "HS256" {
        return Err(format!("Unsupported algorithm: {}", header.alg));
    }

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| "Invalid claims encoding".to_string())?;

    let claims: SessionClaims = serde_json::from_slice(&claims_bytes).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })?;

    let now = Utc::now().timestamp();
    if claims.exp <= now {
        debug!("Session expired at {} (now: {})", claims.exp, now);
        return Err("Session expired".to_string());
    }

    if !claims.logged_in {
        return Err("Session is not logged in".to_string());
    }

    Ok(claims)
}

/// Reads the session cookie; anything missing, forged or expired is anonymous.
pub fn resolve_session(jar: &CookieJar, secret: &str) -> Session {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Session::Anonymous;
    };

    match validate_session_token(cookie.value(), secret) {
        Ok(claims) => Session::from(claims),
        Err(reason) => {
            debug!("Ignoring session cookie: {}", reason);
            Session::Anonymous
        }
    }
}

pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.session_cookie_secure)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
