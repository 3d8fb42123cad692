use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use shared_config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

const COMPARE_KEY: &[u8] = b"salon-booking-credential-compare";

/// Source of truth for the admin login.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

#[derive(Debug, Clone)]
enum PasswordSecret {
    Plain(String),
    Argon2(String),
    Disabled,
}

/// The single admin account injected through configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredCredentials {
    username: String,
    secret: PasswordSecret,
}

impl ConfiguredCredentials {
    pub fn from_config(config: &AppConfig) -> Self {
        let secret = match (&config.admin_password_hash, config.admin_password.as_str()) {
            (Some(hash), _) => PasswordSecret::Argon2(hash.clone()),
            (None, "") => PasswordSecret::Disabled,
            (None, password) => PasswordSecret::Plain(password.to_string()),
        };

        Self {
            username: config.admin_username.clone(),
            secret,
        }
    }

    pub fn plain(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            secret: PasswordSecret::Plain(password.to_string()),
        }
    }

    pub fn hashed(username: &str, phc_hash: &str) -> Self {
        Self {
            username: username.to_string(),
            secret: PasswordSecret::Argon2(phc_hash.to_string()),
        }
    }

    /// Produces an argon2 PHC string suitable for `ADMIN_PASSWORD_HASH`.
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    fn password_matches(&self, password: &str) -> bool {
        match &self.secret {
            PasswordSecret::Plain(expected) => constant_time_eq(password.as_bytes(), expected.as_bytes()),
            PasswordSecret::Argon2(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    warn!("Configured admin password hash is invalid: {}", e);
                    false
                }
            },
            PasswordSecret::Disabled => false,
        }
    }
}

impl CredentialStore for ConfiguredCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        if self.username.is_empty() {
            debug!("Admin username not configured, refusing login");
            return false;
        }

        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = self.password_matches(password);
        username_ok && password_ok
    }
}

// Compares HMAC digests so the comparison time does not depend on where the inputs differ
fn constant_time_eq(candidate: &[u8], expected: &[u8]) -> bool {
    let digest = |value: &[u8]| {
        HmacSha256::new_from_slice(COMPARE_KEY).map(|mut mac| {
            mac.update(value);
            mac
        })
    };

    match (digest(candidate), digest(expected)) {
        (Ok(candidate_mac), Ok(expected_mac)) => {
            let expected_bytes = expected_mac.finalize().into_bytes();
            candidate_mac.verify_slice(&expected_bytes).is_ok()
        }
        _ => false,
    }
}
