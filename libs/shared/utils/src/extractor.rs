use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
    body::Body,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::session::resolve_session;

/// Admin operations only run for an authenticated session.
pub fn ensure_logged_in(session: &Session) -> Result<(), AppError> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err(AppError::LoginRequired)
    }
}

// Middleware guarding admin routes; anonymous callers are sent to the login page
pub async fn session_guard(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = resolve_session(&jar, &config.session_secret);
    ensure_logged_in(&session)?;

    debug!("Session accepted for {:?} on {}", session.username(), request.uri().path());

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
