use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::LoginForm;
use shared_models::error::{AppError, LOGIN_PATH};
use shared_utils::session::{removal_cookie, session_cookie};

use crate::services::SessionService;

pub const AFTER_LOGIN_PATH: &str = "/admin";

pub async fn login_page(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
) -> Json<Value> {
    let session = SessionService::new(config).current_session(&jar);

    Json(json!({
        "logged_in": session.is_logged_in(),
        "fields": ["username", "password"],
    }))
}

/// Sets the session cookie and redirects to the dashboard. A rejected pair is
/// a 401 JSON error instead of a redirect back to the login page.
#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    debug!("Processing login form");

    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let issued = SessionService::new(config.clone()).authenticate(&username, &password)?;

    Ok((
        jar.add(session_cookie(issued.token, &config)),
        Redirect::to(AFTER_LOGIN_PATH),
    ))
}

pub async fn logout(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let service = SessionService::new(config);
    let session = service.current_session(&jar);
    service.logout(&session);

    (jar.remove(removal_cookie()), Redirect::to(LOGIN_PATH))
}
