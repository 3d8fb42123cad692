use std::sync::Arc;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_config::AppConfig;
use shared_utils::session::{validate_session_token, SESSION_COOKIE};
use shared_utils::test_utils::{SessionTestUtils, TestConfig};

fn create_test_app(config: AppConfig) -> Router {
    auth_routes(Arc::new(config))
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

/// Value of the session cookie set by a response, if any.
fn session_cookie_value(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", SESSION_COOKIE)))
        .map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim_start_matches(&format!("{}=", SESSION_COOKIE))
                .to_string()
        })
}

#[tokio::test]
async fn test_login_success_sets_session_and_redirects() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone());

    let response = app.oneshot(login_request("admin", "parola123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");

    let token = session_cookie_value(&response).expect("session cookie set");
    let claims = validate_session_token(&token, &config.session_secret).unwrap();
    assert_eq!(claims.sub, "admin");
    assert!(claims.logged_in);
}

#[tokio::test]
async fn test_login_cookie_is_http_only() {
    let app = create_test_app(TestConfig::default().to_app_config());

    let response = app.oneshot(login_request("admin", "parola123")).await.unwrap();

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = create_test_app(TestConfig::default().to_app_config());

    let response = app.oneshot(login_request("admin", "wrong")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie_value(&response).is_none());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json_response["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_missing_fields_is_unauthorized() {
    let app = create_test_app(TestConfig::default().to_app_config());

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=admin"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_disabled_without_configured_credentials() {
    let mut config = TestConfig::default().to_app_config();
    config.admin_username = String::new();
    config.admin_password = String::new();
    let app = create_test_app(config);

    let response = app.oneshot(login_request("", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_page_reports_session_state() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone());

    let anonymous = app
        .clone()
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
    let body = axum::body::to_bytes(anonymous.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json_response["logged_in"], false);

    let logged_in = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .header(header::COOKIE, SessionTestUtils::admin_cookie(&config))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(logged_in.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json_response["logged_in"], true);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone());

    let request = Request::builder()
        .uri("/logout")
        .header(header::COOKIE, SessionTestUtils::admin_cookie(&config))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    assert_eq!(session_cookie_value(&response).as_deref(), Some(""));
}

#[tokio::test]
async fn test_logout_when_anonymous_redirects_to_login() {
    let app = create_test_app(TestConfig::default().to_app_config());

    let response = app
        .oneshot(Request::builder().uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}
