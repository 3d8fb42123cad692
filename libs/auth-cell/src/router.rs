use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_guard;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/login", get(handlers::login_page).post(handlers::login));

    let protected_routes = Router::new()
        .route("/logout", get(handlers::logout))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
