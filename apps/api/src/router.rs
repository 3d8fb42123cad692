use std::sync::Arc;

use axum::{
    Router,
    response::Html,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use appointment_cell::AppointmentState;
use auth_cell::router::auth_routes;
use shared_config::AppConfig;

const LANDING_PAGE: &str = "<!doctype html>\
<html><head><title>Salon Booking</title></head>\
<body><h1>Salon Booking</h1>\
<p><a href=\"/book\">Book an appointment</a> | <a href=\"/login\">Admin login</a></p>\
</body></html>";

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

pub fn create_router(config: Arc<AppConfig>, appointments: AppointmentState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .merge(auth_routes(config))
        .merge(appointment_routes(appointments))
}
