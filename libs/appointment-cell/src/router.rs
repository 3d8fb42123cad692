// libs/appointment-cell/src/router.rs
use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_utils::extractor::session_guard;

use crate::handlers;
use crate::state::AppointmentState;

pub fn booking_routes(state: AppointmentState) -> Router {
    Router::new()
        .route("/book", get(handlers::booking_form).post(handlers::submit_booking))
        .with_state(state)
}

pub fn admin_routes(state: AppointmentState) -> Router {
    Router::new()
        .route("/admin", get(handlers::list_appointments))
        .route("/delete/{appointment_id}", get(handlers::delete_appointment))
        .route("/edit/{appointment_id}", get(handlers::edit_form).post(handlers::edit_appointment))
        .layer(middleware::from_fn_with_state(state.config.clone(), session_guard))
        .with_state(state)
}

pub fn appointment_routes(state: AppointmentState) -> Router {
    Router::new()
        .merge(booking_routes(state.clone()))
        .merge(admin_routes(state))
}
