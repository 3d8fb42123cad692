// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Form, Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::models::{BookingForm, Service, BOOKING_FIELDS};
use crate::state::AppointmentState;

pub const ADMIN_PATH: &str = "/admin";

// ==============================================================================
// PUBLIC BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn booking_form(
    State(state): State<AppointmentState>,
) -> Json<Value> {
    Json(json!({
        "services": state.booking_service().services(),
        "fields": BOOKING_FIELDS,
    }))
}

/// Answers with JSON rather than redirecting back to the form: 201 with the
/// stored appointment, 400 on validation errors, 409 when the slot is taken.
#[axum::debug_handler]
pub async fn submit_booking(
    State(state): State<AppointmentState>,
    Form(form): Form<BookingForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = state.booking_service().submit_booking(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

// ==============================================================================
// ADMIN HANDLERS (behind the session guard)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.admin_service().list_appointments(&session).await?;
    debug!("Listing {} appointments", appointments.len());

    Ok(Json(json!({
        "count": appointments.len(),
        "appointments": appointments,
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentState>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.admin_service().delete_appointment(&session, appointment_id).await?;
    Ok(Redirect::to(ADMIN_PATH))
}

#[axum::debug_handler]
pub async fn edit_form(
    State(state): State<AppointmentState>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.admin_service().get_appointment(&session, appointment_id).await?;

    Ok(Json(json!({
        "appointment": appointment,
        "services": Service::catalog(),
    })))
}

#[axum::debug_handler]
pub async fn edit_appointment(
    State(state): State<AppointmentState>,
    Extension(session): Extension<Session>,
    Path(appointment_id): Path<i64>,
    Form(form): Form<BookingForm>,
) -> Result<Redirect, AppError> {
    state.admin_service().edit_appointment(&session, appointment_id, form).await?;
    Ok(Redirect::to(ADMIN_PATH))
}
