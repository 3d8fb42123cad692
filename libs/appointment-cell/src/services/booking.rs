// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument, warn};

use crate::models::{
    Appointment, AppointmentChanges, AppointmentError, BookingForm, NewAppointment, Service,
    Slot, DATE_FORMAT, TIME_FORMAT,
};
use crate::store::AppointmentStore;

/// A booking form that passed field and format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub client_name: String,
    pub client_phone: String,
    pub service: String,
    pub slot: Slot,
}

impl From<ValidatedBooking> for AppointmentChanges {
    fn from(booking: ValidatedBooking) -> Self {
        AppointmentChanges {
            client_name: Some(booking.client_name),
            client_phone: Some(booking.client_phone),
            service: Some(booking.service),
            date: Some(booking.slot.date),
            time: Some(booking.slot.time),
        }
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses `YYYY-MM-DD` and `HH:MM` into a slot.
pub fn parse_slot(date_str: &str, time_str: &str) -> Result<Slot, AppointmentError> {
    let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT);
    let time = NaiveTime::parse_from_str(time_str.trim(), TIME_FORMAT);

    match (date, time) {
        (Ok(date), Ok(time)) => Ok(Slot::new(date, time)),
        _ => Err(AppointmentError::ValidationError(format!(
            "Invalid date or time: expected YYYY-MM-DD and HH:MM, got '{}' and '{}'",
            date_str, time_str
        ))),
    }
}

/// Checks that every field is present and non-blank and that date/time parse.
pub fn validate_booking_form(form: &BookingForm) -> Result<ValidatedBooking, AppointmentError> {
    let client_name = required(&form.client_name);
    let client_phone = required(&form.client_phone);
    let service = required(&form.service);
    let date = required(&form.date);
    let time = required(&form.time);

    let (Some(client_name), Some(client_phone), Some(service), Some(date), Some(time)) =
        (client_name, client_phone, service, date, time)
    else {
        let missing: Vec<&str> = [
            ("client_name", client_name),
            ("client_phone", client_phone),
            ("service", service),
            ("date", date),
            ("time", time),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

        return Err(AppointmentError::ValidationError(format!(
            "All fields are required (missing: {})",
            missing.join(", ")
        )));
    };

    Ok(ValidatedBooking {
        client_name: client_name.to_string(),
        client_phone: client_phone.to_string(),
        service: service.to_string(),
        slot: parse_slot(date, time)?,
    })
}

pub struct BookingService {
    store: Arc<dyn AppointmentStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Services offered on the public form. Not enforced on submission.
    pub fn services(&self) -> Vec<&'static str> {
        Service::catalog()
    }

    #[instrument(skip(self, form))]
    pub async fn submit_booking(&self, form: BookingForm) -> Result<Appointment, AppointmentError> {
        let booking = validate_booking_form(&form)?;
        let slot = booking.slot;

        if let Some(existing) = self.store.find_by_slot(slot.date, slot.time).await? {
            warn!("Slot {} already held by appointment {}", slot, existing.id);
            return Err(AppointmentError::SlotTaken(slot));
        }

        let appointment = self
            .store
            .insert(NewAppointment {
                client_name: booking.client_name,
                client_phone: booking.client_phone,
                service: booking.service,
                date: slot.date,
                time: slot.time,
                created_at: Utc::now(),
            })
            .await
            .inspect_err(|e| {
                if let AppointmentError::SlotTaken(_) = e {
                    warn!("Slot {} was booked concurrently", slot);
                }
            })?;

        info!("Booked appointment {} for {} ({})", appointment.id, slot, appointment.service);
        Ok(appointment)
    }
}
