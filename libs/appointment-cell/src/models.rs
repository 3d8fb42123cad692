// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::error::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Form fields accepted by the booking and edit endpoints, in display order.
pub const BOOKING_FIELDS: [&str; 5] = ["client_name", "client_phone", "service", "date", "time"];

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_name: String,
    pub client_phone: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }
}

/// A bookable `(date, time)` pair. Ordering is by date, then time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(DATE_FORMAT), self.time.format(TIME_FORMAT))
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    pub client_name: String,
    pub client_phone: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl NewAppointment {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }
}

/// Partial update. `id` and `created_at` are never part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.client_phone.is_none()
            && self.service.is_none()
            && self.date.is_none()
            && self.time.is_none()
    }

    /// Slot the appointment ends up in once these changes are applied.
    pub fn target_slot(&self, current: &Appointment) -> Slot {
        Slot::new(
            self.date.unwrap_or(current.date),
            self.time.unwrap_or(current.time),
        )
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(client_name) = &self.client_name {
            appointment.client_name = client_name.clone();
        }
        if let Some(client_phone) = &self.client_phone {
            appointment.client_phone = client_phone.clone();
        }
        if let Some(service) = &self.service {
            appointment.service = service.clone();
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Raw form submission; any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingForm {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl BookingForm {
    pub fn new(client_name: &str, client_phone: &str, service: &str, date: &str, time: &str) -> Self {
        Self {
            client_name: Some(client_name.to_string()),
            client_phone: Some(client_phone.to_string()),
            service: Some(service.to_string()),
            date: Some(date.to_string()),
            time: Some(time.to_string()),
        }
    }
}

// ==============================================================================
// SERVICE CATALOG
// ==============================================================================

/// Services offered on the booking form. The server accepts any non-empty
/// service name; this list only drives the choice presented to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Service {
    Haircut,
    Styling,
    Manicure,
    Consultation,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Haircut,
        Service::Styling,
        Service::Manicure,
        Service::Consultation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Haircut => "Haircut",
            Service::Styling => "Styling",
            Service::Manicure => "Manicure",
            Service::Consultation => "Consultation",
        }
    }

    pub fn catalog() -> Vec<&'static str> {
        Self::ALL.iter().map(Service::as_str).collect()
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    NotFound(i64),

    #[error("The slot {0} is already booked, please choose another time")]
    SlotTaken(Slot),

    #[error("{0}")]
    ValidationError(String),

    #[error("Login required")]
    Unauthorized,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::NotFound(_) => AppError::NotFound(error.to_string()),
            AppointmentError::SlotTaken(_) => AppError::Conflict(error.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Unauthorized => AppError::LoginRequired,
            AppointmentError::StorageError(msg) => AppError::Database(msg),
        }
    }
}
