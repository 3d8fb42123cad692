use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::models::{Appointment, AppointmentChanges, AppointmentError, NewAppointment};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

/// Persistent collection of appointments keyed by id.
///
/// `insert` is an atomic insert-if-absent on the `(date, time)` slot: an
/// occupied slot fails with [`AppointmentError::SlotTaken`] even when a caller
/// skipped (or raced past) its own `find_by_slot` check.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError>;

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<Appointment>, AppointmentError>;

    async fn get(&self, id: i64) -> Result<Appointment, AppointmentError>;

    /// All appointments, ascending by `(date, time)`; ties fall back to id.
    async fn list_all_ordered(&self) -> Result<Vec<Appointment>, AppointmentError>;

    async fn update(&self, id: i64, changes: AppointmentChanges) -> Result<Appointment, AppointmentError>;

    async fn delete(&self, id: i64) -> Result<(), AppointmentError>;
}
