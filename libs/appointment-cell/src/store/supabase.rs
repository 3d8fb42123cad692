use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{DatabaseError, SupabaseClient};

use crate::models::{
    Appointment, AppointmentChanges, AppointmentError, NewAppointment, Slot, DATE_FORMAT,
};
use crate::store::AppointmentStore;

const TABLE_PATH: &str = "/rest/v1/appointments";

/// Appointments persisted in the Supabase `appointments` table through PostgREST.
/// The table's unique `(date, time)` constraint backs the slot invariant.
pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn storage_error(error: DatabaseError) -> AppointmentError {
        AppointmentError::StorageError(error.to_string())
    }

    fn slot_filter(slot: Slot) -> String {
        format!(
            "date=eq.{}&time=eq.{}",
            slot.date.format(DATE_FORMAT),
            slot.time.format("%H:%M:%S")
        )
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!("{}?select=*&{}", TABLE_PATH, query);
        self.supabase
            .request::<Vec<Appointment>>(Method::GET, &path, None)
            .await
            .map_err(Self::storage_error)
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let slot = appointment.slot();
        debug!("Inserting appointment at {}", slot);

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::POST, TABLE_PATH, Some(json!(appointment)))
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(detail) => {
                    warn!("Unique slot constraint rejected {}: {}", slot, detail);
                    AppointmentError::SlotTaken(slot)
                }
                other => Self::storage_error(other),
            })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppointmentError::StorageError("Insert returned no rows".to_string()))
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!("{}&limit=1", Self::slot_filter(Slot::new(date, time)));
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    async fn get(&self, id: i64) -> Result<Appointment, AppointmentError> {
        self.fetch(&format!("id=eq.{}", id))
            .await?
            .into_iter()
            .next()
            .ok_or(AppointmentError::NotFound(id))
    }

    async fn list_all_ordered(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.fetch("order=date.asc,time.asc,id.asc").await
    }

    async fn update(&self, id: i64, changes: AppointmentChanges) -> Result<Appointment, AppointmentError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let path = format!("{}?id=eq.{}", TABLE_PATH, id);

        let result = self
            .supabase
            .request::<Vec<Appointment>>(Method::PATCH, &path, Some(json!(changes)))
            .await;

        match result {
            Ok(rows) => rows.into_iter().next().ok_or(AppointmentError::NotFound(id)),
            Err(DatabaseError::Conflict(detail)) => {
                // A partial move only names one half of the slot
                let slot = match changes.date.zip(changes.time) {
                    Some((date, time)) => Slot::new(date, time),
                    None => changes.target_slot(&self.get(id).await?),
                };
                warn!("Unique slot constraint rejected move of {} to {}: {}", id, slot, detail);
                Err(AppointmentError::SlotTaken(slot))
            }
            Err(other) => Err(Self::storage_error(other)),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(Self::storage_error)?;

        if rows.is_empty() {
            return Err(AppointmentError::NotFound(id));
        }
        Ok(())
    }
}
