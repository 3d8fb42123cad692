use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Appointment, AppointmentChanges, AppointmentError, NewAppointment, Slot};
use crate::store::AppointmentStore;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    appointments: BTreeMap<i64, Appointment>,
}

impl MemoryState {
    fn occupant(&self, slot: Slot) -> Option<&Appointment> {
        self.appointments.values().find(|appt| appt.slot() == slot)
    }
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    state: RwLock<MemoryState>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.appointments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let mut state = self.state.write().await;

        let slot = appointment.slot();
        if state.occupant(slot).is_some() {
            return Err(AppointmentError::SlotTaken(slot));
        }

        state.last_id += 1;
        let stored = Appointment {
            id: state.last_id,
            client_name: appointment.client_name,
            client_phone: appointment.client_phone,
            service: appointment.service,
            date: appointment.date,
            time: appointment.time,
            created_at: appointment.created_at,
        };
        state.appointments.insert(stored.id, stored.clone());

        debug!("Stored appointment {} at {}", stored.id, slot);
        Ok(stored)
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let state = self.state.read().await;
        Ok(state.occupant(Slot::new(date, time)).cloned())
    }

    async fn get(&self, id: i64) -> Result<Appointment, AppointmentError> {
        let state = self.state.read().await;
        state
            .appointments
            .get(&id)
            .cloned()
            .ok_or(AppointmentError::NotFound(id))
    }

    async fn list_all_ordered(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let state = self.state.read().await;
        let mut appointments: Vec<Appointment> = state.appointments.values().cloned().collect();
        appointments.sort_by_key(|appt| (appt.slot(), appt.id));
        Ok(appointments)
    }

    async fn update(&self, id: i64, changes: AppointmentChanges) -> Result<Appointment, AppointmentError> {
        let mut state = self.state.write().await;

        let current = state
            .appointments
            .get(&id)
            .ok_or(AppointmentError::NotFound(id))?;

        let target = changes.target_slot(current);
        if state.occupant(target).is_some_and(|other| other.id != id) {
            return Err(AppointmentError::SlotTaken(target));
        }

        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or(AppointmentError::NotFound(id))?;
        changes.apply_to(appointment);

        debug!("Updated appointment {}", id);
        Ok(appointment.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        let mut state = self.state.write().await;
        state
            .appointments
            .remove(&id)
            .map(|_| debug!("Removed appointment {}", id))
            .ok_or(AppointmentError::NotFound(id))
    }
}
