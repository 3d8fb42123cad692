// libs/appointment-cell/src/services/admin.rs
use std::sync::Arc;

use tracing::{info, instrument, warn};

use shared_models::auth::Session;
use shared_utils::extractor::ensure_logged_in;

use crate::models::{Appointment, AppointmentChanges, AppointmentError, BookingForm};
use crate::services::booking::validate_booking_form;
use crate::store::AppointmentStore;

/// Dashboard operations. Each call checks the caller's session before
/// touching the store, so the service is safe to use outside the router.
pub struct AdminService {
    store: Arc<dyn AppointmentStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    fn authorize(session: &Session) -> Result<(), AppointmentError> {
        ensure_logged_in(session).map_err(|_| AppointmentError::Unauthorized)
    }

    pub async fn list_appointments(&self, session: &Session) -> Result<Vec<Appointment>, AppointmentError> {
        Self::authorize(session)?;
        self.store.list_all_ordered().await
    }

    pub async fn get_appointment(&self, session: &Session, id: i64) -> Result<Appointment, AppointmentError> {
        Self::authorize(session)?;
        self.store.get(id).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_appointment(&self, session: &Session, id: i64) -> Result<(), AppointmentError> {
        Self::authorize(session)?;
        self.store.delete(id).await?;

        info!("Appointment {} deleted by {:?}", id, session.username());
        Ok(())
    }

    /// Overwrites all five editable fields. Moving onto a slot held by a
    /// different appointment is rejected.
    #[instrument(skip(self, session, form))]
    pub async fn edit_appointment(
        &self,
        session: &Session,
        id: i64,
        form: BookingForm,
    ) -> Result<Appointment, AppointmentError> {
        Self::authorize(session)?;

        let current = self.store.get(id).await?;
        let booking = validate_booking_form(&form)?;
        let slot = booking.slot;

        if slot != current.slot() {
            if let Some(other) = self.store.find_by_slot(slot.date, slot.time).await? {
                if other.id != id {
                    warn!("Edit of appointment {} rejected: {} held by {}", id, slot, other.id);
                    return Err(AppointmentError::SlotTaken(slot));
                }
            }
        }

        let updated = self.store.update(id, AppointmentChanges::from(booking)).await?;

        info!("Appointment {} updated by {:?}", id, session.username());
        Ok(updated)
    }
}
