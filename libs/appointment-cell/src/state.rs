use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::{AdminService, BookingService};
use crate::store::AppointmentStore;

/// Shared state for the appointment routes: configuration for the session
/// guard plus the store every service delegates to.
#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn AppointmentStore>,
}

impl AppointmentState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn AppointmentStore>) -> Self {
        Self { config, store }
    }

    pub fn booking_service(&self) -> BookingService {
        BookingService::new(Arc::clone(&self.store))
    }

    pub fn admin_service(&self) -> AdminService {
        AdminService::new(Arc::clone(&self.store))
    }
}
