pub mod admin;
pub mod booking;

pub use admin::AdminService;
pub use booking::BookingService;
