pub mod credentials;
pub mod session;

pub use credentials::{ConfiguredCredentials, CredentialStore};
pub use session::SessionService;
