//! # Registration
//!
//! The registration form slice: an untyped submission is validated into a
//! [`Registration`], checked against the (`roll_number`, `email`) natural key and
//! stored once. Stored registrations can be exported as CSV behind the admin key.
//!
//! With the `server` feature the slice also provides its axum routes
//! (`POST /submit`, `GET /to_csv` and its `/export` alias).

mod error;
pub mod export;
#[cfg(feature = "server")]
mod handlers;
mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use crate::error::{RegistrationError, RegistrationErrorExt};
pub use crate::export::{Document, to_csv};
#[cfg(feature = "server")]
pub use crate::handlers::router;
pub use crate::model::{FIELDS, Gender, NATURAL_KEY_FIELDS, NaturalKey, Registration};
pub use crate::service::RegistrationService;
pub use crate::store::{MemoryRegistrationStore, RegistrationStore, SurrealRegistrationStore};
pub use crate::validation::validate;

use rollcall_database::Database;
use rollcall_kernel::domain::config::ApiConfig;
use rollcall_kernel::domain::registry::InitializedSlice;
use rollcall_kernel::security::SharedSecret;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration feature state.
#[rollcall_derive::rollcall_slice]
pub struct Registrations {
    pub service: RegistrationService,
    /// `None` disables CSV export.
    pub admin_key: Option<SharedSecret>,
}

/// Initializes the slice against the configured `SurrealDB` table.
///
/// # Errors
/// Returns [`RegistrationError::Store`] if the configured collection name is invalid.
pub fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, RegistrationError> {
    let store = SurrealRegistrationStore::new(database.clone(), &config.database.collection)?;
    Ok(init_with_store(config, Arc::new(store)))
}

/// Initializes the slice on top of any store.
#[must_use]
pub fn init_with_store(config: &ApiConfig, store: Arc<dyn RegistrationStore>) -> InitializedSlice {
    let admin_key = config.security.admin_key.as_deref().and_then(SharedSecret::new);
    if admin_key.is_none() {
        warn!("Admin key not configured; CSV export is disabled");
    }

    let slice = Registrations::new(RegistrationsInner {
        service: RegistrationService::new(store),
        admin_key,
    });

    info!("Registration slice initialized");
    InitializedSlice::new(slice)
}
