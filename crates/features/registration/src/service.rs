use crate::error::RegistrationError;
use crate::export::to_csv;
use crate::model::Registration;
use crate::store::RegistrationStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Ingestion and export on top of a [`RegistrationStore`].
#[derive(Debug, Clone)]
pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
}

impl RegistrationService {
    #[must_use]
    pub fn new(store: Arc<dyn RegistrationStore>) -> Self {
        Self { store }
    }

    /// Validates `record` and stores it unless its natural key is already taken.
    ///
    /// # Errors
    /// * [`RegistrationError::Validation`] if the record breaks a field rule.
    /// * [`RegistrationError::Duplicate`] if (`roll_number`, `email`) is already stored.
    /// * [`RegistrationError::Connection`] or [`RegistrationError::Store`] on store failures.
    #[instrument(skip_all)]
    pub async fn submit(&self, record: Value) -> Result<Registration, RegistrationError> {
        let registration = Registration::parse(record)?;
        let key = registration.natural_key();

        if self.store.exists(&key).await? {
            return Err(RegistrationError::duplicate(key.roll_number, &key.email));
        }
        self.store.insert(&registration).await?;

        info!(roll_number = key.roll_number, "Registration stored");
        Ok(registration)
    }

    /// All stored registrations as CSV.
    ///
    /// # Errors
    /// [`RegistrationError::Export`] if the store cannot be read.
    #[instrument(skip_all)]
    pub async fn export_csv(&self) -> Result<String, RegistrationError> {
        let documents = self.store.find_all().await.map_err(|e| RegistrationError::Export {
            message: e.to_string().into(),
            context: Some("Reading registrations".into()),
        })?;

        info!(rows = documents.len(), "Registrations exported");
        Ok(to_csv(&documents))
    }
}
