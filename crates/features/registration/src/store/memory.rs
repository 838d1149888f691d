use super::RegistrationStore;
use crate::error::RegistrationError;
use crate::export::Document;
use crate::model::{NaturalKey, Registration};
use async_trait::async_trait;
use parking_lot::RwLock;

/// In-process store keeping registrations in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRegistrationStore {
    rows: RwLock<Vec<Registration>>,
}

impl MemoryRegistrationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, RegistrationError> {
        Ok(self.rows.read().iter().any(|r| r.roll_number == key.roll_number && r.email == key.email))
    }

    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationError> {
        let mut rows = self.rows.write();
        // Re-check under the write lock so racing inserts cannot both pass.
        if rows.iter().any(|r| r.natural_key() == registration.natural_key()) {
            return Err(RegistrationError::duplicate(
                registration.roll_number,
                &registration.email,
            ));
        }
        rows.push(registration.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Document>, RegistrationError> {
        Ok(self.rows.read().iter().map(Registration::to_document).collect())
    }
}
