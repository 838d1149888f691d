use super::RegistrationStore;
use crate::error::RegistrationError;
use crate::export::Document;
use crate::model::{FIELDS, NATURAL_KEY_FIELDS, NaturalKey, Registration, RegistrationRecord};
use async_trait::async_trait;
use rollcall_database::{Collection, Database, validate_identifier};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Registrations kept in one `SurrealDB` table with a unique natural-key index.
#[derive(Debug, Clone)]
pub struct SurrealRegistrationStore {
    db: Database,
    table: String,
    index: String,
    /// Connection generation the natural-key index was last defined in.
    indexed_generation: Arc<Mutex<Option<u64>>>,
}

impl SurrealRegistrationStore {
    /// Binds the store to `table`. Nothing is sent to the database until first use.
    ///
    /// # Errors
    /// [`RegistrationError::Store`] if `table` is not a plain identifier.
    pub fn new(db: Database, table: impl Into<String>) -> Result<Self, RegistrationError> {
        let table = table.into();
        validate_identifier(&table, "collection")
            .map_err(|e| RegistrationError::from_store(e, "Configuring registration store"))?;

        Ok(Self {
            db,
            index: format!("{table}_natural_key"),
            table,
            indexed_generation: Arc::new(Mutex::new(None)),
        })
    }

    /// Connected table handle; the unique index is defined once per opened client.
    async fn collection(&self) -> Result<Collection, RegistrationError> {
        let collection = self
            .db
            .collection(&self.table)
            .await
            .map_err(|e| RegistrationError::from_store(e, "Opening registrations"))?;

        let mut indexed = self.indexed_generation.lock().await;
        if *indexed != Some(collection.generation()) {
            collection
                .ensure_unique_index(&self.index, &NATURAL_KEY_FIELDS)
                .await
                .map_err(|e| RegistrationError::from_store(e, "Defining natural key index"))?;
            *indexed = Some(collection.generation());
        }

        Ok(collection)
    }
}

#[async_trait]
impl RegistrationStore for SurrealRegistrationStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn exists(&self, key: &NaturalKey) -> Result<bool, RegistrationError> {
        let collection = self.collection().await?;
        let query = format!(
            "!(SELECT VALUE id FROM {} WHERE roll_number = $roll_number AND email = $email LIMIT 1).is_empty()",
            self.table
        );

        let found = collection
            .query(query)
            .bind(("roll_number", key.roll_number))
            .bind(("email", key.email.clone()))
            .await
            .map_err(|e| RegistrationError::from_store(e.into(), "Looking up natural key"))?
            .take::<Option<bool>>(0)
            .map_err(|e| RegistrationError::from_store(e.into(), "Reading natural key lookup"))?
            .unwrap_or_default();

        Ok(found)
    }

    #[instrument(skip_all, fields(table = %self.table, roll_number = registration.roll_number))]
    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationError> {
        let collection = self.collection().await?;
        let query = format!("CREATE {}:ulid() CONTENT $document", self.table);

        let created = match collection
            .query(query)
            .bind(("document", RegistrationRecord::from(registration)))
            .await
        {
            Ok(response) => response.check().map(drop).map_err(surrealdb::Error::from),
            Err(e) => Err(e),
        };

        let error = match created {
            Ok(()) => {
                debug!("Registration inserted");
                return Ok(());
            },
            Err(e) => RegistrationError::from_store(e.into(), "Inserting registration"),
        };

        // A racing writer may abort this transaction before the index reports it.
        if matches!(error, RegistrationError::Store { .. }) {
            match self.exists(&registration.natural_key()).await {
                Ok(true) => {
                    return Err(RegistrationError::duplicate(
                        registration.roll_number,
                        &registration.email,
                    ));
                },
                Ok(false) => {},
                Err(recheck) => warn!(error = %recheck, "Natural key re-check after failed insert"),
            }
        }
        Err(error)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn find_all(&self) -> Result<Vec<Document>, RegistrationError> {
        let collection = self.collection().await?;
        let query = format!("SELECT {} FROM {}", FIELDS.join(", "), self.table);

        let records = collection
            .query(query)
            .await
            .map_err(|e| RegistrationError::from_store(e.into(), "Reading registrations"))?
            .take::<Vec<RegistrationRecord>>(0)
            .map_err(|e| RegistrationError::from_store(e.into(), "Decoding registrations"))?;

        Ok(records.into_iter().map(RegistrationRecord::into_document).collect())
    }
}
