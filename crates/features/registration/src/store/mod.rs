//! Persistence seam for registrations.
//!
//! [`SurrealRegistrationStore`] is the production backend; [`MemoryRegistrationStore`]
//! backs tests and local runs without a database.

mod memory;
mod surreal;

pub use memory::MemoryRegistrationStore;
pub use surreal::SurrealRegistrationStore;

use crate::error::RegistrationError;
use crate::export::Document;
use crate::model::{NaturalKey, Registration};
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait RegistrationStore: Send + Sync + Debug {
    /// `true` if a registration with this natural key is stored.
    async fn exists(&self, key: &NaturalKey) -> Result<bool, RegistrationError>;

    /// Stores a new registration.
    ///
    /// Fails with [`RegistrationError::Duplicate`] when the natural key is taken,
    /// even if a concurrent insert won the race after [`RegistrationStore::exists`].
    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationError>;

    /// Every stored registration as a document, in store order.
    async fn find_all(&self) -> Result<Vec<Document>, RegistrationError>;
}
