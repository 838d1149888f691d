//! # Database Infrastructure
//!
//! A lazily connected [SurrealDB](https://surrealdb.com) handle shared by every
//! request of the Rollcall server.
//!
//! ## Key Features
//! - **Engine Agnostic**: `mem://`, `rocksdb://`, `ws://`/`wss://` and `http://`/`https://` via the `any` engine.
//! - **Lazy & Idempotent**: [`Database::build`](DatabaseBuilder::build) never touches the network;
//!   the first [`Database::connect`] opens the client and later calls reuse it.
//! - **Explicit Lifecycle**: [`Database::close`] drops the client; the next `connect` starts fresh.
//!
//! ## Example
//!
//! ```rust
//! use rollcall_database::{Database, DatabaseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder().url("mem://").session("rollcall", "registration").build()?;
//!
//!     let registrations = db.collection("registrations").await?;
//!     registrations.ensure_unique_index("registrations_natural_key", &["roll_number", "email"]).await?;
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{DatabaseError, DatabaseErrorExt};

use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
struct Credentials {
    username: String,
    password: String,
}

/// Shared state of the [`Database`] handle.
#[derive(Debug)]
pub struct DatabaseInner {
    url: String,
    ns: String,
    db: String,
    credentials: Option<Credentials>,
    connect_timeout: Duration,
    client: Mutex<Option<Surreal<Any>>>,
    /// Bumped on every freshly opened client.
    generation: AtomicU64,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        debug!(ns = %self.ns, db = %self.db, "SurrealDB handle dropped");
    }
}

/// Cloneable handle owning at most one live `SurrealDB` client.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// Returns the live client, opening it on first use.
    ///
    /// Concurrent callers are serialized, so at most one client is ever opened.
    /// A failed attempt leaves nothing cached and the next call starts over.
    ///
    /// # Process
    /// 1. Open the engine, bounded by the connect timeout.
    /// 2. Single health probe.
    /// 3. Root sign-in when credentials are configured.
    /// 4. Select namespace and database.
    ///
    /// # Errors
    /// * [`DatabaseError::Connection`] if the engine cannot be opened in time or is unhealthy.
    /// * [`DatabaseError::Auth`] if the credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the namespace or database cannot be selected.
    #[instrument(skip(self), fields(url = %self.inner.url, ns = %self.inner.ns, db = %self.inner.db))]
    pub async fn connect(&self) -> Result<Surreal<Any>, DatabaseError> {
        self.connect_tracked().await.map(|(client, _)| client)
    }

    /// The live client together with the generation it was opened in.
    async fn connect_tracked(&self) -> Result<(Surreal<Any>, u64), DatabaseError> {
        let mut slot = self.inner.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok((client.clone(), self.inner.generation.load(Ordering::Acquire)));
        }

        let client = self.open().await?;
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *slot = Some(client.clone());
        Ok((client, generation))
    }

    /// Number of clients opened so far; changes whenever a fresh client replaces a closed one.
    ///
    /// Schema defined through an earlier generation may be gone (e.g. a new `mem://` store).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    async fn open(&self) -> Result<Surreal<Any>, DatabaseError> {
        let inner = &self.inner;

        let client = tokio::time::timeout(inner.connect_timeout, connect(inner.url.as_str()))
            .await
            .map_err(|_| DatabaseError::Connection {
                message: format!("Timed out after {:?}", inner.connect_timeout).into(),
                context: Some(inner.url.clone().into()),
            })?
            .map_err(|e| DatabaseError::Connection {
                message: e.to_string().into(),
                context: Some("Initializing engine".into()),
            })?;

        client.health().await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Health probe".into()),
        })?;

        if let Some(Credentials { username, password }) = &inner.credentials {
            client
                .signin(Root { username: username.clone(), password: password.clone() })
                .await
                .map_err(|e| DatabaseError::Auth {
                    message: e.to_string().into(),
                    context: Some(inner.url.clone().into()),
                })?;
        }

        client.use_ns(&inner.ns).use_db(&inner.db).await.context("Activating session")?;

        let version =
            client.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %inner.ns, database = %inner.db, %version, "SurrealDB connection established");

        Ok(client)
    }

    /// Drops the cached client. A no-op when nothing is connected.
    #[instrument(skip(self))]
    pub async fn close(&self) {
        if self.inner.client.lock().await.take().is_some() {
            info!(ns = %self.inner.ns, db = %self.inner.db, "SurrealDB connection closed");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.client.lock().await.is_some()
    }

    /// Handle to the table `name`, connecting first if needed.
    ///
    /// # Errors
    /// [`DatabaseError::Validation`] if `name` is not a plain identifier, or any
    /// error from [`Database::connect`].
    pub async fn collection(&self, name: &str) -> Result<Collection, DatabaseError> {
        validate_identifier(name, "collection")?;
        let (client, generation) = self.connect_tracked().await?;
        Ok(Collection { client, name: name.to_owned(), generation })
    }
}

/// A connected client bound to one table.
#[derive(Debug, Clone)]
pub struct Collection {
    client: Surreal<Any>,
    name: String,
    generation: u64,
}

impl Collection {
    /// [`Database::generation`] of the client behind this handle.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Defines a unique index over `fields`; re-running replaces the definition.
    ///
    /// # Errors
    /// [`DatabaseError::Validation`] for non-identifier names, or the store's error
    /// if the definition fails (e.g. existing rows already violate it).
    #[instrument(skip(self), fields(table = %self.name))]
    pub async fn ensure_unique_index(
        &self,
        index: &str,
        fields: &[&str],
    ) -> Result<(), DatabaseError> {
        validate_identifier(index, "index")?;
        if fields.is_empty() {
            return Err(DatabaseError::Validation {
                message: "At least one field is required".into(),
                context: Some(index.to_owned().into()),
            });
        }
        for field in fields {
            validate_identifier(field, "field")?;
        }

        let statement = format!(
            "DEFINE INDEX OVERWRITE {index} ON TABLE {table} FIELDS {fields} UNIQUE",
            table = self.name,
            fields = fields.join(", "),
        );

        self.client
            .query(statement)
            .await
            .context(format!("Defining index {index}"))?
            .check()
            .map_err(surrealdb::Error::from)?;

        debug!(index, "Unique index ensured");
        Ok(())
    }
}

impl Deref for Collection {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Builder validating connection parameters without opening the engine.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    credentials: Option<Credentials>,
    connect_timeout: Option<Duration>,
}

impl DatabaseBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Root credentials used right after the engine is opened.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials =
            Some(Credentials { username: username.into(), password: password.into() });
        self
    }

    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// # Errors
    /// [`DatabaseError::Validation`] if the URL, namespace or database is missing or blank.
    pub fn build(self) -> Result<Database, DatabaseError> {
        let url = required(self.url, "URL is required")?;
        let ns = required(self.ns, "Namespace is required")?;
        let db = required(self.db, "Database is required")?;

        Ok(Database {
            inner: Arc::new(DatabaseInner {
                url,
                ns,
                db,
                credentials: self.credentials,
                connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
                client: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        })
    }
}

fn required(value: Option<String>, message: &'static str) -> Result<String, DatabaseError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(DatabaseError::Validation { message: message.into(), context: None })
}

/// Checks that `name` is safe to splice into SurrealQL as a table, index or field name.
///
/// # Errors
/// [`DatabaseError::Validation`] unless `name` matches `[A-Za-z0-9_]+`.
pub fn validate_identifier(name: &str, kind: &'static str) -> Result<(), DatabaseError> {
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        Ok(())
    } else {
        Err(DatabaseError::Validation {
            message: format!("Invalid {kind} name '{name}'").into(),
            context: Some("Expected [A-Za-z0-9_]+".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_plain() {
        assert!(validate_identifier("registrations", "collection").is_ok());
        assert!(validate_identifier("reg_2024", "collection").is_ok());
        assert!(validate_identifier("", "collection").is_err());
        assert!(validate_identifier("users; REMOVE TABLE x", "collection").is_err());
        assert!(validate_identifier("a-b", "collection").is_err());
    }

    #[test]
    fn blank_parameters_are_rejected() {
        let err = Database::builder().url("  ").session("ns", "db").build().unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { .. }));
    }

    #[test]
    fn timeout_defaults_when_unset() {
        let db = Database::builder().url("mem://").session("ns", "db").build().unwrap();
        assert_eq!(db.inner.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }
}
