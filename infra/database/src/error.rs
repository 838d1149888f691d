use std::borrow::Cow;

/// Errors raised by the database adapter.
#[rollcall_derive::rollcall_error]
pub enum DatabaseError {
    /// Missing or malformed builder parameters and identifiers.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The engine could not be opened, timed out or failed its health probe.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Root credentials were rejected.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },
}

/// Fragment SurrealDB puts in unique index violations.
const UNIQUE_VIOLATION: &str = "already contains";

impl DatabaseError {
    /// `true` when the store rejected a write because a unique index already holds the key.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Surreal { source, .. } => source.to_string().contains(UNIQUE_VIOLATION),
            _ => false,
        }
    }
}
