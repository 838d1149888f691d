use rollcall_database::DatabaseError;
use rollcall_kernel::security::AccessError;
use std::borrow::Cow;

/// Errors of the registration slice.
#[rollcall_derive::rollcall_error]
pub enum RegistrationError {
    /// The store is unreachable or refused the credentials.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The submitted record does not satisfy the form rules.
    #[error("Invalid data format{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A registration with the same roll number and email is already stored.
    #[error("Data with this roll number & email already exists{}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Authorization { source: AccessError, context: Option<Cow<'static, str>> },

    #[error("Failed to export CSV{}: {message}", format_context(.context))]
    Export { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store error{}: {source}", format_context(.context))]
    Store {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal registration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistrationError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub(crate) fn duplicate(roll_number: i64, email: &str) -> Self {
        Self::Duplicate { message: format!("{roll_number}/{email}").into(), context: None }
    }

    /// Sorts a store failure into connectivity, uniqueness or generic store errors.
    pub(crate) fn from_store(error: DatabaseError, context: &'static str) -> Self {
        match error {
            DatabaseError::Connection { message, .. } | DatabaseError::Auth { message, .. } => {
                Self::Connection { message, context: Some(context.into()) }
            },
            e if e.is_conflict() => {
                Self::Duplicate { message: e.to_string().into(), context: Some(context.into()) }
            },
            e => Self::Store { source: e, context: Some(context.into()) },
        }
    }

    /// Text safe to return to the browser.
    #[must_use]
    pub fn public_message(&self) -> Cow<'static, str> {
        match self {
            Self::Validation { .. } | Self::Authorization { .. } => self.to_string().into(),
            Self::Duplicate { .. } => "Data with this roll number & email already exists".into(),
            Self::Connection { .. } => "Database connection failed".into(),
            Self::Export { .. } => "Failed to export CSV".into(),
            Self::Store { .. } | Self::Internal { .. } => "Failed to submit data".into(),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::RegistrationError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use rollcall_kernel::server::ApiMessage;
    use tracing::{error, warn};

    impl RegistrationError {
        #[must_use]
        pub const fn status(&self) -> StatusCode {
            match self {
                Self::Validation { .. } => StatusCode::BAD_REQUEST,
                Self::Duplicate { .. } => StatusCode::CONFLICT,
                Self::Authorization { .. } => StatusCode::FORBIDDEN,
                Self::Connection { .. }
                | Self::Export { .. }
                | Self::Store { .. }
                | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for RegistrationError {
        fn into_response(self) -> Response {
            let status = self.status();
            if status.is_server_error() {
                error!(error = %self, %status, "Registration request failed");
            } else {
                warn!(error = %self, %status, "Registration request rejected");
            }
            ApiMessage::fail(self.public_message()).with_status(status)
        }
    }
}
