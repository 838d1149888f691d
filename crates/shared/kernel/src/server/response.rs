use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

/// `{"success": bool, "message": "..."}` envelope returned by every JSON route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApiMessage {
    pub success: bool,
    #[schema(value_type = String)]
    pub message: Cow<'static, str>,
}

impl ApiMessage {
    pub fn ok(message: impl Into<Cow<'static, str>>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn fail(message: impl Into<Cow<'static, str>>) -> Self {
        Self { success: false, message: message.into() }
    }

    /// Pairs the envelope with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        let status = if self.success { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };
        self.with_status(status)
    }
}
