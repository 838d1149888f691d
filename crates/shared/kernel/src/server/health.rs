use super::response::ApiMessage;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rollcall_database::Database;
use rollcall_derive::api_handler;
use rollcall_domain::constants::SYSTEM_TAG;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::error;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

const NO_CACHE: [(header::HeaderName, &str); 2] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
    (header::PRAGMA, "no-cache"),
];

/// Reports liveness after making sure the store is reachable.
#[api_handler(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Server and database are up", body = HealthResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Database connection failed", body = ApiMessage),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(db): State<Database>) -> Response {
    if let Err(e) = db.connect().await {
        error!(error = %e, "Health check failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            NO_CACHE,
            Json(ApiMessage::fail("Database connection failed")),
        )
            .into_response();
    }

    let body = HealthResponse {
        success: true,
        message: "Server is running! DB Connected",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (NO_CACHE, Json(body)).into_response()
}
