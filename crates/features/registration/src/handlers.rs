use crate::Registrations;
use crate::error::RegistrationError;
use crate::model::Registration;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rollcall_derive::api_handler;
use rollcall_domain::constants::REGISTRATION_TAG;
use rollcall_kernel::security::SharedSecret;
use rollcall_kernel::server::{ApiMessage, ApiState};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes of the registration slice. `/export` is an undocumented alias of `/to_csv`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(submit_handler))
        .routes(routes!(export_handler))
        .route("/export", get(export_handler))
}

fn slice(state: &ApiState) -> Result<&Registrations, RegistrationError> {
    state.try_get_slice::<Registrations>().map_err(|e| RegistrationError::Internal {
        message: e.to_string().into(),
        context: Some("Registration slice not registered".into()),
    })
}

/// Validates and stores one registration form submission.
#[api_handler(
    post,
    path = "/submit",
    request_body = Registration,
    responses(
        (status = OK, description = "Registration stored", body = ApiMessage),
        (status = BAD_REQUEST, description = "Malformed body or invalid field", body = ApiMessage),
        (status = CONFLICT, description = "Roll number and email already registered", body = ApiMessage),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ApiMessage),
    ),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn submit_handler(
    State(state): State<ApiState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiMessage, RegistrationError> {
    let Json(record) =
        payload.map_err(|rejection| RegistrationError::validation(rejection.body_text()))?;

    slice(&state)?.service.submit(record).await?;
    Ok(ApiMessage::ok("Data submitted successfully!"))
}

/// Downloads every registration as CSV. Requires the admin key.
#[api_handler(
    get,
    path = "/to_csv",
    params(("key" = Option<String>, Query, description = "Admin key; the first value wins when repeated")),
    responses(
        (status = OK, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = FORBIDDEN, description = "Missing or invalid admin key", body = ApiMessage),
        (status = INTERNAL_SERVER_ERROR, description = "Export failed", body = ApiMessage),
    ),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn export_handler(
    State(state): State<ApiState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, RegistrationError> {
    let registrations = slice(&state)?;
    let key = params.iter().find(|(name, _)| name == "key").map(|(_, value)| value.as_str());

    SharedSecret::authorize(registrations.admin_key.as_ref(), key)?;

    let csv = registrations.service.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=data.csv"),
        ],
        csv,
    )
        .into_response())
}
