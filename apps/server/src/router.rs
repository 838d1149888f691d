use anyhow::{Context, Result};
use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use rollcall::domain::config::CorsConfig;
use rollcall::kernel::prelude::ApiState;
use rollcall::server::router::{registration_router, system_router};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "Rollcall", description = "Registration form intake and CSV export"),
    tags(
        (name = "System", description = "Service health"),
        (name = "Registration", description = "Form submission and export"),
    )
)]
struct ApiDoc;

/// The full HTTP application: API routes, CORS, tracing and the Scalar UI at `/docs`.
///
/// # Errors
/// Returns an error if the configured CORS origin is not a valid header value.
pub fn app(state: ApiState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors)?;

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(registration_router())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/docs", api_doc);

    Ok(Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .layer(middleware::from_fn(answer_options))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(&cfg.allowed_origin)
        .with_context(|| format!("Invalid CORS origin: {}", cfg.allowed_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(cfg.max_age_seconds)))
}

/// OPTIONS requests that are not CORS preflights still get an empty 200.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
