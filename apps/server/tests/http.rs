use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use rollcall::domain::config::ApiConfig;
use rollcall::features::registration::{
    self, Document, MemoryRegistrationStore, NaturalKey, Registration, RegistrationError,
    RegistrationStore,
};
use rollcall::kernel::server::ApiState;
use rollcall_database::Database;
use rollcall_server::app;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

const ADMIN_KEY: &str = "let-me-in";

/// Memory store that counts full reads.
#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryRegistrationStore,
    reads: AtomicUsize,
}

#[async_trait]
impl RegistrationStore for CountingStore {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, RegistrationError> {
        self.inner.exists(key).await
    }

    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationError> {
        self.inner.insert(registration).await
    }

    async fn find_all(&self) -> Result<Vec<Document>, RegistrationError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }
}

fn router(admin_key: Option<&str>, store: Arc<CountingStore>) -> Router {
    let mut config = ApiConfig::default();
    config.security.admin_key = admin_key.map(str::to_owned);

    let database = Database::builder().url("mem://").session("test", "http").build().expect("db");
    let slice = registration::init_with_store(&config, store);
    let state = ApiState::builder()
        .config(config)
        .db(database)
        .register_slice(slice)
        .build()
        .expect("state");

    app(state).expect("app")
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("response")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn submit(body: impl Into<Body>) -> Request<Body> {
    Request::post("/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request")
}

fn form(roll_number: i64, email: &str) -> String {
    json!({
        "name": "Ada Lovelace",
        "roll_number": roll_number,
        "gender": "F",
        "email": email,
        "about": "Analytical engines",
    })
    .to_string()
}

fn export(query: &str) -> Request<Body> {
    Request::get(format!("/to_csv{query}")).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn submit_stores_and_rejects_duplicates() {
    let store = Arc::new(CountingStore::default());
    let router = router(Some(ADMIN_KEY), store.clone());

    let response = send(&router, submit(form(1, "ada@example.com"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Data submitted successfully!" })
    );

    let response = send(&router, submit(form(1, "ada@example.com"))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Data with this roll number & email already exists" })
    );
    assert_eq!(store.inner.len(), 1);
}

#[tokio::test]
async fn invalid_submissions_are_bad_requests() {
    let store = Arc::new(CountingStore::default());
    let router = router(Some(ADMIN_KEY), store.clone());

    let response = send(&router, submit(r#"{"name": "Ada"}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Invalid data format")));

    let response = send(&router, submit("{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);

    assert_eq!(store.inner.len(), 0);
}

#[tokio::test]
async fn export_requires_the_admin_key() {
    let store = Arc::new(CountingStore::default());
    let router = router(Some(ADMIN_KEY), store.clone());

    for (query, message) in [
        ("", "Forbidden: Admin key required"),
        ("?key=", "Forbidden: Admin key required"),
        ("?key=wrong", "Forbidden: Invalid admin key"),
        ("?key=wrong&key=let-me-in", "Forbidden: Invalid admin key"),
    ] {
        let response = send(&router, export(query)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "query {query:?}");
        assert_eq!(json_body(response).await, json!({ "success": false, "message": message }));
    }

    assert_eq!(store.reads.load(Ordering::SeqCst), 0, "store read before the key check");
}

#[tokio::test]
async fn export_is_disabled_without_a_configured_key() {
    let store = Arc::new(CountingStore::default());
    let router = router(None, store.clone());

    let response = send(&router, export("?key=anything")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["message"], "Forbidden: Admin key required");
    assert_eq!(store.reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let store = Arc::new(CountingStore::default());
    let router = router(Some(ADMIN_KEY), store.clone());
    send(&router, submit(form(3, "ada@example.com"))).await;

    for path in ["/to_csv?key=let-me-in", "/export?key=let-me-in&key=ignored"] {
        let response =
            send(&router, Request::get(path).body(Body::empty()).expect("request")).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=data.csv"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let csv = String::from_utf8(bytes.to_vec()).expect("utf-8");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(registration::FIELDS.join(",").as_str()));
        assert!(lines.next().is_some_and(|row| row.starts_with("\"Ada Lovelace\",3,\"F\"")));
        assert_eq!(lines.next(), None);
    }

    assert_eq!(store.reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn every_options_request_gets_an_empty_ok() {
    let router = router(Some(ADMIN_KEY), Arc::new(CountingStore::default()));

    for path in ["/submit", "/to_csv", "/nowhere"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .expect("request");
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn preflight_allows_only_the_configured_origin() {
    let router = router(Some(ADMIN_KEY), Arc::new(CountingStore::default()));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/submit")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request");
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_MAX_AGE], "3600");
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let router = router(Some(ADMIN_KEY), Arc::new(CountingStore::default()));

    let response =
        send(&router, Request::get("/submit").body(Body::empty()).expect("request")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn docs_and_health_are_served() {
    let router = router(Some(ADMIN_KEY), Arc::new(CountingStore::default()));

    let response = send(&router, Request::get("/docs").body(Body::empty()).expect("request")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        send(&router, Request::get("/health").body(Body::empty()).expect("request")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
}
