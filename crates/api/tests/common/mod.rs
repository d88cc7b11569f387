#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use pawlink_api::config::ServerConfig;
use pawlink_api::engine::audit::{AuditWriter, PgAuditStore};
use pawlink_api::middleware::identity::USER_ID_HEADER;
use pawlink_api::routes;
use pawlink_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        soft_delete_retention_days: 90,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let audit_store = Arc::new(PgAuditStore::new(pool.clone()));
    let audit = Arc::new(AuditWriter::new(audit_store, pool.clone()));

    let state = AppState {
        pool,
        config: Arc::new(config),
        audit,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(user_id) = user_id {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// GET `path` as `user_id`.
pub async fn get(app: &Router, path: &str, user_id: i64) -> Response {
    send(app, Method::GET, path, Some(user_id), None).await
}

/// GET `path` without an identity header.
pub async fn get_anon(app: &Router, path: &str) -> Response {
    send(app, Method::GET, path, None, None).await
}

/// POST a JSON body to `path` as `user_id`.
pub async fn post_json(
    app: &Router,
    path: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, path, Some(user_id), Some(body)).await
}

/// POST an empty body to `path` as `user_id` (job triggers).
pub async fn post_empty(app: &Router, path: &str, user_id: i64) -> Response {
    send(app, Method::POST, path, Some(user_id), None).await
}

/// POST a JSON body without an identity header.
pub async fn post_json_anon(app: &Router, path: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, path, None, Some(body)).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a post row and return its id. Reports need real content to
/// resolve against.
pub async fn seed_post(pool: &PgPool, author_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (author_id, body) VALUES ($1, 'seed post') RETURNING id",
    )
    .bind(author_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a comment row and return its id.
pub async fn seed_comment(pool: &PgPool, author_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO comments (author_id, body) VALUES ($1, 'seed comment') RETURNING id",
    )
    .bind(author_id)
    .fetch_one(pool)
    .await
    .unwrap()
}
