//! Health endpoint integration test.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_anon};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_ok(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_anon(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].as_str().is_some());
}
