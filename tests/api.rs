use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use backend::{AppState, config::Config, router::create_router};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

/// Router over a lazy pool: routes that fail validation never touch the
/// database, so these run without one.
fn test_app() -> axum::Router {
    let config = Config {
        database_url: "postgres://localhost:1/unused".into(),
        server_host: "::".into(),
        server_port: 0,
        upload_dir: "uploads".into(),
        max_upload_bytes: 1024 * 1024,
        api_base_uri: "/api".into(),
    };
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    create_router(AppState { pool, config })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_app()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn register_rejects_unknown_role() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/users",
            r#"{"email": "a@b.com", "name": "Ada", "role": "admin"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("role"));
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/users",
            r#"{"email": "not-an-email", "name": "Ada", "role": "student"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn status_update_rejects_values_outside_enum() {
    let response = test_app()
        .oneshot(json_request(
            "PATCH",
            "/api/requests/some-id/status",
            r#"{"status": "cancelled"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("status"));
}

#[tokio::test]
async fn subject_create_rejects_empty_name() {
    let response = test_app()
        .oneshot(json_request("POST", "/api/subjects", r#"{"name": "  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = test_app()
        .oneshot(Request::get("/api/reviews").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
