//! End-to-end tests against a real Postgres database. They run the full
//! router over a live pool and are skipped when `DATABASE_URL` is not set.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use backend::{AppState, config::Config, database::schema, router::create_router};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Option<Router> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()?;
    schema::run(&pool).await.ok()?;

    let config = Config {
        database_url: url,
        server_host: "::".into(),
        server_port: 0,
        upload_dir: "uploads".into(),
        max_upload_bytes: 1024 * 1024,
        api_base_uri: "/api".into(),
    };
    Some(create_router(AppState { pool, config }))
}

macro_rules! require_db {
    () => {
        match test_app().await {
            Some(app) => app,
            None => {
                eprintln!("skipping: DATABASE_URL not set");
                return;
            }
        }
    };
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a user with a unique email; returns (user_id, profile_id, email).
async fn register(app: &Router, role: &str) -> (String, String, String) {
    let email = format!("{}@example.com", Uuid::new_v4());
    let body = format!(r#"{{"email": "{email}", "name": "Test {role}", "role": "{role}"}}"#);
    let (status, json) = send(app, "POST", "/api/users", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        json["user_id"].as_str().unwrap().to_owned(),
        json["profile_id"].as_str().unwrap().to_owned(),
        email,
    )
}

async fn create_subject(app: &Router) -> String {
    let body = format!(r#"{{"name": "Subject {}"}}"#, Uuid::new_v4());
    let (status, json) = send(app, "POST", "/api/subjects", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let app = require_db!();

    let email = format!("{}@example.com", Uuid::new_v4());
    let body = format!(r#"{{"email": "{email}", "name": "First", "role": "student"}}"#);
    let (status, _) = send(&app, "POST", "/api/users", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let body = format!(r#"{{"email": "{email}", "name": "Second", "role": "student"}}"#);
    let (status, json) = send(&app, "POST", "/api/users", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("already in use"));
}

#[tokio::test]
async fn missing_referent_rejected_before_insert() {
    let app = require_db!();

    let (_, teacher_id, _) = register(&app, "teacher").await;
    let body = format!(
        r#"{{"teacher_id": "{teacher_id}", "subject_id": "{}",
            "title": "Algebra", "price": 20.0}}"#,
        Uuid::new_v4()
    );
    let (status, _) = send(&app, "POST", "/api/classes", Some(&body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let subject_id = create_subject(&app).await;
    let body = format!(
        r#"{{"student_id": "{}", "teacher_id": "{teacher_id}", "subject_id": "{subject_id}"}}"#,
        Uuid::new_v4()
    );
    let (status, _) = send(&app, "POST", "/api/requests", Some(&body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subject_delete_blocked_while_referenced() {
    let app = require_db!();

    let (_, teacher_id, _) = register(&app, "teacher").await;
    let subject_id = create_subject(&app).await;
    let body = format!(
        r#"{{"teacher_id": "{teacher_id}", "subject_id": "{subject_id}",
            "title": "Algebra 101", "price": 25.0}}"#
    );
    let (status, class) = send(&app, "POST", "/api/classes", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) =
        send(&app, "DELETE", &format!("/api/subjects/{subject_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("in use"));

    // the subject row survives the rejected delete
    let (status, _) = send(&app, "GET", &format!("/api/subjects/{subject_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let class_id = class["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
        send(&app, "DELETE", &format!("/api/subjects/{subject_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn status_update_notifies_student_once_with_template() {
    let app = require_db!();

    let (student_user, student_id, _) = register(&app, "student").await;
    let (_, teacher_id, _) = register(&app, "teacher").await;
    let subject_id = create_subject(&app).await;

    let body = format!(
        r#"{{"student_id": "{student_id}", "teacher_id": "{teacher_id}",
            "subject_id": "{subject_id}", "message": "evenings only"}}"#
    );
    let (status, request) = send(&app, "POST", "/api/requests", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");
    let request_id = request["id"].as_str().unwrap();

    // creation notified the teacher, not the student
    let uri = format!("/api/notifications/user/{student_user}");
    let (_, before) = send(&app, "GET", &uri, None).await;
    assert_eq!(before.as_array().unwrap().len(), 0);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/requests/{request_id}/status"),
        Some(r#"{"status": "accepted"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "accepted");

    let (_, after) = send(&app, "GET", &uri, None).await;
    let notifications = after.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "Request accepted");
}

#[tokio::test]
async fn subscription_lifecycle_flips_flag_and_dates() {
    let app = require_db!();

    let (_, teacher_id, _) = register(&app, "teacher").await;
    let (_, plans) = send(&app, "GET", "/api/subscriptions/plans", None).await;
    let plan_id = plans[0]["id"].as_str().unwrap().to_owned();

    let body = format!(
        r#"{{"teacher_id": "{teacher_id}", "plan_id": "{plan_id}",
            "is_yearly": false, "start_date": "2026-03-01"}}"#
    );
    let (status, subscription) = send(&app, "POST", "/api/subscriptions", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["end_date"], "2026-03-31");
    assert_eq!(subscription["payment_status"], "completed");

    let teacher_uri = format!("/api/teachers/{teacher_id}");
    let (_, teacher) = send(&app, "GET", &teacher_uri, None).await;
    assert_eq!(teacher["is_subscribed"], true);

    let subscription_id = subscription["id"].as_str().unwrap();
    let (status, cancelled) = send(
        &app,
        "POST",
        &format!("/api/subscriptions/{subscription_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let today = chrono::Utc::now().date_naive().to_string();
    assert_eq!(cancelled["end_date"], today);

    let (_, teacher) = send(&app, "GET", &teacher_uri, None).await;
    assert_eq!(teacher["is_subscribed"], false);

    // yearly runs 365 days
    let body = format!(
        r#"{{"teacher_id": "{teacher_id}", "plan_id": "{plan_id}",
            "is_yearly": true, "start_date": "2026-03-01"}}"#
    );
    let (status, subscription) = send(&app, "POST", "/api/subscriptions", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["end_date"], "2027-03-01");
}

#[tokio::test]
async fn mark_all_read_is_idempotent() {
    let app = require_db!();

    let (user_id, _, _) = register(&app, "student").await;
    for n in 1..=2 {
        let body = format!(
            r#"{{"user_id": "{user_id}", "title": "Hello {n}", "message": "test"}}"#
        );
        let (status, _) = send(&app, "POST", "/api/notifications", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/notifications/user/{user_id}/read-all");
    let (status, json) = send(&app, "PATCH", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["affected"], 2);

    // second call is a no-op that still succeeds
    let (status, json) = send(&app, "PATCH", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["affected"], 0);

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/notifications/user/{user_id}"),
        None,
    )
    .await;
    assert!(list.as_array().unwrap().iter().all(|n| n["is_read"] == true));
}

#[tokio::test]
async fn user_email_patch_enforces_uniqueness() {
    let app = require_db!();

    let (first_user, _, _) = register(&app, "student").await;
    let (_, _, taken_email) = register(&app, "student").await;

    let uri = format!("/api/users/{first_user}");
    let body = format!(r#"{{"email": "{taken_email}"}}"#);
    let (status, json) = send(&app, "PUT", &uri, Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("already in use"));

    let fresh_email = format!("{}@example.com", Uuid::new_v4());
    let body = format!(r#"{{"email": "{fresh_email}"}}"#);
    let (status, json) = send(&app, "PUT", &uri, Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], fresh_email.as_str());

    // absent fields stay untouched
    let (status, json) = send(&app, "PUT", &uri, Some(r#"{"name": "Renamed"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], fresh_email.as_str());
    assert_eq!(json["name"], "Renamed");
}
