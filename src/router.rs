use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};
use tower_http::services::ServeDir;

use crate::{AppState, middleware::log_errors, routes};

/// The full application router, reused by the integration tests.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        // users
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::register),
        )
        .route(
            "/users/{id}",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/users/{id}/photo", post(routes::users::upload_photo))
        // students
        .route("/students", get(routes::students::list_students))
        .route(
            "/students/{id}",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        // teachers
        .route("/teachers", get(routes::teachers::list_teachers))
        .route(
            "/teachers/{id}",
            get(routes::teachers::get_teacher)
                .put(routes::teachers::update_teacher)
                .delete(routes::teachers::delete_teacher),
        )
        .route(
            "/teachers/{id}/subjects",
            get(routes::teachers::list_teacher_subjects)
                .post(routes::teachers::add_teacher_subject),
        )
        .route(
            "/teachers/{id}/subjects/{subject_id}",
            delete(routes::teachers::remove_teacher_subject),
        )
        // subjects
        .route(
            "/subjects",
            get(routes::subjects::list_subjects).post(routes::subjects::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(routes::subjects::get_subject)
                .put(routes::subjects::update_subject)
                .delete(routes::subjects::delete_subject),
        )
        // classes
        .route(
            "/classes",
            get(routes::classes::list_classes).post(routes::classes::create_class),
        )
        .route(
            "/classes/{id}",
            get(routes::classes::get_class)
                .put(routes::classes::update_class)
                .delete(routes::classes::delete_class),
        )
        // requests
        .route(
            "/requests",
            get(routes::requests::list_requests).post(routes::requests::create_request),
        )
        .route(
            "/requests/{id}",
            get(routes::requests::get_request).delete(routes::requests::delete_request),
        )
        .route(
            "/requests/{id}/status",
            patch(routes::requests::update_request_status),
        )
        // subscriptions
        .route(
            "/subscriptions",
            get(routes::subscriptions::list_subscriptions)
                .post(routes::subscriptions::create_subscription),
        )
        .route("/subscriptions/plans", get(routes::subscriptions::list_plans))
        .route(
            "/subscriptions/{id}",
            get(routes::subscriptions::get_subscription),
        )
        .route(
            "/subscriptions/{id}/cancel",
            post(routes::subscriptions::cancel_subscription),
        )
        // notifications
        .route(
            "/notifications",
            post(routes::notifications::create_notification),
        )
        .route(
            "/notifications/{id}",
            delete(routes::notifications::delete_notification),
        )
        .route(
            "/notifications/{id}/read",
            patch(routes::notifications::mark_notification_read),
        )
        .route(
            "/notifications/user/{user_id}",
            get(routes::notifications::list_user_notifications),
        )
        .route(
            "/notifications/user/{user_id}/read-all",
            patch(routes::notifications::mark_all_read),
        )
        .route(
            "/notifications/user/{user_id}/read",
            delete(routes::notifications::delete_read_notifications),
        );

    let router = Router::new()
        .nest(&state.config.api_base_uri, api)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(axum::middleware::from_fn(log_errors))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
