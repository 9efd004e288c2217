use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    AppState,
    database::{Table, repository},
    error::{AppError, AppResult, is_fk_violation},
};

use super::model::{CreateNotificationRequest, Notification};

/// Exposed for manual testing; real notifications are inserted by the
/// request and subscription workflows.
pub async fn create_notification(
    State(state): State<AppState>,
    Json(req): Json<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    if req.title.trim().is_empty() || req.message.trim().is_empty() {
        return Err(AppError::validation("missing field: title or message"));
    }

    match Notification::create(&state.pool, &req.user_id, &req.title, &req.message).await {
        Ok(notification) => Ok((StatusCode::CREATED, Json(notification))),
        Err(e) if is_fk_violation(&e) => Err(AppError::not_found("user not found")),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(notifications))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    Notification::mark_read(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("notification not found"))
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub affected: u64,
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<BulkResponse>> {
    let affected = Notification::mark_all_read(&state.pool, &user_id).await?;
    Ok(Json(BulkResponse { affected }))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if repository::delete_by_id(&state.pool, Notification::TABLE, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("notification not found"))
    }
}

pub async fn delete_read_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<BulkResponse>> {
    let affected = Notification::delete_read(&state.pool, &user_id).await?;
    Ok(Json(BulkResponse { affected }))
}
