use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{Table, repository},
    error::{AppError, AppResult, is_fk_violation, is_unique_violation},
};

use super::model::{CreateSubjectRequest, Subject};

pub async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<Subject>>> {
    let subjects = repository::list::<Subject>(&state.pool).await?;
    Ok(Json(subjects))
}

pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subject>> {
    repository::find_by_id::<Subject>(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("subject not found"))
}

pub async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<Subject>)> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("missing field: name"));
    }

    match Subject::create(&state.pool, req.name.trim()).await {
        Ok(subject) => Ok((StatusCode::CREATED, Json(subject))),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("subject name already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateSubjectRequest>,
) -> AppResult<Json<Subject>> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("missing field: name"));
    }

    match Subject::rename(&state.pool, &id, req.name.trim()).await {
        Ok(Some(subject)) => Ok(Json(subject)),
        Ok(None) => Err(AppError::not_found("subject not found")),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("subject name already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

/// RESTRICT on classes/requests turns a delete of an in-use subject into a
/// foreign key violation, reported as 400 with the row left intact.
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    match repository::delete_by_id(&state.pool, Subject::TABLE, &id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(AppError::not_found("subject not found")),
        Err(e) if is_fk_violation(&e) => {
            Err(AppError::validation("subject is still in use"))
        }
        Err(e) => Err(e.into()),
    }
}
