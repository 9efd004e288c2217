use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult, is_fk_violation, is_unique_violation},
};

use super::model::{TeacherFilter, TeacherListing, TeacherProfile, UpdateTeacherProfileRequest};
use crate::routes::subjects::model::Subject;

pub async fn list_teachers(
    State(state): State<AppState>,
    Query(filter): Query<TeacherFilter>,
) -> AppResult<Json<Vec<TeacherListing>>> {
    let teachers = TeacherListing::list(&state.pool, &filter).await?;
    Ok(Json(teachers))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TeacherListing>> {
    TeacherListing::find(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("teacher not found"))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateTeacherProfileRequest>,
) -> AppResult<Json<TeacherProfile>> {
    TeacherProfile::update(&state.pool, &id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("teacher not found"))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if TeacherProfile::delete_with_user(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("teacher not found"))
    }
}

pub async fn list_teacher_subjects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Subject>>> {
    if TeacherListing::find(&state.pool, &id).await?.is_none() {
        return Err(AppError::not_found("teacher not found"));
    }
    let subjects = TeacherProfile::subjects(&state.pool, &id).await?;
    Ok(Json(subjects))
}

#[derive(Debug, Deserialize)]
pub struct AddSubjectRequest {
    pub subject_id: String,
}

pub async fn add_teacher_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddSubjectRequest>,
) -> AppResult<StatusCode> {
    match TeacherProfile::add_subject(&state.pool, &id, &req.subject_id).await {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("subject already linked to this teacher"))
        }
        Err(e) if is_fk_violation(&e) => Err(AppError::not_found("teacher or subject not found")),
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_teacher_subject(
    State(state): State<AppState>,
    Path((id, subject_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if TeacherProfile::remove_subject(&state.pool, &id, &subject_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("subject link not found"))
    }
}
