use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
};

use super::model::{StudentListing, StudentProfile, UpdateStudentProfileRequest};

pub async fn list_students(State(state): State<AppState>) -> AppResult<Json<Vec<StudentListing>>> {
    let students = StudentListing::list(&state.pool).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentListing>> {
    StudentListing::find(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("student not found"))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateStudentProfileRequest>,
) -> AppResult<Json<StudentProfile>> {
    StudentProfile::update(&state.pool, &id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("student not found"))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if StudentProfile::delete_with_user(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("student not found"))
    }
}
