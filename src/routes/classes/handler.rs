use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{Table, repository},
    error::{AppError, AppResult},
};

use super::model::{Class, ClassFilter, ClassListing, CreateClassRequest, UpdateClassRequest};

pub async fn list_classes(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilter>,
) -> AppResult<Json<Vec<ClassListing>>> {
    let classes = ClassListing::list(&state.pool, &filter).await?;
    Ok(Json(classes))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClassListing>> {
    ClassListing::find(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("class not found"))
}

pub async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<CreateClassRequest>,
) -> AppResult<(StatusCode, Json<Class>)> {
    if req.title.trim().is_empty() {
        return Err(AppError::validation("missing field: title"));
    }
    if req.price < 0.0 {
        return Err(AppError::validation("price must not be negative"));
    }

    let class = Class::create(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateClassRequest>,
) -> AppResult<Json<Class>> {
    if matches!(patch.price, Some(p) if p < 0.0) {
        return Err(AppError::validation("price must not be negative"));
    }

    Class::update(&state.pool, &id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("class not found"))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if repository::delete_by_id(&state.pool, Class::TABLE, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("class not found"))
    }
}
