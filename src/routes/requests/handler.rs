use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{Table, repository},
    error::{AppError, AppResult},
};

use super::model::{
    CreateRequestRequest, Request, RequestFilter, RequestStatus, UpdateStatusRequest,
};

pub async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<RequestFilter>,
) -> AppResult<Json<Vec<Request>>> {
    if let Some(status) = &filter.status {
        if RequestStatus::parse(status).is_none() {
            return Err(AppError::validation("invalid status filter"));
        }
    }
    let requests = Request::list(&state.pool, &filter).await?;
    Ok(Json(requests))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Request>> {
    repository::find_by_id::<Request>(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("request not found"))
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(req): Json<CreateRequestRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    let request = Request::create(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<Request>> {
    let Some(status) = RequestStatus::parse(&req.status) else {
        return Err(AppError::validation(
            "invalid status, expected one of: pending, accepted, declined, completed",
        ));
    };

    Request::set_status(&state.pool, &id, status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("request not found"))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if repository::delete_by_id(&state.pool, Request::TABLE, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("request not found"))
    }
}
