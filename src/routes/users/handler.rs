use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState,
    database::{Table, repository},
    error::{AppError, AppResult, is_unique_violation},
};

use super::model::{
    RegisterUserRequest, RegisterUserResponse, UpdateUserRequest, User, UserDetail, UserRole,
};

#[derive(Debug, Deserialize, Default)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<User>>> {
    if let Some(role) = &query.role {
        if UserRole::parse(role).is_none() {
            return Err(AppError::validation("invalid role filter"));
        }
    }
    let users = User::list(&state.pool, query.role.as_deref()).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserDetail>> {
    User::find_detail(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("user not found"))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<RegisterUserResponse>)> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::validation("missing or malformed field: email"));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::validation("missing field: name"));
    }
    let Some(role) = UserRole::parse(&req.role) else {
        return Err(AppError::validation(
            "invalid role, expected 'student' or 'teacher'",
        ));
    };

    match User::register(&state.pool, &req, role).await {
        Ok((user, profile_id)) => Ok((
            StatusCode::CREATED,
            Json(RegisterUserResponse {
                user_id: user.id,
                profile_id,
                role: user.role,
            }),
        )),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("email already in use"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    if let Some(email) = &patch.email {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AppError::validation("malformed field: email"));
        }
    }

    match User::update(&state.pool, &id, &patch).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(AppError::not_found("user not found")),
        Err(e) if is_unique_violation(&e) => Err(AppError::validation("email already in use")),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if repository::delete_by_id(&state.pool, User::TABLE, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user not found"))
    }
}

/// Multipart upload of the field `profilePhoto`; the file lands under the
/// configured upload dir and is served back at `/uploads/*`.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<User>> {
    if repository::find_by_id::<User>(&state.pool, &id).await?.is_none() {
        return Err(AppError::not_found("user not found"));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("profilePhoto") {
            continue;
        }

        let ext = field
            .file_name()
            .and_then(|n| n.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()))
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".into());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::validation("uploaded file is empty"));
        }

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(
            std::path::Path::new(&state.config.upload_dir).join(&file_name),
            &bytes,
        )
        .await
        .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

        let photo_path = format!("/uploads/{file_name}");
        return User::set_photo(&state.pool, &id, &photo_path)
            .await?
            .map(Json)
            .ok_or_else(|| AppError::not_found("user not found"));
    }

    Err(AppError::validation("missing file field: profilePhoto"))
}
