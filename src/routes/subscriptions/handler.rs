use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::repository,
    error::{AppError, AppResult},
};

use super::model::{
    CreateSubscriptionRequest, Subscription, SubscriptionFilter, SubscriptionPlan,
};

pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<SubscriptionPlan>>> {
    let plans = repository::list::<SubscriptionPlan>(&state.pool).await?;
    Ok(Json(plans))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(filter): Query<SubscriptionFilter>,
) -> AppResult<Json<Vec<Subscription>>> {
    let subscriptions = Subscription::list(&state.pool, &filter).await?;
    Ok(Json(subscriptions))
}

pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscription>> {
    repository::find_by_id::<Subscription>(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("subscription not found"))
}

pub async fn create_subscription(
    State(state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    let subscription = Subscription::activate(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn cancel_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscription>> {
    Subscription::cancel(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("subscription not found"))
}
