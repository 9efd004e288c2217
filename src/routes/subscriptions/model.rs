use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::{Table, repository};
use crate::error::AppError;
use crate::routes::notifications::model::Notification;
use crate::routes::teachers::model::TeacherProfile;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub monthly_price: f64,
    pub yearly_price: f64,
    pub features: serde_json::Value,
}

impl Table for SubscriptionPlan {
    const TABLE: &'static str = "subscription_plans";
    const ORDER_BY: &'static str = "ORDER BY monthly_price";
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: String,
    pub teacher_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_yearly: bool,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Subscription {
    const TABLE: &'static str = "subscriptions";
    const ORDER_BY: &'static str = "ORDER BY created_at DESC";
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub teacher_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub is_yearly: bool,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SubscriptionFilter {
    pub teacher_id: Option<String>,
}

/// Yearly runs 365 days, monthly 30, from the start date.
pub fn subscription_end(start: NaiveDate, is_yearly: bool) -> NaiveDate {
    let days = if is_yearly { 365 } else { 30 };
    start + Days::new(days)
}

impl Subscription {
    /// Plan/teacher checks, the insert, the `is_subscribed` flip and the
    /// notification all share one transaction.
    pub async fn activate(
        pool: &PgPool,
        req: &CreateSubscriptionRequest,
    ) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        if !repository::exists(&mut *tx, TeacherProfile::TABLE, &req.teacher_id).await? {
            return Err(AppError::not_found("teacher not found"));
        }
        if !repository::exists(&mut *tx, SubscriptionPlan::TABLE, &req.plan_id).await? {
            return Err(AppError::not_found("subscription plan not found"));
        }

        let start_date = req.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end_date = subscription_end(start_date, req.is_yearly);

        let subscription = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO subscriptions
                (id, teacher_id, plan_id, start_date, end_date, is_yearly, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6, 'completed')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&req.teacher_id)
        .bind(&req.plan_id)
        .bind(start_date)
        .bind(end_date)
        .bind(req.is_yearly)
        .fetch_one(&mut *tx)
        .await?;

        TeacherProfile::set_subscribed(&mut *tx, &req.teacher_id, true).await?;

        let teacher_user: String = sqlx::query_scalar(
            "SELECT user_id FROM teacher_profiles WHERE id = $1",
        )
        .bind(&req.teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        Notification::create(
            &mut *tx,
            &teacher_user,
            "Subscription activated",
            &format!("Your subscription is active until {end_date}."),
        )
        .await?;

        tx.commit().await?;
        Ok(subscription)
    }

    /// Ends the subscription today and clears the teacher's flag.
    pub async fn cancel(pool: &PgPool, id: &str) -> Result<Option<Self>, AppError> {
        let mut tx = pool.begin().await?;

        let today = Utc::now().date_naive();
        let updated = sqlx::query_as::<_, Self>(
            "UPDATE subscriptions SET end_date = $1 WHERE id = $2 RETURNING *",
        )
        .bind(today)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(subscription) = updated else { return Ok(None) };

        TeacherProfile::set_subscribed(&mut *tx, &subscription.teacher_id, false).await?;

        let teacher_user: String = sqlx::query_scalar(
            "SELECT user_id FROM teacher_profiles WHERE id = $1",
        )
        .bind(&subscription.teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        Notification::create(
            &mut *tx,
            &teacher_user,
            "Subscription cancelled",
            "Your subscription has been cancelled and ends today.",
        )
        .await?;

        tx.commit().await?;
        Ok(Some(subscription))
    }

    pub async fn list(
        pool: &PgPool,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM subscriptions WHERE 1=1");

        if let Some(teacher_id) = &filter.teacher_id {
            qb.push(" AND teacher_id = ");
            qb.push_bind(teacher_id);
        }

        qb.push(" ORDER BY created_at DESC");

        qb.build_query_as::<Self>().fetch_all(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_subscription_runs_30_days() {
        assert_eq!(
            subscription_end(date(2026, 1, 15), false),
            date(2026, 2, 14)
        );
    }

    #[test]
    fn yearly_subscription_runs_365_days() {
        assert_eq!(
            subscription_end(date(2026, 1, 15), true),
            date(2027, 1, 15)
        );
        // leap year: 365 days is not a calendar year
        assert_eq!(
            subscription_end(date(2027, 6, 1), true),
            date(2028, 5, 31)
        );
    }
}
