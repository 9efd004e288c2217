use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::{Table, repository};
use crate::error::AppError;
use crate::routes::classes::model::Class;
use crate::routes::notifications::model::Notification;
use crate::routes::students::model::StudentProfile;
use crate::routes::subjects::model::Subject;
use crate::routes::teachers::model::TeacherProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
            RequestStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "declined" => Some(RequestStatus::Declined),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }
}

/// Notification template for the student when a request changes status.
/// Pending acts as the generic fallback.
pub fn status_notification(status: RequestStatus) -> (&'static str, &'static str) {
    match status {
        RequestStatus::Pending => (
            "Request updated",
            "Your tuition request has been updated.",
        ),
        RequestStatus::Accepted => (
            "Request accepted",
            "Your tuition request has been accepted by the teacher.",
        ),
        RequestStatus::Declined => (
            "Request declined",
            "Your tuition request has been declined by the teacher.",
        ),
        RequestStatus::Completed => (
            "Request completed",
            "Your tuition request has been marked as completed.",
        ),
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub class_id: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Request {
    const TABLE: &'static str = "requests";
    const ORDER_BY: &'static str = "ORDER BY created_at DESC";
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestRequest {
    pub student_id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub class_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RequestFilter {
    pub student_id: Option<String>,
    pub teacher_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl Request {
    /// Referent checks, the insert, and the teacher-side notification all
    /// share one transaction.
    pub async fn create(pool: &PgPool, req: &CreateRequestRequest) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        if !repository::exists(&mut *tx, StudentProfile::TABLE, &req.student_id).await? {
            return Err(AppError::not_found("student not found"));
        }
        if !repository::exists(&mut *tx, TeacherProfile::TABLE, &req.teacher_id).await? {
            return Err(AppError::not_found("teacher not found"));
        }
        if !repository::exists(&mut *tx, Subject::TABLE, &req.subject_id).await? {
            return Err(AppError::not_found("subject not found"));
        }
        if let Some(class_id) = &req.class_id {
            if !repository::exists(&mut *tx, Class::TABLE, class_id).await? {
                return Err(AppError::not_found("class not found"));
            }
        }

        let request = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO requests (id, student_id, teacher_id, subject_id, class_id, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&req.student_id)
        .bind(&req.teacher_id)
        .bind(&req.subject_id)
        .bind(&req.class_id)
        .bind(&req.message)
        .fetch_one(&mut *tx)
        .await?;

        let teacher_user: String = sqlx::query_scalar(
            "SELECT user_id FROM teacher_profiles WHERE id = $1",
        )
        .bind(&req.teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        let student_name: String = sqlx::query_scalar(
            r#"
            SELECT u.name
            FROM student_profiles sp
            JOIN users u ON u.id = sp.user_id
            WHERE sp.id = $1
            "#,
        )
        .bind(&req.student_id)
        .fetch_one(&mut *tx)
        .await?;

        Notification::create(
            &mut *tx,
            &teacher_user,
            "New tuition request",
            &format!("{student_name} sent you a tuition request."),
        )
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    pub async fn list(pool: &PgPool, filter: &RequestFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM requests WHERE 1=1");

        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ");
            qb.push_bind(student_id);
        }
        if let Some(teacher_id) = &filter.teacher_id {
            qb.push(" AND teacher_id = ");
            qb.push_bind(teacher_id);
        }
        if let Some(status) = &filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }

        qb.push(" ORDER BY created_at DESC");

        qb.build_query_as::<Self>().fetch_all(pool).await
    }

    /// Any status from the enum may follow any other; only the value itself
    /// is validated, at the handler. Exactly one notification goes to the
    /// student's owning user, in the same transaction as the update.
    pub async fn set_status(
        pool: &PgPool,
        id: &str,
        status: RequestStatus,
    ) -> Result<Option<Self>, AppError> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Self>(
            "UPDATE requests SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = updated else { return Ok(None) };

        let student_user: String = sqlx::query_scalar(
            "SELECT user_id FROM student_profiles WHERE id = $1",
        )
        .bind(&request.student_id)
        .fetch_one(&mut *tx)
        .await?;

        let (title, message) = status_notification(status);
        Notification::create(&mut *tx, &student_user, title, message).await?;

        tx.commit().await?;
        Ok(Some(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_enum_values() {
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::parse("accepted"), Some(RequestStatus::Accepted));
        assert_eq!(RequestStatus::parse("declined"), Some(RequestStatus::Declined));
        assert_eq!(RequestStatus::parse("completed"), Some(RequestStatus::Completed));
        assert_eq!(RequestStatus::parse("cancelled"), None);
        assert_eq!(RequestStatus::parse("Accepted"), None);
        assert_eq!(RequestStatus::parse(""), None);
    }

    #[test]
    fn templates_match_status() {
        let (title, _) = status_notification(RequestStatus::Accepted);
        assert_eq!(title, "Request accepted");
        let (title, _) = status_notification(RequestStatus::Declined);
        assert_eq!(title, "Request declined");
        let (title, _) = status_notification(RequestStatus::Completed);
        assert_eq!(title, "Request completed");
        let (title, body) = status_notification(RequestStatus::Pending);
        assert_eq!(title, "Request updated");
        assert!(body.contains("updated"));
    }
}
