use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::{Table, repository};
use crate::error::AppError;
use crate::routes::subjects::model::Subject;
use crate::routes::teachers::model::TeacherProfile;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

impl Table for Class {
    const TABLE: &'static str = "classes";
    const ORDER_BY: &'static str = "ORDER BY created_at DESC";
}

/// List/detail row carrying the subject and teacher names alongside.
#[derive(Debug, Serialize, FromRow)]
pub struct ClassListing {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClassFilter {
    /// Case-insensitive substring of the subject name.
    pub subject: Option<String>,
    /// Case-insensitive substring of the class location.
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub online: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub teacher_id: String,
    pub subject_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

/// Absent fields leave the stored value untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateClassRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub is_online: Option<bool>,
}

const LISTING_SELECT: &str = r#"
    SELECT c.id, c.teacher_id, u.name AS teacher_name, c.subject_id,
           s.name AS subject_name, c.title, c.description, c.price,
           c.location, c.is_online, c.created_at
    FROM classes c
    JOIN subjects s ON s.id = c.subject_id
    JOIN teacher_profiles tp ON tp.id = c.teacher_id
    JOIN users u ON u.id = tp.user_id
"#;

impl ClassListing {
    /// Incremental WHERE-clause assembly; every value goes through a bind,
    /// list views always come back newest first.
    pub async fn list(pool: &PgPool, filter: &ClassFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" WHERE 1=1");

        if let Some(subject) = &filter.subject {
            qb.push(" AND s.name ILIKE ");
            qb.push_bind(format!("%{subject}%"));
        }
        if let Some(location) = &filter.location {
            qb.push(" AND c.location ILIKE ");
            qb.push_bind(format!("%{location}%"));
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND c.price >= ");
            qb.push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND c.price <= ");
            qb.push_bind(max_price);
        }
        if let Some(online) = filter.online {
            qb.push(" AND c.is_online = ");
            qb.push_bind(online);
        }

        qb.push(" ORDER BY c.created_at DESC");

        qb.build_query_as::<Self>().fetch_all(pool).await
    }

    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{LISTING_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Self>(&sql).bind(id).fetch_optional(pool).await
    }
}

impl Class {
    /// Referent checks and the insert share one transaction; a concurrent
    /// delete of the teacher or subject still trips the FK constraint.
    pub async fn create(pool: &PgPool, req: &CreateClassRequest) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        if !repository::exists(&mut *tx, TeacherProfile::TABLE, &req.teacher_id).await? {
            return Err(AppError::not_found("teacher not found"));
        }
        if !repository::exists(&mut *tx, Subject::TABLE, &req.subject_id).await? {
            return Err(AppError::not_found("subject not found"));
        }

        let class = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO classes
                (id, teacher_id, subject_id, title, description, price, location, is_online)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&req.teacher_id)
        .bind(&req.subject_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.location)
        .bind(req.is_online)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(class)
    }

    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &UpdateClassRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE classes
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                location = COALESCE($4, location),
                is_online = COALESCE($5, is_online)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(&patch.location)
        .bind(patch.is_online)
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
