use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::Table;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

impl Table for Subject {
    const TABLE: &'static str = "subjects";
    const ORDER_BY: &'static str = "ORDER BY name";
}

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
}

impl Subject {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO subjects (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn rename(pool: &PgPool, id: &str, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE subjects SET name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
