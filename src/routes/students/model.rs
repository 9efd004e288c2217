use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::Table;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct StudentProfile {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
}

impl Table for StudentProfile {
    const TABLE: &'static str = "student_profiles";
}

/// List/detail row joined with the owning user.
#[derive(Debug, Serialize, FromRow)]
pub struct StudentListing {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
}

/// Absent fields leave the stored value untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateStudentProfileRequest {
    pub bio: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
}

impl StudentProfile {
    pub async fn find_by_user(pool: &PgPool, user_id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM student_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &UpdateStudentProfileRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE student_profiles
            SET bio = COALESCE($1, bio),
                education_level = COALESCE($2, education_level),
                location = COALESCE($3, location)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&patch.bio)
        .bind(&patch.education_level)
        .bind(&patch.location)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes the owning user; the profile and every dependent row cascade.
    pub async fn delete_with_user(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM student_profiles WHERE id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl StudentListing {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT sp.id, sp.user_id, u.name, u.email, u.profile_photo,
                   sp.bio, sp.education_level, sp.location
            FROM student_profiles sp
            JOIN users u ON u.id = sp.user_id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT sp.id, sp.user_id, u.name, u.email, u.profile_photo,
                   sp.bio, sp.education_level, sp.location
            FROM student_profiles sp
            JOIN users u ON u.id = sp.user_id
            WHERE sp.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
