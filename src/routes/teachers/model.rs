use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::database::Table;
use crate::routes::subjects::model::Subject;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TeacherProfile {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_subscribed: bool,
}

impl Table for TeacherProfile {
    const TABLE: &'static str = "teacher_profiles";
}

/// List/detail row joined with the owning user.
#[derive(Debug, Serialize, FromRow)]
pub struct TeacherListing {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_subscribed: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct TeacherFilter {
    pub subject_id: Option<String>,
    pub max_rate: Option<f64>,
    pub subscribed: Option<bool>,
}

/// Absent fields leave the stored value untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTeacherProfileRequest {
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

const LISTING_SELECT: &str = r#"
    SELECT tp.id, tp.user_id, u.name, u.email, u.profile_photo,
           tp.bio, tp.years_experience, tp.education, tp.hourly_rate,
           tp.availability, tp.latitude, tp.longitude, tp.is_subscribed
    FROM teacher_profiles tp
    JOIN users u ON u.id = tp.user_id
"#;

impl TeacherListing {
    /// Incremental WHERE-clause assembly; every value goes through a bind.
    pub async fn list(pool: &PgPool, filter: &TeacherFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" WHERE 1=1");

        if let Some(subject_id) = &filter.subject_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM teacher_subjects ts \
                 WHERE ts.teacher_id = tp.id AND ts.subject_id = ",
            );
            qb.push_bind(subject_id);
            qb.push(")");
        }
        if let Some(max_rate) = filter.max_rate {
            qb.push(" AND tp.hourly_rate <= ");
            qb.push_bind(max_rate);
        }
        if let Some(subscribed) = filter.subscribed {
            qb.push(" AND tp.is_subscribed = ");
            qb.push_bind(subscribed);
        }

        // subscribed teachers get priority placement
        qb.push(" ORDER BY tp.is_subscribed DESC, u.created_at DESC");

        qb.build_query_as::<Self>().fetch_all(pool).await
    }

    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{LISTING_SELECT} WHERE tp.id = $1");
        sqlx::query_as::<_, Self>(&sql).bind(id).fetch_optional(pool).await
    }
}

impl TeacherProfile {
    pub async fn find_by_user(pool: &PgPool, user_id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM teacher_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &UpdateTeacherProfileRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE teacher_profiles
            SET bio = COALESCE($1, bio),
                years_experience = COALESCE($2, years_experience),
                education = COALESCE($3, education),
                hourly_rate = COALESCE($4, hourly_rate),
                availability = COALESCE($5, availability),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude)
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&patch.bio)
        .bind(patch.years_experience)
        .bind(&patch.education)
        .bind(patch.hourly_rate)
        .bind(&patch.availability)
        .bind(patch.latitude)
        .bind(patch.longitude)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes the owning user; the profile and every dependent row cascade.
    pub async fn delete_with_user(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM teacher_profiles WHERE id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flipped by subscription activation and cancellation.
    pub async fn set_subscribed<'e>(
        executor: impl PgExecutor<'e>,
        id: &str,
        subscribed: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE teacher_profiles SET is_subscribed = $1 WHERE id = $2")
            .bind(subscribed)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn subjects(pool: &PgPool, id: &str) -> Result<Vec<Subject>, sqlx::Error> {
        sqlx::query_as::<_, Subject>(
            r#"
            SELECT s.id, s.name
            FROM subjects s
            JOIN teacher_subjects ts ON ts.subject_id = s.id
            WHERE ts.teacher_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    pub async fn add_subject(
        pool: &PgPool,
        id: &str,
        subject_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
            .bind(id)
            .bind(subject_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn remove_subject(
        pool: &PgPool,
        id: &str,
        subject_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = $1 AND subject_id = $2")
                .bind(id)
                .bind(subject_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
