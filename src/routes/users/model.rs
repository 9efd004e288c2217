use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::Table;
use crate::routes::students::model::StudentProfile;
use crate::routes::teachers::model::TeacherProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "teacher" => Some(UserRole::Teacher),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Table for User {
    const TABLE: &'static str = "users";
    const ORDER_BY: &'static str = "ORDER BY created_at DESC";
}

/// Role-specific profile fields supplied at registration. Fields that do not
/// apply to the chosen role are ignored.
#[derive(Debug, Deserialize, Default)]
pub struct ProfileFields {
    pub bio: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub profile: ProfileFields,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub user_id: String,
    pub profile_id: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_profile: Option<TeacherProfile>,
}

/// Absent fields leave the stored value untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

impl User {
    /// Creates the user and its role profile in one transaction; a duplicate
    /// email surfaces as the unique violation on `users.email`.
    pub async fn register(
        pool: &PgPool,
        req: &RegisterUserRequest,
        role: UserRole,
    ) -> Result<(Self, String), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(req.email.trim())
        .bind(req.name.trim())
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let profile_id = Uuid::new_v4().to_string();
        match role {
            UserRole::Student => {
                sqlx::query(
                    r#"
                    INSERT INTO student_profiles (id, user_id, bio, education_level, location)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(&profile_id)
                .bind(&user.id)
                .bind(&req.profile.bio)
                .bind(&req.profile.education_level)
                .bind(&req.profile.location)
                .execute(&mut *tx)
                .await?;
            }
            UserRole::Teacher => {
                sqlx::query(
                    r#"
                    INSERT INTO teacher_profiles
                        (id, user_id, bio, years_experience, education, hourly_rate,
                         availability, latitude, longitude)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(&profile_id)
                .bind(&user.id)
                .bind(&req.profile.bio)
                .bind(req.profile.years_experience)
                .bind(&req.profile.education)
                .bind(req.profile.hourly_rate)
                .bind(&req.profile.availability)
                .bind(req.profile.latitude)
                .bind(req.profile.longitude)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok((user, profile_id))
    }

    pub async fn list(pool: &PgPool, role: Option<&str>) -> Result<Vec<Self>, sqlx::Error> {
        match role {
            Some(role) => {
                sqlx::query_as::<_, Self>(
                    "SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC",
                )
                .bind(role)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY created_at DESC")
                    .fetch_all(pool)
                    .await
            }
        }
    }

    pub async fn find_detail(pool: &PgPool, id: &str) -> Result<Option<UserDetail>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(user) = user else { return Ok(None) };

        let detail = match UserRole::parse(&user.role) {
            Some(UserRole::Student) => UserDetail {
                student_profile: StudentProfile::find_by_user(pool, &user.id).await?,
                teacher_profile: None,
                user,
            },
            Some(UserRole::Teacher) => UserDetail {
                student_profile: None,
                teacher_profile: TeacherProfile::find_by_user(pool, &user.id).await?,
                user,
            },
            None => UserDetail {
                student_profile: None,
                teacher_profile: None,
                user,
            },
        };

        Ok(Some(detail))
    }

    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &UpdateUserRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE users
            SET email = COALESCE($1, email),
                name = COALESCE($2, name),
                profile_photo = COALESCE($3, profile_photo)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&patch.email)
        .bind(&patch.name)
        .bind(&patch.profile_photo)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn set_photo(
        pool: &PgPool,
        id: &str,
        photo_path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE users SET profile_photo = $1 WHERE id = $2 RETURNING *",
        )
        .bind(photo_path)
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        assert_eq!(UserRole::parse("student"), Some(UserRole::Student));
        assert_eq!(UserRole::parse("teacher"), Some(UserRole::Teacher));
        assert_eq!(UserRole::Student.as_str(), "student");
        assert_eq!(UserRole::Teacher.as_str(), "teacher");
    }

    #[test]
    fn role_rejects_unknown_values() {
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse("Teacher"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn update_request_leaves_absent_fields_untouched() {
        let patch: UpdateUserRequest = serde_json::from_str(r#"{"name": "Ada L."}"#).unwrap();
        assert!(patch.email.is_none());
        assert!(patch.profile_photo.is_none());
        assert_eq!(patch.name.as_deref(), Some("Ada L."));
    }

    #[test]
    fn register_request_defaults_profile() {
        let req: RegisterUserRequest = serde_json::from_str(
            r#"{"email": "a@b.com", "name": "Ada", "role": "student"}"#,
        )
        .unwrap();
        assert!(req.profile.bio.is_none());
        assert!(req.profile.hourly_rate.is_none());
    }
}
