use sqlx::PgPool;

/// Idempotent DDL, executed in order at every process start. All referential
/// behavior (cascades, RESTRICT on subjects, unique email) lives here.
const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id              TEXT PRIMARY KEY,
        email           TEXT NOT NULL UNIQUE,
        name            TEXT NOT NULL,
        role            TEXT NOT NULL CHECK (role IN ('student', 'teacher')),
        profile_photo   TEXT,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS student_profiles (
        id              TEXT PRIMARY KEY,
        user_id         TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        bio             TEXT,
        education_level TEXT,
        location        TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teacher_profiles (
        id               TEXT PRIMARY KEY,
        user_id          TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        bio              TEXT,
        years_experience INTEGER,
        education        TEXT,
        hourly_rate      DOUBLE PRECISION,
        availability     TEXT,
        latitude         DOUBLE PRECISION,
        longitude        DOUBLE PRECISION,
        is_subscribed    BOOLEAN NOT NULL DEFAULT false
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subjects (
        id   TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teacher_subjects (
        teacher_id TEXT NOT NULL REFERENCES teacher_profiles(id) ON DELETE CASCADE,
        subject_id TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
        UNIQUE (teacher_id, subject_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS classes (
        id          TEXT PRIMARY KEY,
        teacher_id  TEXT NOT NULL REFERENCES teacher_profiles(id) ON DELETE CASCADE,
        subject_id  TEXT NOT NULL REFERENCES subjects(id) ON DELETE RESTRICT,
        title       TEXT NOT NULL,
        description TEXT,
        price       DOUBLE PRECISION NOT NULL,
        location    TEXT,
        is_online   BOOLEAN NOT NULL DEFAULT false,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS requests (
        id         TEXT PRIMARY KEY,
        student_id TEXT NOT NULL REFERENCES student_profiles(id) ON DELETE CASCADE,
        teacher_id TEXT NOT NULL REFERENCES teacher_profiles(id) ON DELETE CASCADE,
        subject_id TEXT NOT NULL REFERENCES subjects(id) ON DELETE RESTRICT,
        class_id   TEXT REFERENCES classes(id) ON DELETE SET NULL,
        message    TEXT,
        status     TEXT NOT NULL DEFAULT 'pending'
                   CHECK (status IN ('pending', 'accepted', 'declined', 'completed')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscription_plans (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL UNIQUE,
        monthly_price DOUBLE PRECISION NOT NULL,
        yearly_price  DOUBLE PRECISION NOT NULL,
        features      JSONB NOT NULL DEFAULT '[]'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id             TEXT PRIMARY KEY,
        teacher_id     TEXT NOT NULL REFERENCES teacher_profiles(id) ON DELETE CASCADE,
        plan_id        TEXT NOT NULL REFERENCES subscription_plans(id) ON DELETE RESTRICT,
        start_date     DATE NOT NULL,
        end_date       DATE NOT NULL,
        is_yearly      BOOLEAN NOT NULL DEFAULT false,
        payment_status TEXT NOT NULL DEFAULT 'completed',
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title      TEXT NOT NULL,
        message    TEXT NOT NULL,
        is_read    BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const SEED_SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "History",
    "Geography",
    "Computer Science",
    "Music",
    "Art",
];

// (name, monthly, yearly, features)
const SEED_PLANS: &[(&str, f64, f64, &str)] = &[
    (
        "Basic",
        9.99,
        99.99,
        r#"["Listed in search results", "Up to 3 class listings"]"#,
    ),
    (
        "Premium",
        19.99,
        199.99,
        r#"["Priority placement in search", "Unlimited class listings", "Verified badge"]"#,
    ),
];

pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in DDL {
        sqlx::query(stmt).execute(pool).await?;
    }

    for name in SEED_SUBJECTS {
        sqlx::query("INSERT INTO subjects (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .execute(pool)
            .await?;
    }

    for (name, monthly, yearly, features) in SEED_PLANS {
        sqlx::query(
            r#"
            INSERT INTO subscription_plans (id, name, monthly_price, yearly_price, features)
            VALUES ($1, $2, $3, $4, $5::jsonb)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(name)
        .bind(monthly)
        .bind(yearly)
        .bind(features)
        .execute(pool)
        .await?;
    }

    tracing::info!("database schema ready");
    Ok(())
}
