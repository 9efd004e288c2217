use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool};

/// One implementation per persisted entity. Table names are compile-time
/// constants, never request input, so interpolating them is safe.
pub trait Table: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Trailing ORDER BY clause for list views; empty means unordered.
    const ORDER_BY: &'static str = "";
}

pub async fn find_by_id<E: Table>(pool: &PgPool, id: &str) -> Result<Option<E>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
    sqlx::query_as::<_, E>(&sql).bind(id).fetch_optional(pool).await
}

pub async fn list<E: Table>(pool: &PgPool) -> Result<Vec<E>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} {}", E::TABLE, E::ORDER_BY);
    sqlx::query_as::<_, E>(&sql).fetch_all(pool).await
}

/// Existence probe usable both on the pool and inside a transaction.
pub async fn exists<'e>(
    executor: impl PgExecutor<'e>,
    table: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
}

/// Returns whether a row was actually deleted, so handlers can 404.
pub async fn delete_by_id(pool: &PgPool, table: &str, id: &str) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
