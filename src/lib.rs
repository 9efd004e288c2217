use config::Config;
use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod router;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}
