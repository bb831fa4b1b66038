use crate::error::DbError;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Reads `DATABASE_URL`, loading a `.env` file first when one exists.
pub fn database_url() -> Result<String, DbError> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded.");
    }
    env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// This function reads the `DATABASE_URL` from the environment, creates a
/// connection pool, and returns it. The pool can be shared across the entire
/// application.
pub async fn connect() -> Result<PgPool, DbError> {
    let url = database_url()?;
    let pool = pool_options().connect(&url).await?;
    tracing::info!("Connected to the database.");
    Ok(pool)
}

/// Builds a pool that only opens connections when a query first needs one.
pub fn connect_lazy(database_url: &str) -> Result<PgPool, DbError> {
    Ok(pool_options().connect_lazy(database_url)?)
}

/// Applies the embedded migrations, ensuring the schema is up-to-date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
