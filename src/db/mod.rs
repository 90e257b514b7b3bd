pub(crate) mod models;
pub(crate) mod types;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use crate::core::config::Settings;

const APPLICATION_NAME: &str = "coursehub-api";

pub(crate) async fn init_pool(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let database = settings.database();
    let connect_options: PgConnectOptions = database
        .database_url()
        .parse::<PgConnectOptions>()?
        .application_name(APPLICATION_NAME)
        .log_statements(tracing::log::LevelFilter::Off);

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    tracing::info!(
        max_connections = database.max_connections,
        acquire_timeout_seconds = database.acquire_timeout_seconds,
        "Database pool ready"
    );
    Ok(pool)
}

/// Applies the migrations embedded from `./migrations`.
pub(crate) async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
