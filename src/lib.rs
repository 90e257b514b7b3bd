pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::uploads::UploadStore;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let uploads = UploadStore::from_settings(&settings).await?;
    let state = AppState::new(settings, db_pool, uploads);

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        uploads_dir = %state.uploads().root().display(),
        "Coursehub API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    Ok(())
}

/// Mint a bearer token for `subject` using the configured signing key.
pub fn issue_token(subject: &str, admin: bool) -> anyhow::Result<String> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    let token = core::security::create_access_token(subject, admin, &settings, None)?;
    Ok(token)
}
