mod app;
mod auth;
mod categories;
mod config;
mod db;
mod error;
mod expenses;
mod state;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, db::PgStore, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "expense_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.jwt.ttl_minutes.is_none() {
        tracing::warn!("JWT_TTL_MINUTES not set; issued tokens never expire");
    }

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::new(PgStore::new(pool), config);

    app::serve(app::build_app(state), &host, port).await
}
