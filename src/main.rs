use std::sync::Arc;

use astromatch_api::config::Config;
use astromatch_api::db::{create_pool, PgReferenceStore};
use astromatch_api::routes::{create_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astromatch_api=info,tower_http=info".into()),
        )
        .init();

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgReferenceStore::new(pool));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState { store, config };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "astromatch-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
