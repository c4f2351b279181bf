use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    config::Config,
    db::{self, PgCatalogStore},
    routes::{create_router, AppState},
    services::providers::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db_pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&db_pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = db::Cache::new(redis_client);

    let catalog = Arc::new(PgCatalogStore::new(db_pool));
    let provider = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));

    let state = AppState::new(catalog, provider);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    // Flush any queued cache writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}
