mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use pubwatch_ingest::{IngestOptions, IngestScheduler, Ingestor, PgContentStore, PgDirectory};
use pubwatch_scraper::FetchClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(pubwatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = pubwatch_db::PoolConfig::from_app_config(&config);
    let pool = pubwatch_db::connect_pool(&config.database_url, pool_config).await?;
    pubwatch_db::run_migrations(&pool).await?;

    let companies = pubwatch_core::load_companies(&config.companies_path)?;
    let seeded = pubwatch_db::seed_companies(&pool, &companies.companies).await?;
    tracing::info!(count = seeded, "seeded companies from config");

    let fetch = FetchClient::new(config.fetch_timeout_secs, &config.user_agent)?;
    let ingestor = Arc::new(Ingestor::new(
        PgDirectory::new(pool.clone()),
        PgContentStore::new(pool.clone()),
        fetch,
        IngestOptions::from_app_config(&config),
    ));

    let scheduler = Arc::new(IngestScheduler::new(
        Arc::clone(&ingestor),
        Some(pool.clone()),
        config.fetch_cron.clone(),
        config.maintenance_cron.clone(),
    ));
    scheduler.initialize().await?;

    let app = build_app(AppState {
        pool,
        ingestor,
        scheduler: Arc::clone(&scheduler),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop_all().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
