mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tickersent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let watchlist = tickersent_core::load_watchlist(&config.watchlist_path)?;
    tracing::info!(
        symbols = watchlist.symbols.len(),
        feeds = watchlist.feeds.len(),
        "watchlist loaded"
    );

    let pool_config = tickersent_db::PoolConfig::from_app_config(&config);
    let pool = tickersent_db::connect_pool(&config.database_url, pool_config).await?;
    tickersent_db::run_migrations(&pool).await?;

    let pipeline = Arc::new(tickersent_pipeline::Pipeline::new(
        pool.clone(),
        &config,
        &watchlist,
    )?);

    let background = Arc::clone(&pipeline);
    tokio::spawn(async move { background.run_forever().await });

    let app = build_app(AppState { pool, pipeline });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
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
