mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tickersent_pipeline::{Pipeline, SymbolOutcome};

#[derive(Debug, Parser)]
#[command(name = "tickersent")]
#[command(about = "tickersent headline sentiment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run one sweep over the whole watchlist, or one symbol
    Sweep {
        /// Sweep only this symbol
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Run the scheduler loop in the foreground until interrupted
    Run,
    /// Show recent headlines and the per-symbol summary
    Status {
        /// Restrict the headline listing to this symbol
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tickersent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let pool_config = tickersent_db::PoolConfig::from_app_config(&config);
    let pool = tickersent_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = tickersent_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Sweep { symbol } => {
            tickersent_db::run_migrations(&pool).await?;
            let pipeline = build_pipeline(&config, pool)?;
            match symbol {
                Some(symbol) => run_single_symbol(&pipeline, &symbol).await?,
                None => run_full_sweep(&pipeline).await,
            }
        }
        Commands::Run => {
            tickersent_db::run_migrations(&pool).await?;
            let pipeline = build_pipeline(&config, pool)?;
            tracing::info!(
                symbols = pipeline.symbols().len(),
                interval_secs = config.sweep_interval_secs,
                "starting scheduler loop"
            );
            pipeline.run_forever().await;
        }
        Commands::Status { symbol } => {
            let symbol = symbol.map(|s| s.to_uppercase());
            status::run_status(&pool, symbol.as_deref()).await?;
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &tickersent_core::AppConfig,
    pool: sqlx::PgPool,
) -> anyhow::Result<Pipeline> {
    let watchlist = tickersent_core::load_watchlist(&config.watchlist_path)?;
    Ok(Pipeline::new(pool, config, &watchlist)?)
}

async fn run_single_symbol(pipeline: &Pipeline, symbol: &str) -> anyhow::Result<()> {
    let symbol = symbol.to_uppercase();
    if !pipeline.tracks(&symbol) {
        anyhow::bail!(
            "symbol '{symbol}' is not on the watchlist; add it to config/watchlist.yaml first"
        );
    }

    match pipeline.run_symbol(&symbol).await {
        SymbolOutcome::Saved { fetched, inserted } => {
            println!("{symbol}: fetched {fetched} headline(s), {inserted} new");
        }
        SymbolOutcome::Skipped => {
            println!("{symbol}: no headlines from any source; nothing saved");
        }
        SymbolOutcome::SaveFailed => {
            println!("{symbol}: fetched headlines but saving failed; see logs");
        }
    }
    Ok(())
}

async fn run_full_sweep(pipeline: &Pipeline) {
    let summary = pipeline.run_sweep().await;
    println!(
        "sweep complete: {} symbol(s), {} saved, {} skipped, {} failed, {} new row(s)",
        summary.symbols, summary.saved, summary.skipped, summary.failed, summary.inserted
    );
}
