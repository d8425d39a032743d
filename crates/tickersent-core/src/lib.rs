use thiserror::Error;

mod app_config;
mod config;
mod watchlist;

pub use app_config::{AppConfig, Environment, SentimentBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use watchlist::{load_watchlist, FeedSpec, Watchlist};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read watchlist file {path}: {source}")]
    WatchlistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse watchlist file: {0}")]
    WatchlistParse(#[from] serde_yaml::Error),
    #[error("watchlist validation failed: {0}")]
    Validation(String),
}
