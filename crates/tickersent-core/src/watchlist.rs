use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A named feed endpoint template. `url` must contain a `{symbol}`
/// placeholder which is substituted per tracked symbol at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Watchlist {
    pub symbols: Vec<String>,
    pub feeds: Vec<FeedSpec>,
}

/// Load and validate the watchlist configuration from a YAML file.
///
/// Symbols are upper-cased on load so lookups and stored rows agree on
/// casing regardless of how the file was written.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut watchlist: Watchlist = serde_yaml::from_str(&content)?;
    for symbol in &mut watchlist.symbols {
        *symbol = symbol.trim().to_uppercase();
    }

    validate_watchlist(&watchlist)?;

    Ok(watchlist)
}

fn validate_watchlist(watchlist: &Watchlist) -> Result<(), ConfigError> {
    if watchlist.symbols.is_empty() {
        return Err(ConfigError::Validation(
            "watchlist must track at least one symbol".to_string(),
        ));
    }

    let mut seen_symbols = HashSet::new();
    for symbol in &watchlist.symbols {
        if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "invalid symbol '{symbol}'; symbols must be non-empty and contain no whitespace"
            )));
        }
        if !seen_symbols.insert(symbol.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate symbol: '{symbol}'"
            )));
        }
    }

    if watchlist.feeds.is_empty() {
        return Err(ConfigError::Validation(
            "watchlist must configure at least one feed".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for feed in &watchlist.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }
        if !feed.url.contains("{symbol}") {
            return Err(ConfigError::Validation(format!(
                "feed '{}' url has no {{symbol}} placeholder: {}",
                feed.name, feed.url
            )));
        }
        if !seen_names.insert(feed.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }
    }

    Ok(())
}
