use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use crate::parse::parse_feed;
use crate::{FeedError, FeedSource, Headline};

/// HTTP client for the configured feed endpoints.
///
/// Built once at startup and reused across sweeps. Fetches are blocking
/// from the pipeline's point of view: one source at a time, in watchlist
/// order.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and parse one source's feed for a symbol.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] — network or TLS failure.
    /// - [`FeedError::UnexpectedStatus`] — any non-2xx response.
    /// - [`FeedError::Xml`] — the body is not a well-formed feed document.
    pub async fn fetch_source(
        &self,
        source: &FeedSource,
        symbol: &str,
    ) -> Result<Vec<Headline>, FeedError> {
        let url = source.url_for(symbol);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        parse_feed(&body, &source.name, Utc::now())
    }

    /// Fetch headlines for a symbol across all configured sources.
    ///
    /// Continues past individual source failures, logging warnings; a
    /// failing source contributes zero entries. The union is sorted newest
    /// first and truncated to `max_records`. An empty result means every
    /// source came back empty or failed — the caller skips the symbol for
    /// this sweep rather than treating it as an error.
    ///
    /// The same headline text appearing from two sources is NOT collapsed
    /// here; deduplication happens at persistence, keyed on
    /// `(symbol, raw_text)`.
    pub async fn fetch(
        &self,
        symbol: &str,
        sources: &[FeedSource],
        max_records: usize,
    ) -> Vec<Headline> {
        let mut headlines = Vec::new();

        for source in sources {
            match self.fetch_source(source, symbol).await {
                Ok(entries) => {
                    tracing::debug!(
                        symbol = %symbol,
                        source = %source.name,
                        count = entries.len(),
                        "collected feed entries"
                    );
                    headlines.extend(entries);
                }
                Err(e) => {
                    tracing::warn!(
                        symbol = %symbol,
                        source = %source.name,
                        error = %e,
                        "feed fetch failed"
                    );
                }
            }
        }

        headlines.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        headlines.truncate(max_records);
        headlines
    }
}
