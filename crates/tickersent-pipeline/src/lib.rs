//! The sweep orchestrator: fetch → normalize/score → persist, per symbol.
//!
//! A [`Pipeline`] is built once at startup and driven either by
//! [`Pipeline::run_forever`] (the background loop) or [`Pipeline::run_symbol`]
//! (the on-demand entry point used by the HTTP API and CLI). Failures are
//! contained per source inside the feed client and per symbol here; nothing
//! short of startup misconfiguration stops the process.

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::Mutex;

use tickersent_core::{AppConfig, Watchlist};
use tickersent_db::NewHeadline;
use tickersent_feeds::{FeedClient, FeedError, FeedSource, Headline};
use tickersent_sentiment::{build_scorer, label_for, Normalizer, SentimentScorer};

/// What happened to one symbol within a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// Headlines were fetched and the batch was saved. `inserted` counts
    /// rows that were new; the rest were duplicates absorbed by the store.
    Saved { fetched: usize, inserted: usize },
    /// Every source came back empty or failing; nothing was written.
    Skipped,
    /// The batch could not be persisted. This sweep's results for the
    /// symbol are lost; the next sweep retries naturally.
    SaveFailed,
}

/// Aggregated counts for one full pass over the watchlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepSummary {
    pub symbols: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub inserted: usize,
}

/// Long-lived pipeline state: feed client, analyzer, scorer, and watchlist.
///
/// The internal mutex serializes on-demand runs against the background
/// sweep so the same symbol is not fetched twice concurrently. Correctness
/// never depends on it — concurrent writers cannot create duplicate rows —
/// it only avoids wasted duplicate fetch work.
pub struct Pipeline {
    pool: PgPool,
    client: FeedClient,
    sources: Vec<FeedSource>,
    symbols: Vec<String>,
    normalizer: Normalizer,
    scorer: Box<dyn SentimentScorer>,
    max_headlines: usize,
    sweep_interval: Duration,
    sweep_lock: Mutex<()>,
}

impl Pipeline {
    /// Assemble the pipeline from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the HTTP client cannot be constructed.
    pub fn new(pool: PgPool, config: &AppConfig, watchlist: &Watchlist) -> Result<Self, FeedError> {
        let client = FeedClient::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
        Ok(Self {
            pool,
            client,
            sources: FeedSource::from_specs(&watchlist.feeds),
            symbols: watchlist.symbols.clone(),
            normalizer: Normalizer::new(),
            scorer: build_scorer(config.sentiment_backend),
            max_headlines: config.max_headlines,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            sweep_lock: Mutex::new(()),
        })
    }

    /// The tracked symbols, in sweep order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Whether `symbol` is on the watchlist.
    #[must_use]
    pub fn tracks(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Run the sweep body for one symbol, on demand.
    ///
    /// Takes the sweep lock, so an invocation triggered from the API or CLI
    /// waits for any in-flight background sweep instead of double-fetching.
    pub async fn run_symbol(&self, symbol: &str) -> SymbolOutcome {
        let _guard = self.sweep_lock.lock().await;
        self.sweep_symbol(symbol).await
    }

    /// One full pass over the watchlist, strictly sequential.
    ///
    /// The loop advances to the next symbol unconditionally — no retry, no
    /// backoff, no circuit breaking within a sweep.
    pub async fn run_sweep(&self) -> SweepSummary {
        let _guard = self.sweep_lock.lock().await;

        let mut summary = SweepSummary {
            symbols: self.symbols.len(),
            ..SweepSummary::default()
        };

        for symbol in &self.symbols {
            match self.sweep_symbol(symbol).await {
                SymbolOutcome::Saved { inserted, .. } => {
                    summary.saved += 1;
                    summary.inserted += inserted;
                }
                SymbolOutcome::Skipped => summary.skipped += 1,
                SymbolOutcome::SaveFailed => summary.failed += 1,
            }
        }

        summary
    }

    /// Alternate sweep and sleep until the process is terminated.
    ///
    /// The sleep starts after a sweep completes; nothing else runs in
    /// between. There is no terminal state in normal operation.
    pub async fn run_forever(&self) {
        loop {
            let summary = self.run_sweep().await;
            tracing::info!(
                symbols = summary.symbols,
                saved = summary.saved,
                inserted = summary.inserted,
                skipped = summary.skipped,
                failed = summary.failed,
                sleep_secs = self.sweep_interval.as_secs(),
                "sweep finished; sleeping until next sweep"
            );
            tokio::time::sleep(self.sweep_interval).await;
        }
    }

    /// fetch → skip-if-empty → analyze → save. Caller holds the sweep lock.
    async fn sweep_symbol(&self, symbol: &str) -> SymbolOutcome {
        let headlines = self
            .client
            .fetch(symbol, &self.sources, self.max_headlines)
            .await;

        if headlines.is_empty() {
            tracing::info!(symbol = %symbol, "no headlines from any source; skipping symbol this sweep");
            return SymbolOutcome::Skipped;
        }

        let fetched = headlines.len();
        let batch: Vec<NewHeadline> = headlines.into_iter().map(|h| self.analyze(h)).collect();

        match tickersent_db::insert_headlines(&self.pool, symbol, &batch).await {
            Ok(inserted) => {
                tracing::info!(
                    symbol = %symbol,
                    fetched,
                    inserted,
                    duplicates = fetched - inserted,
                    "symbol sweep saved"
                );
                SymbolOutcome::Saved { fetched, inserted }
            }
            Err(e) => {
                tracing::error!(
                    symbol = %symbol,
                    error = %e,
                    "failed to persist headlines; this sweep's results for the symbol are lost"
                );
                SymbolOutcome::SaveFailed
            }
        }
    }

    /// Normalize and score one headline into its persistable form.
    fn analyze(&self, headline: Headline) -> NewHeadline {
        let processed_text = self.normalizer.normalize(&headline.text);
        let sentiment_score = self.scorer.score(&processed_text);
        let sentiment_label = label_for(sentiment_score).as_str().to_string();

        NewHeadline {
            source_name: headline.source,
            raw_text: headline.text,
            captured_at: headline.captured_at,
            processed_text,
            sentiment_label,
            sentiment_score,
        }
    }
}
