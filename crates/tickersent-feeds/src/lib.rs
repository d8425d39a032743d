//! Headline acquisition from configured RSS/Atom feed endpoints.
//!
//! A [`FeedClient`] fans out over the watchlist's [`FeedSource`] templates
//! for one symbol, parses each feed's entries into [`Headline`]s, and
//! returns the newest entries across all sources. Individual source
//! failures are contained here and never abort the symbol.

mod client;
mod parse;
mod source;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use client::FeedClient;
pub use source::FeedSource;

/// A single raw headline captured from one feed source. Exists only
/// in-memory for the duration of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub source: String,
    pub text: String,
    /// Best-effort publish/update time; falls back to the fetch wall-clock
    /// time when the feed carries neither.
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}
