//! Database operations for the `headlines` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// An analyzed headline ready for insertion. `stored_at` and `symbol` are
/// supplied by [`insert_headlines`] at save time.
#[derive(Debug, Clone)]
pub struct NewHeadline {
    pub source_name: String,
    pub raw_text: String,
    pub captured_at: DateTime<Utc>,
    pub processed_text: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
}

/// A row from the `headlines` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HeadlineRow {
    pub id: i64,
    pub stored_at: DateTime<Utc>,
    pub captured_at: DateTime<Utc>,
    pub symbol: String,
    pub source_name: String,
    pub raw_text: String,
    pub processed_text: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
}

/// Per-symbol aggregate over all stored headlines.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentimentSummaryRow {
    pub symbol: String,
    pub headline_count: i64,
    pub avg_score: Option<f64>,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
    pub last_stored_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a batch of analyzed headlines for a symbol, silently skipping
/// duplicates. Returns the number of rows actually inserted.
///
/// Deduplication is based on `(symbol, raw_text)` via the
/// `headlines_symbol_raw_text_key` unique constraint; the `ON CONFLICT DO
/// NOTHING` form absorbs the conflict per row, so one duplicate never aborts
/// the rest of the batch. `stored_at` is stamped with the current time —
/// the headline's own `captured_at` is carried through unchanged.
///
/// An empty batch is a no-op and returns `Ok(0)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if an insert fails for any reason other than
/// the expected uniqueness conflict.
pub async fn insert_headlines(
    pool: &PgPool,
    symbol: &str,
    headlines: &[NewHeadline],
) -> Result<usize, DbError> {
    if headlines.is_empty() {
        return Ok(0);
    }

    let stored_at = Utc::now();
    let mut inserted = 0_usize;

    for headline in headlines {
        let result = sqlx::query(
            "INSERT INTO headlines \
                 (stored_at, captured_at, symbol, source_name, raw_text, \
                  processed_text, sentiment_label, sentiment_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (symbol, raw_text) DO NOTHING",
        )
        .bind(stored_at)
        .bind(headline.captured_at)
        .bind(symbol)
        .bind(&headline.source_name)
        .bind(&headline.raw_text)
        .bind(&headline.processed_text)
        .bind(&headline.sentiment_label)
        .bind(headline.sentiment_score)
        .execute(pool)
        .await?;

        inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
    }

    Ok(inserted)
}

/// Return every stored headline, newest first.
///
/// This is the dashboard's `load_all` read path; the pipeline never reads
/// rows back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_headlines(pool: &PgPool) -> Result<Vec<HeadlineRow>, DbError> {
    let rows = sqlx::query_as::<_, HeadlineRow>(
        "SELECT id, stored_at, captured_at, symbol, source_name, raw_text, \
                processed_text, sentiment_label, sentiment_score \
         FROM headlines \
         ORDER BY stored_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Return the most recent headlines for one symbol.
///
/// Results are ordered by `stored_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_headlines_by_symbol(
    pool: &PgPool,
    symbol: &str,
    limit: i64,
) -> Result<Vec<HeadlineRow>, DbError> {
    let rows = sqlx::query_as::<_, HeadlineRow>(
        "SELECT id, stored_at, captured_at, symbol, source_name, raw_text, \
                processed_text, sentiment_label, sentiment_score \
         FROM headlines \
         WHERE symbol = $1 \
         ORDER BY stored_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(symbol)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregate stored headlines per symbol: row count, average score, and
/// per-label counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_summary(pool: &PgPool) -> Result<Vec<SentimentSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, SentimentSummaryRow>(
        "SELECT symbol, \
                COUNT(*) AS headline_count, \
                AVG(sentiment_score) AS avg_score, \
                COUNT(*) FILTER (WHERE sentiment_label = 'positive') AS positive_count, \
                COUNT(*) FILTER (WHERE sentiment_label = 'neutral') AS neutral_count, \
                COUNT(*) FILTER (WHERE sentiment_label = 'negative') AS negative_count, \
                MAX(stored_at) AS last_stored_at \
         FROM headlines \
         GROUP BY symbol \
         ORDER BY symbol",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
