use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SentimentSummaryItem {
    pub symbol: String,
    pub headline_count: i64,
    pub avg_score: Option<f64>,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
    pub last_stored_at: Option<DateTime<Utc>>,
}

/// Per-symbol aggregate over the whole store, for the dashboard's
/// overview cards.
pub(super) async fn sentiment_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SentimentSummaryItem>>>, ApiError> {
    let rows = tickersent_db::sentiment_summary(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| SentimentSummaryItem {
            symbol: row.symbol,
            headline_count: row.headline_count,
            avg_score: row.avg_score,
            positive_count: row.positive_count,
            neutral_count: row.neutral_count,
            negative_count: row.negative_count,
            last_stored_at: row.last_stored_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
