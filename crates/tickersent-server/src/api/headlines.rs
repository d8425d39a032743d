use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct HeadlineItem {
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

impl From<tickersent_db::HeadlineRow> for HeadlineItem {
    fn from(row: tickersent_db::HeadlineRow) -> Self {
        Self {
            id: row.id,
            stored_at: row.stored_at,
            captured_at: row.captured_at,
            symbol: row.symbol,
            source_name: row.source_name,
            raw_text: row.raw_text,
            processed_text: row.processed_text,
            sentiment_label: row.sentiment_label,
            sentiment_score: row.sentiment_score,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct HeadlinesQuery {
    pub symbol: Option<String>,
    pub limit: Option<i64>,
}

/// List stored headlines, newest first, optionally filtered by symbol.
pub(super) async fn list_headlines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HeadlinesQuery>,
) -> Result<Json<ApiResponse<Vec<HeadlineItem>>>, ApiError> {
    let limit = normalize_limit(query.limit);

    let rows = match query.symbol {
        Some(symbol) => {
            tickersent_db::list_headlines_by_symbol(&state.pool, &symbol.to_uppercase(), limit)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        }
        None => {
            let mut rows = tickersent_db::list_headlines(&state.pool)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            rows.truncate(usize::try_from(limit).unwrap_or(0));
            rows
        }
    };

    let data = rows.into_iter().map(HeadlineItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
