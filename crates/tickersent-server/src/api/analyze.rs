use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use tickersent_pipeline::SymbolOutcome;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeData {
    pub symbol: String,
    pub status: &'static str,
    pub fetched: usize,
    pub inserted: usize,
}

/// Run one on-demand pipeline pass for a tracked symbol.
///
/// Equivalent to the per-symbol body of a background sweep; the pipeline's
/// internal lock serializes it against any sweep already in flight.
/// A symbol not on the watchlist is a `not_found`.
pub(super) async fn analyze_symbol(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<AnalyzeData>>, ApiError> {
    let symbol = symbol.to_uppercase();

    if !state.pipeline.tracks(&symbol) {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("symbol '{symbol}' is not on the watchlist"),
        ));
    }

    let data = match state.pipeline.run_symbol(&symbol).await {
        SymbolOutcome::Saved { fetched, inserted } => AnalyzeData {
            symbol,
            status: "saved",
            fetched,
            inserted,
        },
        SymbolOutcome::Skipped => AnalyzeData {
            symbol,
            status: "skipped",
            fetched: 0,
            inserted: 0,
        },
        SymbolOutcome::SaveFailed => AnalyzeData {
            symbol,
            status: "save_failed",
            fetched: 0,
            inserted: 0,
        },
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
