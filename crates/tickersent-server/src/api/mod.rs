mod analyze;
mod headlines;
mod sentiment;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use tickersent_pipeline::Pipeline;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &tickersent_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/headlines", get(headlines::list_headlines))
        .route(
            "/api/v1/sentiment/summary",
            get(sentiment::sentiment_summary),
        )
        .route("/api/v1/analyze/{symbol}", post(analyze::analyze_symbol))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match tickersent_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sentiment::SentimentSummaryItem;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::path::PathBuf;
    use tickersent_core::{AppConfig, Environment, FeedSpec, SentimentBackend, Watchlist};
    use tickersent_db::NewHeadline;
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused-in-tests".to_string(),
            env: Environment::Test,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
            log_level: "info".to_string(),
            watchlist_path: PathBuf::from("./config/watchlist.yaml"),
            sentiment_backend: SentimentBackend::Lexicon,
            max_headlines: 50,
            sweep_interval_secs: 3600,
            fetch_timeout_secs: 5,
            fetch_user_agent: "tickersent-test/0.1".to_string(),
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 5,
        }
    }

    /// Watchlist pointing at a feed URL; tests that never trigger a fetch
    /// can pass any placeholder.
    fn test_watchlist(feed_url: &str) -> Watchlist {
        Watchlist {
            symbols: vec!["AAPL".to_string(), "TSLA".to_string()],
            feeds: vec![FeedSpec {
                name: "Mock Feed".to_string(),
                url: feed_url.to_string(),
            }],
        }
    }

    fn test_app(pool: sqlx::PgPool, feed_url: &str) -> Router {
        let pipeline = Pipeline::new(pool.clone(), &test_config(), &test_watchlist(feed_url))
            .expect("pipeline");
        build_app(AppState {
            pool,
            pipeline: Arc::new(pipeline),
        })
    }

    async fn seed_headline(pool: &sqlx::PgPool, symbol: &str, text: &str, label: &str, score: f64) {
        let batch = vec![NewHeadline {
            source_name: "Mock Feed".to_string(),
            raw_text: text.to_string(),
            captured_at: Utc::now(),
            processed_text: text.to_lowercase(),
            sentiment_label: label.to_string(),
            sentiment_score: score,
        }];
        tickersent_db::insert_headlines(pool, symbol, &batch)
            .await
            .expect("seed insert failed");
    }

    // -----------------------------------------------------------------------
    // Serialization unit tests (no DB)
    // -----------------------------------------------------------------------

    #[test]
    fn sentiment_summary_item_is_serializable() {
        // Proves the type compiles and serde works — no DB needed.
        let item = SentimentSummaryItem {
            symbol: "AAPL".to_string(),
            headline_count: 18,
            avg_score: Some(0.12),
            positive_count: 9,
            neutral_count: 6,
            negative_count: 3,
            last_stored_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&item).expect("serialize");
        assert!(json.contains("\"symbol\":\"AAPL\""));
        assert!(json.contains("\"headline_count\":18"));
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_unknown_code_maps_to_500() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -----------------------------------------------------------------------
    // Route integration tests (with DB)
    // -----------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok_with_live_pool(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://feed.invalid/rss?s={symbol}");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_headlines_filters_by_symbol(pool: sqlx::PgPool) {
        seed_headline(&pool, "AAPL", "Apple beats expectations", "positive", 0.4).await;
        seed_headline(&pool, "TSLA", "Tesla recall widens", "negative", -0.5).await;

        let app = test_app(pool, "http://feed.invalid/rss?s={symbol}");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/headlines?symbol=aapl")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1, "lowercase query symbol matches stored AAPL");
        assert_eq!(data[0]["symbol"].as_str(), Some("AAPL"));
        assert_eq!(data[0]["sentiment_label"].as_str(), Some("positive"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_headlines_without_filter_returns_all(pool: sqlx::PgPool) {
        seed_headline(&pool, "AAPL", "Apple beats expectations", "positive", 0.4).await;
        seed_headline(&pool, "TSLA", "Tesla recall widens", "negative", -0.5).await;

        let app = test_app(pool, "http://feed.invalid/rss?s={symbol}");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/headlines")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn summary_groups_rows_per_symbol(pool: sqlx::PgPool) {
        seed_headline(&pool, "AAPL", "Apple beats expectations", "positive", 0.5).await;
        seed_headline(&pool, "AAPL", "Apple faces lawsuit", "negative", -0.5).await;

        let app = test_app(pool, "http://feed.invalid/rss?s={symbol}");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sentiment/summary")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let row = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .find(|r| r["symbol"] == "AAPL")
            .expect("AAPL summary row");
        assert_eq!(row["headline_count"].as_i64(), Some(2));
        assert_eq!(row["positive_count"].as_i64(), Some(1));
        assert_eq!(row["negative_count"].as_i64(), Some(1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_rejects_symbols_off_the_watchlist(pool: sqlx::PgPool) {
        let app = test_app(pool, "http://feed.invalid/rss?s={symbol}");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/analyze/GME")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_runs_the_pipeline_for_a_tracked_symbol(pool: sqlx::PgPool) {
        use wiremock::matchers::{method as http_method, path as http_path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(http_path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<rss><channel><item>\
                   <title>Apple beats expectations</title>\
                   <pubDate>Mon, 26 May 2025 14:30:00 GMT</pubDate>\
                 </item></channel></rss>",
            ))
            .mount(&server)
            .await;

        let feed_url = format!("{}/feed?s={{symbol}}", server.uri());
        let app = test_app(pool.clone(), &feed_url);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/analyze/AAPL")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("saved"));
        assert_eq!(json["data"]["fetched"].as_u64(), Some(1));
        assert_eq!(json["data"]["inserted"].as_u64(), Some(1));

        let rows = tickersent_db::list_headlines(&pool).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAPL");
    }
}
