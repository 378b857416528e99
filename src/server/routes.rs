//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<AppState>`,
//! which carries the injected `FixtureSource`, the immutable scan
//! configuration, and the TTL response cache.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::pipeline::{self, ScanConfig};
use crate::types::{ResultRow, ScanError};
use crate::upstream::FixtureSource;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct AppState {
    pub source: Arc<dyn FixtureSource>,
    pub scan: ScanConfig,
    pub cache_ttl: Duration,
    pub cache: RwLock<Option<CachedScan>>,
}

impl AppState {
    pub fn new(source: Arc<dyn FixtureSource>, scan: ScanConfig, cache_ttl: Duration) -> Self {
        Self {
            source,
            scan,
            cache_ttl,
            cache: RwLock::new(None),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// One cached scan result plus when it was produced.
#[derive(Clone)]
pub struct CachedScan {
    pub response: ScanResponse,
    pub fetched_at: Instant,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub over05: Vec<ResultRow>,
    pub over15: Vec<ResultRow>,
    /// Refresh time as `HH:MM:SS` in the display offset.
    pub atualizacao: String,
    /// Whether this response was served from the TTL cache.
    pub cache: bool,
    pub estatisticas: ScanStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    pub over05: usize,
    pub over15: usize,
    #[serde(rename = "tempoTotal")]
    pub tempo_total_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub upstream: String,
    pub configured: bool,
    pub cache: String,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Request-level failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// Provider unreachable/non-2xx/unparsable — gateway error class.
    Upstream(String),
    Internal(String),
}

impl From<ScanError> for ApiError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::Upstream { message } => ApiError::Upstream(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream(detalhes) => {
                warn!(detalhes = %detalhes, "Upstream provider unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "erro": "Upstream provider unavailable",
                        "detalhes": detalhes,
                    })),
                )
                    .into_response()
            }
            ApiError::Internal(erro) => {
                warn!(erro = %erro, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "erro": erro })))
                    .into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wall-clock `HH:MM:SS` in the configured display offset, used for the
/// response's refresh stamp.
fn refresh_stamp(now: DateTime<Utc>, offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).format("%H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/jogos
///
/// Fetches the upstream schedule (or serves the cached scan while
/// fresh), runs the pipeline, and returns the two ranked lists.
pub async fn get_jogos(State(state): State<SharedState>) -> Result<Json<ScanResponse>, ApiError> {
    // Serve from cache while fresh.
    {
        let cache = state.cache.read().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < state.cache_ttl {
                let mut response = cached.response.clone();
                response.cache = true;
                response.atualizacao =
                    refresh_stamp(Utc::now(), state.scan.display_offset_hours);
                return Ok(Json(response));
            }
        }
    }

    let started = Instant::now();
    let payload = state.source.fetch_events().await?;
    let outcome = pipeline::run_scan(&payload, Utc::now(), &state.scan);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        over05 = outcome.over05.len(),
        over15 = outcome.over15.len(),
        elapsed_ms,
        source = state.source.name(),
        "Scan served"
    );

    let response = ScanResponse {
        estatisticas: ScanStats {
            over05: outcome.over05.len(),
            over15: outcome.over15.len(),
            tempo_total_ms: elapsed_ms,
        },
        over05: outcome.over05,
        over15: outcome.over15,
        atualizacao: refresh_stamp(Utc::now(), state.scan.display_offset_hours),
        cache: false,
    };

    *state.cache.write().await = Some(CachedScan {
        response: response.clone(),
        fetched_at: Instant::now(),
    });

    Ok(Json(response))
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache_active = state.cache.read().await.is_some();
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        upstream: state.source.name().to_string(),
        configured: state.source.is_configured(),
        cache: if cache_active { "active" } else { "inactive" }.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
