//! API Request Handlers

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::types::*;
use crate::collector;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::telemetry::TelemetryCollector;
use crate::xlsx;

/// Content type for XLSX downloads
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Plain-text body for rejected counts
pub const INVALID_COUNT_MESSAGE: &str =
    "Invalid count. Provide count query param, e.g. /generate?count=100";

/// Plain-text body for generation failures
pub const GENERATION_ERROR_MESSAGE: &str = "Server error while generating Excel file.";

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, telemetry: Arc<TelemetryCollector>) -> Self {
        Self {
            config,
            telemetry,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Batch Generation
// ============================================

/// `GET /generate?count=N` - build a batch of unique records and return it
/// as an XLSX attachment.
///
/// Invalid counts are 400s with a fixed plain-text body; counts above the
/// configured ceiling are clamped down silently. The collector and the
/// workbook writer run on the blocking pool so large batches cannot starve
/// the async executor.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
) -> Result<Response, (StatusCode, String)> {
    let start = Instant::now();

    let requested = match parse_count(params.count.as_deref()) {
        Some(n) => n,
        None => {
            state.telemetry.record_rejected();
            return Err((StatusCode::BAD_REQUEST, INVALID_COUNT_MESSAGE.to_string()));
        }
    };

    let count = requested.min(state.config.max_count);
    if count < requested {
        info!("Clamped requested count {} to ceiling {}", requested, count);
    }

    // Uniqueness sets and workbook are request-local; nothing here is shared
    // across concurrent generations.
    let buffer = tokio::task::spawn_blocking(move || -> AppResult<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let records = collector::collect(count, &mut rng)?;
        xlsx::build_workbook(&records)
    })
    .await;

    let buffer = match buffer {
        Ok(Ok(buffer)) => buffer,
        Ok(Err(err)) => {
            error!("Batch generation failed: {}", err);
            state.telemetry.record_failure();
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_ERROR_MESSAGE.to_string(),
            ));
        }
        Err(join_err) => {
            let err = AppError::worker_failed(join_err.to_string());
            error!("Generation worker did not complete: {}", err);
            state.telemetry.record_failure();
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_ERROR_MESSAGE.to_string(),
            ));
        }
    };

    let latency_ms = start.elapsed().as_millis() as u64;
    state.telemetry.record_batch(count as u64, latency_ms);
    info!(
        "Generated batch of {} records ({} bytes) in {}ms",
        count,
        buffer.len(),
        latency_ms
    );

    let filename = attachment_filename(count);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        buffer,
    )
        .into_response())
}

/// Parse the raw count param: positive integers pass, everything else
/// (missing, non-numeric, zero, negative) is rejected.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Some(n as usize),
        _ => None,
    }
}

/// Download filename: base name + count + ISO instant with `:` and `.`
/// swapped for `-` (filesystem-safe on every platform).
fn attachment_filename(count: usize) -> String {
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    format!("pinfl_passport_{}_{}.xlsx", count, timestamp)
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();

    let data = StatsData {
        batches_generated: stats.batches_generated,
        rows_generated: stats.rows_generated,
        rejected_requests: stats.rejected_requests,
        failed_batches: stats.failed_batches,
        avg_latency_ms: stats.avg_latency_ms,
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}
