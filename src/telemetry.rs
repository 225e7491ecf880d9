//! Telemetry Module
//!
//! Collects anonymous aggregate statistics about generation traffic for
//! performance monitoring: batch/row counters, rejected requests, and
//! generation latency. Exposed through the `/stats` endpoint and exported
//! to a JSON file on shutdown.
//!
//! Privacy-first: only counters are kept; generated records are never
//! buffered here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Total batches generated
    pub batches_generated: u64,
    /// Total rows across all batches
    pub rows_generated: u64,
    /// Requests rejected at validation (bad count param)
    pub rejected_requests: u64,
    /// Generation failures (workbook/worker errors)
    pub failed_batches: u64,
    /// Average generation latency per batch (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

/// Main telemetry collector
pub struct TelemetryCollector {
    batches_generated: AtomicU64,
    rows_generated: AtomicU64,
    rejected_requests: AtomicU64,
    failed_batches: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Session start time
    session_start: u64,
    /// Export directory
    export_dir: PathBuf,
}

impl TelemetryCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_export_dir(PathBuf::from("./telemetry"))
    }

    /// Create collector with a custom export directory
    pub fn with_export_dir(export_dir: PathBuf) -> Self {
        // Ensure export directory exists
        let _ = fs::create_dir_all(&export_dir);

        Self {
            batches_generated: AtomicU64::new(0),
            rows_generated: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            failed_batches: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            session_start: current_timestamp(),
            export_dir,
        }
    }

    /// Record a completed batch
    pub fn record_batch(&self, rows: u64, latency_ms: u64) {
        self.batches_generated.fetch_add(1, Ordering::Relaxed);
        self.rows_generated.fetch_add(rows, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    /// Record a request rejected at validation
    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generation failure
    pub fn record_failure(&self) {
        self.failed_batches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let batches = self.batches_generated.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if batches > 0 {
            total_latency as f64 / batches as f64
        } else {
            0.0
        };

        TelemetryStats {
            batches_generated: batches,
            rows_generated: self.rows_generated.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            failed_batches: self.failed_batches.load(Ordering::Relaxed),
            avg_latency_ms: avg_latency,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        let stats = self.get_stats();
        let filename = format!("stats_{}.json", current_timestamp());
        let path = self.export_dir.join(filename);

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Current Unix timestamp in seconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> TelemetryCollector {
        TelemetryCollector::with_export_dir(std::env::temp_dir().join("pinfl_forge_telemetry_test"))
    }

    #[test]
    fn test_record_batch_updates_counters() {
        let telemetry = collector();
        telemetry.record_batch(100, 40);
        telemetry.record_batch(50, 20);

        let stats = telemetry.get_stats();
        assert_eq!(stats.batches_generated, 2);
        assert_eq!(stats.rows_generated, 150);
        assert_eq!(stats.avg_latency_ms, 30.0);
    }

    #[test]
    fn test_empty_stats_have_zero_latency() {
        let stats = collector().get_stats();
        assert_eq!(stats.batches_generated, 0);
        assert_eq!(stats.avg_latency_ms, 0.0);
    }

    #[test]
    fn test_rejections_and_failures_tracked_separately() {
        let telemetry = collector();
        telemetry.record_rejected();
        telemetry.record_rejected();
        telemetry.record_failure();

        let stats = telemetry.get_stats();
        assert_eq!(stats.rejected_requests, 2);
        assert_eq!(stats.failed_batches, 1);
        assert_eq!(stats.batches_generated, 0);
    }
}
