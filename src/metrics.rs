//! Session statistics for the AQI predictor.

use crate::error::GatewayError;
use crate::types::{AqiReport, SeverityBand};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept for percentile calculation
const MAX_LATENCY_SAMPLES: usize = 1000;

/// Counters for one interactive session
pub struct SessionMetrics {
    /// Successful predictions
    predictions: u64,
    /// Failed requests by error kind
    failures: HashMap<&'static str, u64>,
    /// Successful predictions per band
    bands: HashMap<SeverityBand, u64>,
    /// Inference latencies (in microseconds)
    latencies: Vec<u64>,
    /// Start time of the session
    start_time: Instant,
}

impl SessionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: 0,
            failures: HashMap::new(),
            bands: HashMap::new(),
            latencies: Vec::with_capacity(64),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&mut self, report: &AqiReport) {
        self.predictions += 1;
        *self.bands.entry(report.band).or_insert(0) += 1;

        self.latencies.push(report.latency_us);
        if self.latencies.len() > MAX_LATENCY_SAMPLES {
            self.latencies.drain(0..MAX_LATENCY_SAMPLES / 2);
        }
    }

    /// Record a failed request
    pub fn record_failure(&mut self, error: &GatewayError) {
        *self.failures.entry(error.kind()).or_insert(0) += 1;
    }

    pub fn predictions(&self) -> u64 {
        self.predictions
    }

    pub fn failures(&self) -> u64 {
        self.failures.values().sum()
    }

    pub fn failures_of(&self, kind: &str) -> u64 {
        self.failures.get(kind).copied().unwrap_or(0)
    }

    pub fn band_count(&self, band: SeverityBand) -> u64 {
        self.bands.get(&band).copied().unwrap_or(0)
    }

    /// Get latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        if self.latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Time since the session started
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// One-line summary for the status bar
    pub fn summary_line(&self) -> String {
        let latency = self.latency_stats();
        format!(
            "Predictions: {}  Failed: {}  Mean latency: {} μs",
            self.predictions,
            self.failures(),
            latency.mean_us
        )
    }

    /// Log summary statistics
    pub fn log_summary(&self) {
        let latency = self.latency_stats();

        info!(
            predictions = self.predictions,
            failures = self.failures(),
            uptime_secs = self.uptime().as_secs(),
            "Session summary"
        );
        info!(
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            max_us = latency.max_us,
            "Inference latency"
        );
        for band in SeverityBand::all() {
            let count = self.band_count(*band);
            if count > 0 {
                info!(band = %band, count = count, "Predictions by band");
            }
        }
        for (kind, count) in &self.failures {
            info!(kind = %kind, count = count, "Failures by kind");
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference latency statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}
