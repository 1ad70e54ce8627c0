//! Timing metrics for alignment runs
//!
//! The orchestrator records one measurement per pair trial and one per run;
//! the benchmark runner reduces them to percentile statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Oldest half is discarded once this many measurements are held
const MAX_MEASUREMENTS: usize = 100_000;

/// Individual performance measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMeasurement {
    pub operation: String,
    pub duration_ms: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub correlation_id: Option<Uuid>,
}

/// Statistical summary of performance measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub operation: String,
    pub count: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// Thread-safe metrics collector
pub struct MetricsCollector {
    measurements: Arc<Mutex<Vec<PerformanceMeasurement>>>,
    enabled: bool,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MetricsCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            measurements: Arc::new(Mutex::new(Vec::new())),
            enabled,
        }
    }

    /// Record a performance measurement
    pub fn record(&self, operation: &str, duration: Duration, correlation_id: Option<Uuid>) {
        if !self.enabled {
            return;
        }

        let measurement = PerformanceMeasurement {
            operation: operation.to_string(),
            duration_ms: duration.as_secs_f64() * 1000.0,
            timestamp: chrono::Utc::now(),
            correlation_id,
        };

        if let Ok(mut measurements) = self.measurements.lock() {
            measurements.push(measurement);

            if measurements.len() > MAX_MEASUREMENTS {
                measurements.drain(0..MAX_MEASUREMENTS / 2);
            }
        }
    }

    /// Get all measurements for a specific operation
    pub fn get_measurements(&self, operation: &str) -> Vec<PerformanceMeasurement> {
        match self.measurements.lock() {
            Ok(measurements) => measurements
                .iter()
                .filter(|m| m.operation == operation)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Get measurements by correlation ID
    pub fn get_measurements_by_correlation(&self, correlation_id: Uuid) -> Vec<PerformanceMeasurement> {
        match self.measurements.lock() {
            Ok(measurements) => measurements
                .iter()
                .filter(|m| m.correlation_id == Some(correlation_id))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Names of all recorded operations, sorted
    pub fn operations(&self) -> Vec<String> {
        match self.measurements.lock() {
            Ok(measurements) => measurements
                .iter()
                .map(|m| m.operation.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Calculate performance statistics for an operation
    pub fn calculate_stats(&self, operation: &str) -> Option<PerformanceStats> {
        let durations: Vec<f64> = self
            .get_measurements(operation)
            .iter()
            .map(|m| m.duration_ms)
            .collect();
        PerformanceStats::from_durations(operation, durations)
    }

    pub fn clear(&self) {
        if let Ok(mut measurements) = self.measurements.lock() {
            measurements.clear();
        }
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        match self.measurements.lock() {
            Ok(measurements) => serde_json::to_string_pretty(&*measurements),
            Err(_) => Ok("[]".to_string()),
        }
    }
}

impl PerformanceStats {
    pub fn from_durations(operation: &str, mut durations: Vec<f64>) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        durations.sort_by(|a, b| a.total_cmp(b));

        let count = durations.len();
        let mean = durations.iter().sum::<f64>() / count as f64;
        let variance = durations.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / count as f64;

        let median = if count % 2 == 0 {
            (durations[count / 2 - 1] + durations[count / 2]) / 2.0
        } else {
            durations[count / 2]
        };

        let percentile = |p: f64| durations[(((count as f64) * p) as usize).min(count - 1)];

        Some(Self {
            operation: operation.to_string(),
            count,
            mean_ms: mean,
            median_ms: median,
            std_dev_ms: variance.sqrt(),
            min_ms: durations[0],
            max_ms: durations[count - 1],
            p95_ms: percentile(0.95),
            p99_ms: percentile(0.99),
        })
    }
}
