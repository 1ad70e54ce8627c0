use crate::alignment::{AlignmentOrchestrator, Scanner};
use crate::analysis::distinct_beacons;
use crate::config::AlignmentConfig;
use crate::logging::{MetricsCollector, PerformanceStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Timings for one execution mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeReport {
    pub mode: String,
    pub run_stats: PerformanceStats,
    pub pair_trial_stats: Option<PerformanceStats>,
    /// Pair trials attributed to each run through its correlation id, averaged
    pub mean_pair_trials_per_run: f64,
    pub distinct_beacons: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub scanner_count: usize,
    pub iterations: usize,
    pub modes: Vec<ModeReport>,
}

/// Times repeated alignments of the same input, sequentially and on the rayon pool
pub struct BenchmarkRunner {
    pub config: AlignmentConfig,
    pub iterations: usize,
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new(AlignmentConfig::default(), 3)
    }
}

impl BenchmarkRunner {
    pub fn new(config: AlignmentConfig, iterations: usize) -> Self {
        Self {
            config,
            iterations: iterations.max(1),
        }
    }

    pub fn run_benchmark(&self, scanners: &[Scanner]) -> crate::Result<BenchmarkReport> {
        let mut modes = Vec::new();
        let metrics = Arc::new(MetricsCollector::new(true));

        for (mode, parallel) in [("sequential", false), ("parallel", true)] {
            metrics.clear();
            let config = AlignmentConfig {
                parallel,
                ..self.config.clone()
            };
            let orchestrator = AlignmentOrchestrator::new(config).with_metrics(metrics.clone());

            let mut beacon_count = 0;
            for iteration in 0..self.iterations {
                let aligned = orchestrator.align(scanners)?;
                beacon_count = distinct_beacons(&aligned).len();
                tracing::debug!(mode = mode, iteration = iteration, "Benchmark iteration finished");
            }

            let run_stats = metrics
                .calculate_stats("alignment_run")
                .ok_or_else(|| anyhow::anyhow!("No timings recorded for {} mode", mode))?;
            let runs = metrics.get_measurements("alignment_run");
            let trials: usize = runs
                .iter()
                .filter_map(|run| run.correlation_id)
                .map(|id| {
                    metrics
                        .get_measurements_by_correlation(id)
                        .iter()
                        .filter(|m| m.operation == "pair_trial")
                        .count()
                })
                .sum();
            let mean_pair_trials_per_run = trials as f64 / runs.len() as f64;
            tracing::info!(
                mode = mode,
                mean_ms = run_stats.mean_ms,
                mean_pair_trials_per_run = mean_pair_trials_per_run,
                "Benchmark mode finished"
            );

            modes.push(ModeReport {
                mode: mode.to_string(),
                run_stats,
                pair_trial_stats: metrics.calculate_stats("pair_trial"),
                mean_pair_trials_per_run,
                distinct_beacons: beacon_count,
            });
        }

        Ok(BenchmarkReport {
            scanner_count: scanners.len(),
            iterations: self.iterations,
            modes,
        })
    }
}
