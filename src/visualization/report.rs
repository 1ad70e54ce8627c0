use crate::analysis::BenchmarkReport;
use crate::logging::MetricsCollector;
use crate::AlignmentSummary;

pub fn print_summary(summary: &AlignmentSummary) {
    println!("=== Alignment Results ===");
    println!("Scanners aligned: {}", summary.scanner_count);
    println!("Distinct beacons: {}", summary.distinct_beacons);
    println!("Largest scanner separation (Manhattan): {}", summary.largest_manhattan_distance);
    println!();
    print_scanner_table(summary);
}

pub fn print_scanner_table(summary: &AlignmentSummary) {
    println!("| Scanner | Position | Rotation | Aligned against |");
    println!("|---------|----------|----------|-----------------|");

    for scanner in &summary.scanners {
        println!(
            "| {} | {} | {} | {} |",
            scanner.name,
            scanner.position,
            scanner.rotation,
            scanner.aligned_against.as_deref().unwrap_or("(root)")
        );
    }
}

pub fn print_benchmark_report(report: &BenchmarkReport) {
    println!(
        "=== Benchmark: {} scanners, {} iterations ===",
        report.scanner_count, report.iterations
    );
    println!("| Mode | Mean (ms) | Median (ms) | Min (ms) | Max (ms) | Pair trials | Trials/run | Mean trial (ms) |");
    println!("|------|-----------|-------------|----------|----------|-------------|------------|-----------------|");

    for mode in &report.modes {
        let (trials, trial_mean) = mode
            .pair_trial_stats
            .as_ref()
            .map(|stats| (stats.count, stats.mean_ms))
            .unwrap_or((0, 0.0));
        println!(
            "| {} | {:.2} | {:.2} | {:.2} | {:.2} | {} | {:.1} | {:.3} |",
            mode.mode,
            mode.run_stats.mean_ms,
            mode.run_stats.median_ms,
            mode.run_stats.min_ms,
            mode.run_stats.max_ms,
            trials,
            mode.mean_pair_trials_per_run,
            trial_mean
        );
    }
}

/// Per-operation timing table for a metrics collector
pub fn print_metrics_summary(metrics: &MetricsCollector) {
    println!("| Operation | Count | Mean (ms) | p95 (ms) | Max (ms) |");
    println!("|-----------|-------|-----------|----------|----------|");

    for operation in metrics.operations() {
        if let Some(stats) = metrics.calculate_stats(&operation) {
            println!(
                "| {} | {} | {:.3} | {:.3} | {:.3} |",
                stats.operation, stats.count, stats.mean_ms, stats.p95_ms, stats.max_ms
            );
        }
    }
}
