use anyhow::Context;
use clap::{Parser, Subcommand};
use scanner_alignment::config::{load_config_or_default, Config};
use scanner_alignment::logging::{init_logging, MetricsCollector};
use scanner_alignment::visualization::{print_benchmark_report, print_metrics_summary, print_summary};
use scanner_alignment::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "align")]
#[command(about = "Align beacon scanners into a single global frame")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Align the scanners of a report and print beacon and distance results
    Align {
        /// Path to the scanner report
        #[arg(short, long)]
        input: PathBuf,

        /// Override the overlap threshold
        #[arg(short, long)]
        threshold: Option<usize>,

        /// Disable parallel evaluation
        #[arg(long)]
        sequential: bool,

        /// Output file for the JSON summary
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for per-trial timing measurements (JSON)
        #[arg(long)]
        metrics: Option<PathBuf>,
    },

    /// Write a synthetic scanner report with known ground truth
    Generate {
        /// Output file for the report
        #[arg(short, long)]
        output: PathBuf,

        /// Number of scanners
        #[arg(short = 'n', long)]
        scanners: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate a fixture, align it and compare against the ground truth
    Verify {
        /// Number of scanners
        #[arg(short = 'n', long)]
        scanners: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Time repeated alignments in sequential and parallel mode
    Benchmark {
        /// Path to the scanner report
        #[arg(short, long)]
        input: PathBuf,

        /// Alignments per mode
        #[arg(short = 'n', long, default_value = "3")]
        iterations: usize,

        /// Output file for benchmark results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref());
    config.logging = match cli.verbose {
        0 => config.logging,
        1 => config.logging.with_level("info"),
        2 => config.logging.with_level("debug"),
        _ => config.logging.with_level("trace"),
    };
    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        Commands::Align {
            input,
            threshold,
            sequential,
            output,
            metrics,
        } => {
            handle_align(config, &input, threshold, sequential, output, metrics)?;
        }
        Commands::Generate { output, scanners, seed } => {
            handle_generate(config, &output, scanners, seed)?;
        }
        Commands::Verify { scanners, seed } => {
            handle_verify(config, scanners, seed)?;
        }
        Commands::Benchmark { input, iterations, output } => {
            handle_benchmark(config, &input, iterations, output)?;
        }
    }

    Ok(())
}

fn handle_align(
    mut config: Config,
    input: &Path,
    threshold: Option<usize>,
    sequential: bool,
    output: Option<PathBuf>,
    metrics_output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(threshold) = threshold {
        anyhow::ensure!(threshold > 0, "Overlap threshold must be at least 1");
        config.alignment.overlap_threshold = threshold;
    }
    if sequential {
        config.alignment.parallel = false;
    }

    let scanners = load_scanners(input)?;
    println!("Loaded {} scanners from {:?}", scanners.len(), input);

    let metrics = Arc::new(MetricsCollector::new(metrics_output.is_some()));
    let aligned = AlignmentOrchestrator::new(config.alignment)
        .with_metrics(metrics.clone())
        .align(&scanners)?;
    let summary = AlignmentSummary::from_aligned(&aligned);
    print_summary(&summary);

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write summary to {:?}", output_path))?;
        println!("Summary saved to {:?}", output_path);
    }

    if let Some(metrics_path) = metrics_output {
        println!();
        print_metrics_summary(&metrics);
        std::fs::write(&metrics_path, metrics.export_to_json()?)
            .with_context(|| format!("Failed to write metrics to {:?}", metrics_path))?;
        println!("Metrics saved to {:?}", metrics_path);
    }

    Ok(())
}

fn handle_generate(mut config: Config, output: &Path, scanners: Option<usize>, seed: Option<u64>) -> anyhow::Result<()> {
    if let Some(scanners) = scanners {
        config.generator.scanner_count = scanners;
    }
    if let Some(seed) = seed {
        config.generator.seed = seed;
    }

    let fixture = generate_fixture(&config.generator)?;
    std::fs::write(output, format_scanner_report(&fixture.scanners))
        .with_context(|| format!("Failed to write report to {:?}", output))?;

    println!("Wrote {} scanners to {:?}", fixture.scanners.len(), output);
    println!("Distinct beacons: {}", fixture.beacons.len());
    for (scanner, transform) in fixture.scanners.iter().zip(&fixture.ground_truth) {
        println!("  {}: {}", scanner.name, transform);
    }

    Ok(())
}

fn handle_verify(mut config: Config, scanners: Option<usize>, seed: Option<u64>) -> anyhow::Result<()> {
    if let Some(scanners) = scanners {
        config.generator.scanner_count = scanners;
    }
    if let Some(seed) = seed {
        config.generator.seed = seed;
    }

    let fixture = generate_fixture(&config.generator)?;
    println!(
        "Generated {} scanners with {} distinct beacons (seed {})",
        fixture.scanners.len(),
        fixture.beacons.len(),
        config.generator.seed
    );

    let aligned = align(&fixture.scanners, &config.alignment)?;
    let mut mismatches = Vec::new();

    for scanner in &aligned {
        let expected = fixture.ground_truth[scanner.scanner_index];
        if scanner.transform == expected {
            println!("  ✅ {}: {}", scanner.name, scanner.transform);
        } else {
            println!("  ❌ {}: got {}, expected {}", scanner.name, scanner.transform, expected);
            mismatches.push(scanner.name.clone());
        }
    }

    let beacons = distinct_beacons(&aligned);
    if beacons != fixture.beacons {
        println!(
            "  ❌ beacon union has {} beacons ({} of them real), expected {}",
            beacons.len(),
            beacons.intersection_count(&fixture.beacons),
            fixture.beacons.len()
        );
        mismatches.push("beacon union".to_string());
    }

    anyhow::ensure!(mismatches.is_empty(), "Verification failed for: {}", mismatches.join(", "));
    println!("All {} scanners recovered exactly", aligned.len());
    Ok(())
}

fn handle_benchmark(config: Config, input: &Path, iterations: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let scanners = load_scanners(input)?;
    let report = BenchmarkRunner::new(config.alignment, iterations).run_benchmark(&scanners)?;
    print_benchmark_report(&report);

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&output_path, json)?;
        println!("Benchmark results saved to {:?}", output_path);
    }

    Ok(())
}
