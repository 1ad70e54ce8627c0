use scanner_alignment::config::{AlignmentConfig, GeneratorConfig};
use scanner_alignment::logging::MetricsCollector;
use scanner_alignment::*;
use std::sync::Arc;

const ROTATIONS: [usize; 4] = [7, 13, 18, 22];
const TRANSLATIONS: [(i32, i32, i32); 4] = [
    (68, -1246, -43),
    (1105, -1205, 1229),
    (-92, -2380, -20),
    (-20, -1133, 1061),
];

/// Deterministic, irregular beacon layout
fn beacon(k: i32) -> Point3D {
    Point3D::new(
        (k * k * 31 + 7 * k) % 1999 - 1000,
        (k * k * k * 17 + 3) % 1997 - 1000,
        (k * k * 13 + k * 101) % 1993 - 1000,
    )
}

fn ground_truth(i: usize) -> Transform {
    if i == 0 {
        return Transform::identity();
    }
    let (x, y, z) = TRANSLATIONS[i - 1];
    Transform::new(
        RotationCatalog::global().rotations()[ROTATIONS[i - 1]],
        Point3D::new(x, y, z),
    )
}

/// Scanner 0 sees beacons 0..30. Scanner i (1..=4) sees 12 of those plus
/// 8 beacons of its own, reported in its local frame.
fn five_scanner_fixture() -> Vec<Scanner> {
    let base: Vec<Point3D> = (0..30).map(beacon).collect();
    let mut scanners = vec![Scanner::new("scanner 0", base.clone())];

    for i in 1..=4usize {
        let mut global: Vec<Point3D> = base[i * 4..i * 4 + 12].to_vec();
        global.extend((0..8).map(|j| beacon(100 + i as i32 * 10 + j)));
        let local = ground_truth(i).inverse().apply_all(&global);
        scanners.push(Scanner::new(format!("scanner {}", i), local));
    }

    scanners
}

fn sequential() -> AlignmentConfig {
    AlignmentConfig {
        parallel: false,
        ..AlignmentConfig::default()
    }
}

#[test]
fn test_recovers_known_transforms() {
    let scanners = five_scanner_fixture();

    for config in [sequential(), AlignmentConfig::default()] {
        let aligned = align(&scanners, &config).unwrap();
        assert_eq!(aligned.len(), 5);

        for scanner in &aligned {
            let truth = ground_truth(scanner.scanner_index);
            assert_eq!(scanner.transform, truth, "wrong transform for {}", scanner.name);
            assert_eq!(scanner.position(), truth.translation);

            let expected: PointSet = truth.apply_all(scanners[scanner.scanner_index].beacons()).into();
            assert_eq!(scanner.global_beacons(), &expected);
        }

        // 30 shared beacons plus 8 private ones for each of the four other scanners
        assert_eq!(distinct_beacons(&aligned).len(), 62);
        assert_eq!(largest_manhattan_distance(&scanner_positions(&aligned)), 3621);
    }
}

#[test]
fn test_root_is_identity() {
    let aligned = align(&five_scanner_fixture(), &sequential()).unwrap();
    let root = aligned.iter().find(|s| s.is_root()).unwrap();
    assert_eq!(root.scanner_index, 0);
    assert!(root.transform.is_identity());
    assert_eq!(aligned.iter().filter(|s| s.is_root()).count(), 1);
}

#[test]
fn test_underlapping_scanner_stalls() {
    let mut scanners = five_scanner_fixture();

    // Sees only 11 of the root's beacons and nothing the other scanners see
    let mut global: Vec<Point3D> = (0..11).map(beacon).collect();
    global.extend((0..6).map(|j| beacon(180 + j)));
    let transform = Transform::new(RotationCatalog::global().rotations()[3], Point3D::new(500, 500, 500));
    scanners.push(Scanner::new("scanner 5", transform.inverse().apply_all(&global)));

    let err = align(&scanners, &sequential()).unwrap_err();
    assert_eq!(
        err,
        AlignmentError::AlignmentStalled {
            remaining: vec!["scanner 5".to_string()]
        }
    );
    assert!(err.to_string().contains("scanner 5"));
}

#[test]
fn test_scanner_with_too_few_beacons_stalls() {
    let mut scanners = five_scanner_fixture();
    scanners.push(Scanner::new("tiny", (0..5).map(beacon).collect()));

    let err = align(&scanners, &AlignmentConfig::default()).unwrap_err();
    assert!(matches!(err, AlignmentError::AlignmentStalled { ref remaining } if remaining == &["tiny"]));
}

#[test]
fn test_pools_grow_monotonically() {
    let scanners = five_scanner_fixture();
    let matcher = PairAligner::default().with_parallel(false);
    let mut state = AlignmentState::new(&scanners, true).unwrap();

    let mut previous = state.aligned().len();
    while !state.is_complete() {
        let outcome = state.step(&matcher, false, None).unwrap();
        assert!(matches!(outcome, StepOutcome::Promoted { .. }));
        assert_eq!(state.aligned().len() + state.unaligned().len(), scanners.len());
        assert_eq!(state.aligned().len(), previous + 1);
        previous = state.aligned().len();
    }
    assert_eq!(state.step(&matcher, false, None).unwrap(), StepOutcome::Complete);
}

#[test]
fn test_alignment_is_idempotent() {
    let scanners = five_scanner_fixture();

    let first = AlignmentSummary::from_aligned(&align(&scanners, &sequential()).unwrap());
    let second = AlignmentSummary::from_aligned(&align(&scanners, &AlignmentConfig::default()).unwrap());

    assert_eq!(first.beacons, second.beacons);
    let positions = |summary: &AlignmentSummary| -> Vec<Point3D> { summary.scanners.iter().map(|s| s.position).collect() };
    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn test_input_order_does_not_change_results() {
    let scanners = five_scanner_fixture();
    let forward = align(&scanners, &sequential()).unwrap();

    // Put scanner 4 first: its frame becomes the global one, so compare
    // relative geometry instead of absolute coordinates.
    let mut reordered = scanners.clone();
    reordered.rotate_left(4);
    let shifted = align(&reordered, &sequential()).unwrap();

    assert_eq!(distinct_beacons(&forward).len(), distinct_beacons(&shifted).len());
    assert_eq!(
        largest_manhattan_distance(&scanner_positions(&forward)),
        largest_manhattan_distance(&scanner_positions(&shifted))
    );
}

#[test]
fn test_uncached_failed_pairs_give_same_result() {
    let scanners = five_scanner_fixture();
    let config = AlignmentConfig {
        cache_failed_pairs: false,
        ..sequential()
    };
    let aligned = align(&scanners, &config).unwrap();
    assert_eq!(distinct_beacons(&aligned).len(), 62);
}

#[test]
fn test_generated_fixtures_align_exactly() {
    for seed in [1, 7, 19, 2024] {
        let fixture = generate_fixture(&GeneratorConfig {
            seed,
            ..GeneratorConfig::default()
        })
        .unwrap();

        let aligned = align(&fixture.scanners, &AlignmentConfig::default()).unwrap();
        for scanner in &aligned {
            assert_eq!(scanner.transform, fixture.ground_truth[scanner.scanner_index], "seed {}", seed);
        }
        assert_eq!(distinct_beacons(&aligned), fixture.beacons, "seed {}", seed);
    }
}

#[test]
fn test_configurable_threshold() {
    let scanners = five_scanner_fixture();

    // Every scanner shares exactly 12 beacons with the root, so 13 cannot be met
    let strict = AlignmentConfig {
        overlap_threshold: 13,
        ..sequential()
    };
    assert!(matches!(
        align(&scanners, &strict),
        Err(AlignmentError::AlignmentStalled { .. })
    ));
}

#[test]
fn test_metrics_are_recorded() {
    let metrics = Arc::new(MetricsCollector::new(true));
    let orchestrator = AlignmentOrchestrator::new(AlignmentConfig::default()).with_metrics(metrics.clone());

    orchestrator.align(&five_scanner_fixture()).unwrap();

    assert_eq!(metrics.get_measurements("alignment_run").len(), 1);
    assert!(metrics.get_measurements("pair_trial").len() >= 4);
}

#[test]
fn test_pair_trials_carry_the_run_correlation_id() {
    let metrics = Arc::new(MetricsCollector::new(true));
    let orchestrator = AlignmentOrchestrator::new(AlignmentConfig::default()).with_metrics(metrics.clone());
    assert!(orchestrator.config().parallel);

    orchestrator.align(&five_scanner_fixture()).unwrap();

    let runs = metrics.get_measurements("alignment_run");
    assert_eq!(runs.len(), 1);
    let run_id = runs[0].correlation_id.expect("run has a correlation id");

    let trials = metrics.get_measurements("pair_trial");
    assert!(!trials.is_empty());
    for trial in &trials {
        assert_eq!(trial.correlation_id, Some(run_id));
    }
    assert_eq!(metrics.get_measurements_by_correlation(run_id).len(), trials.len() + 1);
}

#[test]
fn test_extreme_coordinates_align_without_overflow() {
    let scanners = vec![
        Scanner::new("scanner 0", vec![Point3D::new(i32::MAX, 0, 0), Point3D::new(1, 1, 1)]),
        Scanner::new("scanner 1", vec![Point3D::new(i32::MIN, 0, 0), Point3D::new(2, 2, 2)]),
    ];
    let config = AlignmentConfig {
        overlap_threshold: 1,
        ..AlignmentConfig::default()
    };

    let aligned = align(&scanners, &config).unwrap();
    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[1].position(), Point3D::new(i32::MAX - 2, -2, -2));
    assert_eq!(distinct_beacons(&aligned).len(), 3);
}

#[test]
fn test_summary_lists_scanners_in_input_order() {
    let scanners = five_scanner_fixture();
    let summary = AlignmentSummary::from_aligned(&align(&scanners, &sequential()).unwrap());

    assert_eq!(summary.scanner_count, 5);
    assert_eq!(summary.distinct_beacons, 62);
    assert_eq!(summary.largest_manhattan_distance, 3621);

    let names: Vec<&str> = summary.scanners.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["scanner 0", "scanner 1", "scanner 2", "scanner 3", "scanner 4"]);
    assert!(summary.scanners[0].aligned_against.is_none());
    assert_eq!(summary.scanners[1].aligned_against.as_deref(), Some("scanner 0"));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["distinct_beacons"], 62);
    assert_eq!(json["scanners"][2]["rotation"], 13);
}

#[test]
fn test_report_round_trip_then_align() {
    let scanners = five_scanner_fixture();
    let text = format_scanner_report(&scanners);
    let parsed = parse_scanner_report(&text).unwrap();
    assert_eq!(parsed, scanners);

    let aligned = align(&parsed, &AlignmentConfig::default()).unwrap();
    assert_eq!(distinct_beacons(&aligned).len(), 62);
}
