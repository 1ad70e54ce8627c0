use scanner_alignment::config::{Config, ConfigFormat, GeneratorConfig};
use scanner_alignment::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_generated_report_aligns_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("scanners.txt");
    let config_path = temp_dir.path().join("alignment.toml");

    let mut config = Config::default();
    config.generator = GeneratorConfig {
        scanner_count: 6,
        seed: 42,
        ..GeneratorConfig::default()
    };
    config.alignment.parallel = false;
    config.save_to_file(&config_path, ConfigFormat::Toml).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    let fixture = generate_fixture(&config.generator).unwrap();
    fs::write(&report_path, format_scanner_report(&fixture.scanners)).unwrap();

    let scanners = load_scanners(&report_path).unwrap();
    assert_eq!(scanners.len(), 6);

    let aligned = align(&scanners, &config.alignment).unwrap();
    let summary = AlignmentSummary::from_aligned(&aligned);
    assert_eq!(summary.distinct_beacons, fixture.beacons.len());
    for (placement, truth) in summary.scanners.iter().zip(&fixture.ground_truth) {
        assert_eq!(placement.position, truth.translation);
        assert_eq!(placement.rotation, truth.rotation);
    }
}

#[test]
fn test_hand_written_report() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("tiny.txt");

    // Threshold 3 with three shared beacons and scanner 1 sitting at (5, 2, 0)
    let report = "--- scanner 0 ---\n0,2,0\n4,1,0\n3,3,0\n\n--- scanner 1 ---\n-1,-1,0\n-5,0,0\n-2,1,0\n";
    fs::write(&report_path, report).unwrap();

    let scanners = load_scanners(&report_path).unwrap();
    let config = scanner_alignment::config::AlignmentConfig {
        overlap_threshold: 3,
        ..Default::default()
    };
    let aligned = align(&scanners, &config).unwrap();

    assert_eq!(aligned.len(), 2);
    assert_eq!(distinct_beacons(&aligned).len(), 3);
    assert_eq!(aligned[1].position(), Point3D::new(5, 2, 0));
    assert!(aligned[1].transform.rotation.is_identity());
    assert_eq!(largest_manhattan_distance(&scanner_positions(&aligned)), 7);
}

#[test]
fn test_malformed_report_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("broken.txt");
    fs::write(&report_path, "--- scanner 0 ---\n1,2\n").unwrap();

    let err = load_scanners(&report_path).unwrap_err();
    assert!(format!("{:#}", err).contains("Line 2"));
}
