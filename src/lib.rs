pub mod alignment;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod visualization;

pub use alignment::*;
pub use analysis::*;
pub use data::*;
pub use error::*;
pub use geometry::*;

/// Resolved position and orientation of one scanner
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScannerPlacement {
    pub name: String,
    pub position: Point3D,
    pub rotation: Rotation,
    pub aligned_against: Option<String>,
}

/// Everything the consumers of an alignment run need
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AlignmentSummary {
    pub scanner_count: usize,
    pub distinct_beacons: usize,
    pub largest_manhattan_distance: u64,
    pub scanners: Vec<ScannerPlacement>,
    pub beacons: PointSet,
}

impl AlignmentSummary {
    pub fn from_aligned(aligned: &[AlignedScanner]) -> Self {
        let beacons = distinct_beacons(aligned);
        let positions = scanner_positions(aligned);

        // Report in input order rather than alignment order
        let mut by_input: Vec<&AlignedScanner> = aligned.iter().collect();
        by_input.sort_by_key(|scanner| scanner.scanner_index);

        let scanners = by_input
            .into_iter()
            .map(|scanner| ScannerPlacement {
                name: scanner.name.clone(),
                position: scanner.position(),
                rotation: scanner.transform.rotation,
                aligned_against: scanner.aligned_against.and_then(|against| {
                    aligned
                        .iter()
                        .find(|other| other.scanner_index == against)
                        .map(|other| other.name.clone())
                }),
            })
            .collect();

        Self {
            scanner_count: aligned.len(),
            distinct_beacons: beacons.len(),
            largest_manhattan_distance: largest_manhattan_distance(&positions),
            scanners,
            beacons,
        }
    }
}

pub type Result<T> = anyhow::Result<T>;
