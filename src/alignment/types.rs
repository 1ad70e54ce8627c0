use crate::geometry::{Point3D, PointSet, Transform};
use serde::{Deserialize, Serialize};

/// A scanner and the beacons it reports, in its own local frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanner {
    /// Label used for diagnostics only
    pub name: String,

    /// Beacons in local coordinates, in report order
    pub beacons: Vec<Point3D>,
}

impl Scanner {
    pub fn new<S: Into<String>>(name: S, beacons: Vec<Point3D>) -> Self {
        Self {
            name: name.into(),
            beacons,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beacons(&self) -> &[Point3D] {
        &self.beacons
    }

    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }
}

/// A scanner whose transform into the global frame is known.
///
/// Created exactly once per scanner by the orchestrator and never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedScanner {
    /// Position of the scanner in the input list
    pub scanner_index: usize,

    pub name: String,

    /// Local-to-global transform
    pub transform: Transform,

    /// Index of the aligned scanner this one was matched against (`None` for the root)
    pub aligned_against: Option<usize>,

    /// Beacons already expressed in global coordinates
    beacons: PointSet,
}

impl AlignedScanner {
    /// The scanner that defines the global frame
    pub fn root(scanner_index: usize, scanner: &Scanner) -> Self {
        Self {
            scanner_index,
            name: scanner.name.clone(),
            transform: Transform::identity(),
            aligned_against: None,
            beacons: scanner.beacons.iter().copied().collect(),
        }
    }

    pub fn from_match(scanner_index: usize, scanner: &Scanner, aligned_against: usize, matched: PairMatch) -> Self {
        Self {
            scanner_index,
            name: scanner.name.clone(),
            transform: matched.transform,
            aligned_against: Some(aligned_against),
            beacons: matched.global_beacons,
        }
    }

    pub fn global_beacons(&self) -> &PointSet {
        &self.beacons
    }

    /// Scanner position in the global frame
    pub fn position(&self) -> Point3D {
        self.transform.position()
    }

    pub fn is_root(&self) -> bool {
        self.aligned_against.is_none()
    }
}

/// Successful outcome of a pair trial
#[derive(Debug, Clone)]
pub struct PairMatch {
    pub transform: Transform,

    /// Candidate beacons mapped into the reference frame
    pub global_beacons: PointSet,

    /// Number of candidate beacons coinciding with reference beacons
    pub overlap: usize,
}
