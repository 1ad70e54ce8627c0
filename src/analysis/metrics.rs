use crate::alignment::AlignedScanner;
use crate::geometry::{Point3D, PointSet};

/// Union of every aligned scanner's global beacons
pub fn distinct_beacons(aligned: &[AlignedScanner]) -> PointSet {
    let mut union = PointSet::new();
    for scanner in aligned {
        union.extend(scanner.global_beacons().iter().copied());
    }
    union
}

/// Global position of each aligned scanner, in alignment order
pub fn scanner_positions(aligned: &[AlignedScanner]) -> Vec<Point3D> {
    aligned.iter().map(|scanner| scanner.position()).collect()
}

/// Largest Manhattan distance between any two positions (0 for fewer than two)
pub fn largest_manhattan_distance(positions: &[Point3D]) -> u64 {
    positions
        .iter()
        .enumerate()
        .flat_map(|(i, a)| positions[i + 1..].iter().map(move |b| a.manhattan_distance(b)))
        .max()
        .unwrap_or(0)
}
