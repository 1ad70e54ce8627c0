//! Exhaustive pairwise alignment over the rotation catalog
//!
//! For each rotation the candidate beacons are rotated once, then every pairing
//! of a reference beacon with a rotated candidate beacon proposes an anchor
//! translation. If the two scanners truly overlap, one of those pairings is a
//! pair of observations of the same physical beacon, so the true translation is
//! always among the anchors.

use crate::alignment::{PairMatch, PairMatcher};
use crate::config::AlignmentConfig;
use crate::geometry::{Point3D, PointSet, Rotation, RotationCatalog, Transform};
use rayon::prelude::*;
use std::collections::HashSet;

/// Default number of coinciding beacons that proves two scanners overlap
pub const DEFAULT_OVERLAP_THRESHOLD: usize = 12;

#[derive(Debug, Clone)]
pub struct PairAligner {
    overlap_threshold: usize,
    parallel: bool,
}

impl Default for PairAligner {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAP_THRESHOLD)
    }
}

impl PairAligner {
    pub fn new(overlap_threshold: usize) -> Self {
        Self {
            overlap_threshold: overlap_threshold.max(1),
            parallel: true,
        }
    }

    pub fn from_config(config: &AlignmentConfig) -> Self {
        Self::new(config.overlap_threshold).with_parallel(config.parallel)
    }

    /// Evaluate the 24 rotations on the rayon pool instead of in sequence
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Search every anchor translation for a single rotation
    fn try_rotation(&self, rotation: &Rotation, reference: &PointSet, candidate: &PointSet) -> Option<PairMatch> {
        // A beacon at i32::MIN cannot be negated, so such rotations cannot map it anywhere.
        let rotated: Vec<Point3D> = candidate
            .iter()
            .map(|&p| rotation.checked_apply(p))
            .collect::<Option<_>>()?;

        // Any overlap of `threshold` beacons includes at least one of the first
        // `len - threshold + 1` reference beacons, so later anchors are redundant.
        let anchor_count = reference.len() + 1 - self.overlap_threshold;
        let mut tried = HashSet::with_capacity(anchor_count * rotated.len());

        for &reference_point in &reference.as_slice()[..anchor_count] {
            for &rotated_point in &rotated {
                let Some(translation) = reference_point.checked_sub(rotated_point) else {
                    continue;
                };
                if !tried.insert(translation) {
                    continue;
                }

                if reference.overlap_reaches(&rotated, translation, self.overlap_threshold) {
                    // Every candidate beacon must have a representable global position.
                    let Some(global_beacons) = rotated
                        .iter()
                        .map(|&p| p.checked_add(translation))
                        .collect::<Option<PointSet>>()
                    else {
                        continue;
                    };
                    let overlap = reference.count_overlap(&rotated, translation);
                    tracing::trace!(
                        rotation = rotation.index(),
                        translation = %translation,
                        overlap = overlap,
                        "Anchor accepted"
                    );
                    return Some(PairMatch {
                        transform: Transform::new(*rotation, translation),
                        global_beacons,
                        overlap,
                    });
                }
            }
        }

        None
    }
}

impl PairMatcher for PairAligner {
    fn name(&self) -> &str {
        "exhaustive-anchor"
    }

    fn overlap_threshold(&self) -> usize {
        self.overlap_threshold
    }

    fn try_align(&self, reference: &PointSet, candidate: &PointSet) -> Option<PairMatch> {
        if reference.len() < self.overlap_threshold || candidate.len() < self.overlap_threshold {
            return None;
        }

        let rotations = RotationCatalog::global().rotations();
        if self.parallel {
            rotations
                .par_iter()
                .find_map_first(|rotation| self.try_rotation(rotation, reference, candidate))
        } else {
            rotations
                .iter()
                .find_map(|rotation| self.try_rotation(rotation, reference, candidate))
        }
    }
}
