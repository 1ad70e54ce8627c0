use crate::alignment::PairMatch;
use crate::geometry::PointSet;

/// Finds the transform that makes two beacon sets coincide
pub trait PairMatcher: Send + Sync {
    /// Returns the name of the matcher
    fn name(&self) -> &str;

    /// Minimum number of coinciding beacons for a match
    fn overlap_threshold(&self) -> usize;

    /// Try to express `candidate` (local coordinates) in the frame of `reference`.
    ///
    /// `None` means the pair does not overlap, which is the common outcome.
    fn try_align(&self, reference: &PointSet, candidate: &PointSet) -> Option<PairMatch>;
}
