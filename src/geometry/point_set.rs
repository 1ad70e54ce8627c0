use crate::geometry::Point3D;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Deduplicated set of points.
///
/// Keeps first-insertion order for deterministic iteration alongside a hash
/// index for constant-time membership tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Point3D>", into = "Vec<Point3D>")]
pub struct PointSet {
    ordered: Vec<Point3D>,
    index: HashSet<Point3D>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ordered: Vec::with_capacity(capacity),
            index: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a point; returns false if it was already present
    pub fn insert(&mut self, point: Point3D) -> bool {
        if self.index.insert(point) {
            self.ordered.push(point);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, point: &Point3D) -> bool {
        self.index.contains(point)
    }

    /// Membership of `point + offset`; a sum outside `i32` is never a member
    fn contains_shifted(&self, point: Point3D, offset: Point3D) -> bool {
        point.checked_add(offset).is_some_and(|p| self.contains(&p))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3D> {
        self.ordered.iter()
    }

    pub fn as_slice(&self) -> &[Point3D] {
        &self.ordered
    }

    /// Number of `points`, shifted by `offset`, that land on a member of this set
    pub fn count_overlap(&self, points: &[Point3D], offset: Point3D) -> usize {
        points.iter().filter(|&&p| self.contains_shifted(p, offset)).count()
    }

    /// Whether at least `threshold` of the shifted `points` land on members.
    ///
    /// Stops as soon as the answer is known: either the threshold is reached or
    /// the points left to examine can no longer reach it.
    pub fn overlap_reaches(&self, points: &[Point3D], offset: Point3D, threshold: usize) -> bool {
        if threshold == 0 {
            return true;
        }

        let mut hits = 0;
        for (examined, &p) in points.iter().enumerate() {
            if self.contains_shifted(p, offset) {
                hits += 1;
                if hits >= threshold {
                    return true;
                }
            }
            let remaining = points.len() - examined - 1;
            if hits + remaining < threshold {
                return false;
            }
        }
        false
    }

    pub fn intersection_count(&self, other: &PointSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|p| large.contains(p)).count()
    }

    pub fn into_vec(self) -> Vec<Point3D> {
        self.ordered
    }
}

impl Extend<Point3D> for PointSet {
    fn extend<I: IntoIterator<Item = Point3D>>(&mut self, iter: I) {
        for point in iter {
            self.insert(point);
        }
    }
}

impl FromIterator<Point3D> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        let mut set = PointSet::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<Point3D>> for PointSet {
    fn from(points: Vec<Point3D>) -> Self {
        points.into_iter().collect()
    }
}

impl From<PointSet> for Vec<Point3D> {
    fn from(set: PointSet) -> Self {
        set.ordered
    }
}

impl PartialEq for PointSet {
    /// Set equality; insertion order is ignored
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for PointSet {}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3D;
    type IntoIter = std::slice::Iter<'a, Point3D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
