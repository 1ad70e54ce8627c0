//! The 24 proper rotations of the cube
//!
//! Every axis-aligned orientation of a scanner is one signed permutation of the
//! coordinate axes. Of the 48 signed permutations, exactly half have determinant
//! +1; the other half are mirror images and are never generated.

use crate::error::AlignmentError;
use crate::geometry::Point3D;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of reflection-free axis-aligned rotations
pub const ROTATION_COUNT: usize = 24;

const BASIS: [Point3D; 3] = [
    Point3D::new(1, 0, 0),
    Point3D::new(0, 1, 0),
    Point3D::new(0, 0, 1),
];

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

lazy_static! {
    static ref CATALOG: RotationCatalog = RotationCatalog::generate();
}

/// One catalog rotation: output axis `i` takes input axis `axes[i]` scaled by `signs[i]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Rotation {
    index: usize,
    axes: [usize; 3],
    signs: [i32; 3],
}

impl Rotation {
    /// The identity rotation, always catalog index 0
    pub fn identity() -> Self {
        RotationCatalog::global().rotations[0]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_identity(&self) -> bool {
        self.index == 0
    }

    pub fn apply(&self, point: Point3D) -> Point3D {
        let coords = point.to_array();
        Point3D::new(
            self.signs[0] * coords[self.axes[0]],
            self.signs[1] * coords[self.axes[1]],
            self.signs[2] * coords[self.axes[2]],
        )
    }

    /// `None` when negating a coordinate would overflow (only `i32::MIN` can)
    pub fn checked_apply(&self, point: Point3D) -> Option<Point3D> {
        let coords = point.to_array();
        let mut out = [0i32; 3];
        for (slot, (&axis, &sign)) in out.iter_mut().zip(self.axes.iter().zip(&self.signs)) {
            *slot = coords[axis].checked_mul(sign)?;
        }
        Some(Point3D::from_array(out))
    }

    /// Row-major 3x3 matrix with a single +/-1 per row and column
    pub fn matrix(&self) -> [[i32; 3]; 3] {
        let mut matrix = [[0; 3]; 3];
        for (row, (&axis, &sign)) in self.axes.iter().zip(&self.signs).enumerate() {
            matrix[row][axis] = sign;
        }
        matrix
    }

    pub fn determinant(&self) -> i32 {
        permutation_parity(&self.axes) * self.signs.iter().product::<i32>()
    }

    fn maps_basis_like(&self, f: impl Fn(Point3D) -> Point3D) -> bool {
        BASIS.iter().all(|&e| self.apply(e) == f(e))
    }
}

impl TryFrom<usize> for Rotation {
    type Error = AlignmentError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        RotationCatalog::global()
            .get(index)
            .copied()
            .ok_or(AlignmentError::InvalidRotation(index))
    }
}

impl From<Rotation> for usize {
    fn from(rotation: Rotation) -> usize {
        rotation.index
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 3] = ["x", "y", "z"];
        let terms: Vec<String> = self
            .axes
            .iter()
            .zip(&self.signs)
            .map(|(&axis, &sign)| format!("{}{}", if sign < 0 { "-" } else { "+" }, NAMES[axis]))
            .collect();
        write!(f, "#{} ({})", self.index, terms.join(", "))
    }
}

/// Process-wide table of the 24 rotations
#[derive(Debug)]
pub struct RotationCatalog {
    rotations: Vec<Rotation>,
}

impl RotationCatalog {
    /// The shared catalog, generated on first use
    pub fn global() -> &'static RotationCatalog {
        &CATALOG
    }

    fn generate() -> Self {
        let mut rotations = Vec::with_capacity(ROTATION_COUNT);

        for axes in PERMUTATIONS {
            for sign_mask in 0..8u8 {
                let signs = [0, 1, 2].map(|bit| if sign_mask & (1 << bit) == 0 { 1 } else { -1 });
                let candidate = Rotation {
                    index: rotations.len(),
                    axes,
                    signs,
                };
                if candidate.determinant() == 1 {
                    rotations.push(candidate);
                }
            }
        }

        debug_assert_eq!(rotations.len(), ROTATION_COUNT);
        Self { rotations }
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rotation> {
        self.rotations.get(index)
    }

    /// Apply the rotation with the given catalog index; `None` for an unknown index
    pub fn apply(&self, index: usize, point: Point3D) -> Option<Point3D> {
        self.get(index).map(|rotation| rotation.apply(point))
    }

    /// The catalog entry that undoes `rotation`
    pub fn inverse(&self, rotation: &Rotation) -> Rotation {
        // The group is closed under inversion, so the search always succeeds.
        self.rotations
            .iter()
            .copied()
            .find(|candidate| BASIS.iter().all(|&e| candidate.apply(rotation.apply(e)) == e))
            .unwrap_or(self.rotations[0])
    }

    /// The catalog entry equivalent to applying `second` after `first`
    pub fn compose(&self, first: &Rotation, second: &Rotation) -> Rotation {
        self.rotations
            .iter()
            .copied()
            .find(|candidate| candidate.maps_basis_like(|e| second.apply(first.apply(e))))
            .unwrap_or(self.rotations[0])
    }
}

fn permutation_parity(axes: &[usize; 3]) -> i32 {
    let mut inversions = 0;
    for i in 0..3 {
        for j in (i + 1)..3 {
            if axes[i] > axes[j] {
                inversions += 1;
            }
        }
    }
    if inversions % 2 == 0 {
        1
    } else {
        -1
    }
}
