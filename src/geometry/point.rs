use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// Largest coordinate magnitude accepted from a report.
///
/// Differences and sums of two in-range points always fit in `i32`.
pub const MAX_COORDINATE: i32 = 1 << 28;

/// Integer lattice point, used for both beacon coordinates and translations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point3D {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(coords: [i32; 3]) -> Self {
        Self::new(coords[0], coords[1], coords[2])
    }

    pub fn checked_add(self, rhs: Point3D) -> Option<Point3D> {
        Some(Point3D::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    pub fn checked_sub(self, rhs: Point3D) -> Option<Point3D> {
        Some(Point3D::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
            self.z.checked_sub(rhs.z)?,
        ))
    }

    /// Manhattan distance, widened to i64 so that extreme coordinates cannot overflow
    pub fn manhattan_distance(&self, other: &Point3D) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        let dz = (self.z as i64 - other.z as i64).unsigned_abs();
        dx + dy + dz
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3D {
    type Output = Point3D;

    fn neg(self) -> Point3D {
        Point3D::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Point3D {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords: Vec<&str> = s.trim().split(',').map(|c| c.trim()).collect();
        if coords.len() != 3 {
            return Err(anyhow::anyhow!(
                "Expected three comma-separated coordinates, found {}: '{}'",
                coords.len(),
                s.trim()
            ));
        }

        let mut parsed = [0i32; 3];
        for (slot, raw) in parsed.iter_mut().zip(&coords) {
            *slot = raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid coordinate '{}': {}", raw, e))?;
            if !(-MAX_COORDINATE..=MAX_COORDINATE).contains(&*slot) {
                return Err(anyhow::anyhow!(
                    "Coordinate {} is outside -{}..={}",
                    slot,
                    MAX_COORDINATE,
                    MAX_COORDINATE
                ));
            }
        }

        Ok(Point3D::from_array(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Point3D::new(1, -2, 3);
        let b = Point3D::new(-4, 5, 6);

        assert_eq!(a + b, Point3D::new(-3, 3, 9));
        assert_eq!(a - b, Point3D::new(5, -7, -3));
        assert_eq!(-a, Point3D::new(-1, 2, -3));
        assert_eq!(a - a, Point3D::ORIGIN);
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Point3D::new(1105, -1205, 1229);
        let b = Point3D::new(-92, -2380, -20);
        assert_eq!(a.manhattan_distance(&b), 3621);
        assert_eq!(b.manhattan_distance(&a), 3621);
        assert_eq!(a.manhattan_distance(&a), 0);
    }

    #[test]
    fn test_manhattan_distance_does_not_overflow() {
        let a = Point3D::new(i32::MAX, i32::MAX, i32::MAX);
        let b = Point3D::new(i32::MIN, i32::MIN, i32::MIN);
        assert_eq!(a.manhattan_distance(&b), 3 * (u32::MAX as u64));
    }

    #[test]
    fn test_parse_and_display() {
        let p: Point3D = " -618,-824, -621 ".parse().unwrap();
        assert_eq!(p, Point3D::new(-618, -824, -621));
        assert_eq!(p.to_string(), "-618,-824,-621");

        assert!("1,2".parse::<Point3D>().is_err());
        assert!("1,2,x".parse::<Point3D>().is_err());
        assert!("1,2,3,4".parse::<Point3D>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_coordinates() {
        let edge = format!("{},0,-{}", MAX_COORDINATE, MAX_COORDINATE);
        assert!(edge.parse::<Point3D>().is_ok());

        let err = "2147483647,0,0".parse::<Point3D>().unwrap_err();
        assert!(err.to_string().contains("outside"));
        assert!("0,-2147483648,0".parse::<Point3D>().is_err());
        assert!(format!("0,0,{}", MAX_COORDINATE + 1).parse::<Point3D>().is_err());
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Point3D::new(i32::MAX, 0, 0);
        let min = Point3D::new(i32::MIN, 0, 0);
        assert!(max.checked_sub(min).is_none());
        assert!(max.checked_add(Point3D::new(1, 0, 0)).is_none());
        assert_eq!(max.checked_add(min), Some(Point3D::new(-1, 0, 0)));
        assert_eq!(max.checked_sub(Point3D::new(2, 2, 2)), Some(Point3D::new(i32::MAX - 2, -2, -2)));
    }
}
