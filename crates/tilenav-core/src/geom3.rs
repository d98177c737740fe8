//! 3D geometry primitives: [`Point3`] and [`Cuboid`].
//!
//! `y` is the vertical axis and grows up; `x` and `z` span the horizontal
//! plane.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::coord::clamped_span;

// ---------------------------------------------------------------------------
// Point3
// ---------------------------------------------------------------------------

/// A 3D integer point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };
    /// One step up (+y).
    pub const UP: Self = Self { x: 0, y: 1, z: 0 };
    /// One step down (-y).
    pub const DOWN: Self = Self { x: 0, y: -1, z: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return a point shifted by (dx, dy, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Squared Euclidean length of the vector.
    #[inline]
    pub fn length_squared(self) -> i64 {
        let (x, y, z) = (self.x as i64, self.y as i64, self.z as i64);
        x * x + y * y + z * z
    }

    /// Number of axes on which the vector is non-zero.
    #[inline]
    pub fn nonzero_axes(self) -> usize {
        (self.x != 0) as usize + (self.y != 0) as usize + (self.z != 0) as usize
    }

    /// The six face-adjacent neighbours.
    #[inline]
    pub fn neighbors_6(self) -> [Point3; 6] {
        [
            self.shift(0, 1, 0),
            self.shift(1, 0, 0),
            self.shift(0, 0, 1),
            self.shift(0, -1, 0),
            self.shift(-1, 0, 0),
            self.shift(0, 0, -1),
        ]
    }
}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z
            .cmp(&other.z)
            .then(self.y.cmp(&other.y))
            .then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// All 26 unit offsets in 3D: faces, then edges, then vertices.
pub const OFFSETS_3D: [Point3; 26] = offsets_3d();

/// The 26 unit offsets ordered by number of non-zero axes.
const fn offsets_3d() -> [Point3; 26] {
    let mut out = [Point3::ZERO; 26];
    let mut i = 0;
    let mut axes = 1;
    while axes <= 3 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                let mut dx = -1;
                while dx <= 1 {
                    let n = (dx != 0) as i32 + (dy != 0) as i32 + (dz != 0) as i32;
                    if n == axes {
                        out[i] = Point3::new(dx, dy, dz);
                        i += 1;
                    }
                    dx += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        axes += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Cuboid
// ---------------------------------------------------------------------------

/// A half-open box \[min, max) of 3D cells.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cuboid {
    pub min: Point3,
    pub max: Point3,
}

impl PartialEq for Cuboid {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Cuboid {}

impl Cuboid {
    /// Create a new box from two corners, canonicalized so `min` ≤ `max`.
    #[inline]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A `width` × `height` × `depth` box anchored at the origin.
    #[inline]
    pub fn with_size(width: i32, height: i32, depth: i32) -> Self {
        Self::new(Point3::ZERO, Point3::new(width, height, depth))
    }

    /// The inclusive box `center ± half_extents`, as a half-open box.
    #[inline]
    pub fn around(center: Point3, half_extents: Point3) -> Self {
        let (x0, x1) = clamped_span(center.x, half_extents.x);
        let (y0, y1) = clamped_span(center.y, half_extents.y);
        let (z0, z1) = clamped_span(center.z, half_extents.z);
        Self {
            min: Point3::new(x0, y0, z0),
            max: Point3::new(x1, y1, z1),
        }
    }

    #[inline]
    pub fn size(self) -> Point3 {
        self.max - self.min
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Total number of cells in the box.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    #[inline]
    pub fn contains(self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }

    /// Intersection of two boxes; empty boxes normalize to the default.
    #[inline]
    pub fn intersect(self, other: Cuboid) -> Self {
        let r = Self {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Iterator over every cell, `x` fastest, then `y`, then `z`.
    #[inline]
    pub fn iter(self) -> CuboidIter {
        CuboidIter {
            cuboid: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Cuboid {
    type Item = Point3;
    type IntoIter = CuboidIter;
    #[inline]
    fn into_iter(self) -> CuboidIter {
        self.iter()
    }
}

impl fmt::Display for Cuboid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Iterator over the cells of a [`Cuboid`].
#[derive(Clone, Debug)]
pub struct CuboidIter {
    cuboid: Cuboid,
    cur: Point3,
}

impl Iterator for CuboidIter {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if self.cuboid.is_empty() || self.cur.z >= self.cuboid.max.z {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.cuboid.max.x {
            self.cur.x = self.cuboid.min.x;
            self.cur.y += 1;
            if self.cur.y >= self.cuboid.max.y {
                self.cur.y = self.cuboid.min.y;
                self.cur.z += 1;
            }
        }
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_offsets_cover_the_shell() {
        assert!(OFFSETS_3D[..6].iter().all(|d| d.nonzero_axes() == 1));
        assert!(OFFSETS_3D[6..18].iter().all(|d| d.nonzero_axes() == 2));
        assert!(OFFSETS_3D[18..].iter().all(|d| d.nonzero_axes() == 3));
        let mut sorted = OFFSETS_3D.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 26);
    }

    #[test]
    fn around_saturates_at_the_limits() {
        let c = Cuboid::around(Point3::new(1, 1, 1), Point3::new(i32::MAX, 0, i32::MIN));
        assert!(c.contains(Point3::new(-5, 1, 7)));
        assert_eq!(c.min.x, 1 - i32::MAX);
        assert_eq!(c.max.x, i32::MAX);
        assert_eq!((c.min.y, c.max.y), (1, 2));
        let edge = Cuboid::around(Point3::new(i32::MAX, 0, 0), Point3::new(3, 0, 0));
        assert_eq!(edge.max.x, i32::MAX);
    }

    #[test]
    fn cuboid_basics() {
        let c = Cuboid::with_size(3, 2, 4);
        assert_eq!(c.len(), 24);
        assert!(c.contains(Point3::new(2, 1, 3)));
        assert!(!c.contains(Point3::new(2, 2, 3)));
        assert_eq!(c.iter().count(), 24);
        let first: Vec<_> = c.iter().take(4).collect();
        assert_eq!(
            first,
            vec![
                Point3::new(0, 0, 0),
                Point3::new(1, 0, 0),
                Point3::new(2, 0, 0),
                Point3::new(0, 1, 0),
            ]
        );
    }

    #[test]
    fn cuboid_intersect_and_around() {
        let a = Cuboid::with_size(4, 4, 4);
        let b = Cuboid::around(Point3::new(3, 3, 3), Point3::new(1, 1, 1));
        assert_eq!(b.len(), 27);
        let c = a.intersect(b);
        assert_eq!(c, Cuboid::new(Point3::new(2, 2, 2), Point3::new(4, 4, 4)));
        let far = Cuboid::around(Point3::new(10, 10, 10), Point3::ZERO);
        assert!(a.intersect(far).is_empty());
        assert_eq!(a.intersect(far).iter().count(), 0);
    }
}
