//! Dimension-agnostic coordinates.
//!
//! [`Coord`] abstracts over [`Point`] and [`Point3`], and [`Extent`] over the
//! matching bounding shapes [`Range`] and [`Cuboid`]. Algorithms written
//! against these traits work on 2D grids and 3D volumes alike, and use the
//! linear index from [`Extent::index`] as the key into their node arrays.

use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Neg, Sub};

use crate::geom::{OFFSETS_2D, Point, Range};
use crate::geom3::{Cuboid, OFFSETS_3D, Point3};

/// An integer grid coordinate with a fixed number of axes.
pub trait Coord:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Number of axes.
    const DIM: usize;

    /// Index of the vertical axis.
    const VERTICAL: usize = 1;

    /// Every unit step, ordered by number of non-zero axes (orthogonals
    /// first).
    const UNIT_OFFSETS: &'static [Self];

    /// Component along axis `i` (`0 = x`, `1 = y`, `2 = z`).
    fn axis(self, i: usize) -> i32;

    /// Replace the component along axis `i`.
    fn with_axis(self, i: usize, v: i32) -> Self;

    /// The unit vector along axis `i`.
    fn unit(i: usize) -> Self {
        Self::default().with_axis(i, 1)
    }

    /// Squared Euclidean distance to `other`.
    fn distance_squared(self, other: Self) -> i64 {
        (0..Self::DIM)
            .map(|i| {
                let d = self.axis(i) as i64 - other.axis(i) as i64;
                d * d
            })
            .sum()
    }

    /// Component-wise sign, i.e. the discrete direction of the vector.
    fn signum(self) -> Self {
        (0..Self::DIM).fold(self, |p, i| p.with_axis(i, self.axis(i).signum()))
    }

    /// Whether every component is in `-1..=1` and at least one is non-zero.
    fn is_unit_step(self) -> bool {
        self != Self::default() && (0..Self::DIM).all(|i| self.axis(i).abs() <= 1)
    }
}

impl Coord for Point {
    const DIM: usize = 2;
    const UNIT_OFFSETS: &'static [Self] = &OFFSETS_2D;

    #[inline]
    fn axis(self, i: usize) -> i32 {
        match i {
            0 => self.x,
            _ => self.y,
        }
    }

    #[inline]
    fn with_axis(self, i: usize, v: i32) -> Self {
        match i {
            0 => Point::new(v, self.y),
            _ => Point::new(self.x, v),
        }
    }
}

impl Coord for Point3 {
    const DIM: usize = 3;
    const UNIT_OFFSETS: &'static [Self] = &OFFSETS_3D;

    #[inline]
    fn axis(self, i: usize) -> i32 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    fn with_axis(self, i: usize, v: i32) -> Self {
        match i {
            0 => Point3::new(v, self.y, self.z),
            1 => Point3::new(self.x, v, self.z),
            _ => Point3::new(self.x, self.y, v),
        }
    }
}

/// A finite, axis-aligned set of cells with a dense linear index.
pub trait Extent: Copy + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {
    /// Coordinate type of the cells.
    type Pos: Coord;

    /// Number of cells.
    fn cell_count(&self) -> usize;

    /// Whether `p` lies inside.
    fn includes(&self, p: Self::Pos) -> bool;

    /// Dense index of `p`, or `None` if it lies outside.
    fn index(&self, p: Self::Pos) -> Option<usize>;

    /// Inverse of [`index`](Self::index). `idx` must be `< cell_count()`.
    fn pos(&self, idx: usize) -> Self::Pos;

    /// Every cell, in index order.
    fn positions(&self) -> Positions<Self> {
        Positions {
            extent: *self,
            next: 0,
        }
    }
}

/// Index-order iterator over the cells of an [`Extent`].
#[derive(Clone, Debug)]
pub struct Positions<E> {
    extent: E,
    next: usize,
}

impl<E: Extent> Iterator for Positions<E> {
    type Item = E::Pos;

    #[inline]
    fn next(&mut self) -> Option<E::Pos> {
        if self.next >= self.extent.cell_count() {
            return None;
        }
        let p = self.extent.pos(self.next);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.extent.cell_count().saturating_sub(self.next);
        (n, Some(n))
    }
}

impl<E: Extent> ExactSizeIterator for Positions<E> {}

impl Extent for Range {
    type Pos = Point;

    #[inline]
    fn cell_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn includes(&self, p: Point) -> bool {
        self.contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let x = (p.x - self.min.x) as usize;
        let y = (p.y - self.min.y) as usize;
        Some(y * self.width() as usize + x)
    }

    #[inline]
    fn pos(&self, idx: usize) -> Point {
        let w = self.width() as usize;
        Point::new(
            (idx % w) as i32 + self.min.x,
            (idx / w) as i32 + self.min.y,
        )
    }
}

impl Extent for Cuboid {
    type Pos = Point3;

    #[inline]
    fn cell_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn includes(&self, p: Point3) -> bool {
        self.contains(p)
    }

    #[inline]
    fn index(&self, p: Point3) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let s = self.size();
        let q = p - self.min;
        Some((q.z as usize * s.y as usize + q.y as usize) * s.x as usize + q.x as usize)
    }

    #[inline]
    fn pos(&self, idx: usize) -> Point3 {
        let s = self.size();
        let (w, h) = (s.x as usize, s.y as usize);
        Point3::new(
            (idx % w) as i32 + self.min.x,
            ((idx / w) % h) as i32 + self.min.y,
            (idx / (w * h)) as i32 + self.min.z,
        )
    }
}

/// The half-open span `c - |h| ..= c + |h|` on one axis, saturating at the
/// `i32` limits.
pub(crate) fn clamped_span(c: i32, h: i32) -> (i32, i32) {
    let h = h.unsigned_abs().min(i32::MAX as u32) as i32;
    (c.saturating_sub(h), c.saturating_add(h).saturating_add(1))
}
