//! All-targets flow fields.

use tilenav_core::{Cuboid, Extent, Range};

use crate::error::{PathError, Result};
use crate::pathmap::PathMap;

/// One [`PathMap`] per walkable cell.
///
/// `path_grid.next_hop(from, to)` answers in constant time for every pair of
/// connected walkable cells. Build it with [`PathGrid::build`], the
/// cancellable variants in [`bake`](crate::bake), or reload it from
/// [`records`](crate::records).
#[derive(Debug, Clone)]
pub struct PathGrid<B: Extent> {
    bounds: B,
    maps: Vec<Option<PathMap<B>>>,
    len: usize,
}

/// A 2D [`PathGrid`].
pub type PathGrid2 = PathGrid<Range>;

/// A 3D [`PathGrid`].
pub type PathGrid3 = PathGrid<Cuboid>;

impl<B: Extent> PathGrid<B> {
    /// Assemble from per-cell maps indexed by `bounds`.
    pub(crate) fn from_maps(bounds: B, maps: Vec<Option<PathMap<B>>>) -> Self {
        let len = maps.iter().filter(|m| m.is_some()).count();
        Self { bounds, maps, len }
    }

    /// The grid extents.
    #[inline]
    pub fn bounds(&self) -> B {
        self.bounds
    }

    /// Number of targets, i.e. walkable cells at bake time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The flow field toward `to`.
    pub fn map(&self, to: B::Pos) -> Result<&PathMap<B>> {
        let i = self
            .bounds
            .index(to)
            .ok_or_else(|| PathError::out_of_bounds(to))?;
        self.maps[i]
            .as_ref()
            .ok_or_else(|| PathError::invalid_target(to))
    }

    /// Next cell on the way from `from` to `to`.
    pub fn next_hop(&self, from: B::Pos, to: B::Pos) -> Result<B::Pos> {
        self.map(to)?.next_hop(from)
    }

    /// Cost of the cheapest route from `from` to `to`.
    pub fn distance(&self, from: B::Pos, to: B::Pos) -> Result<f32> {
        self.map(to)?.distance_to_target(from)
    }

    /// Whether `to` can be reached from `from`.
    pub fn is_path(&self, from: B::Pos, to: B::Pos) -> bool {
        self.map(to).is_ok_and(|m| m.is_accessible(from))
    }

    /// Full route from `from` to `to`, both endpoints included.
    pub fn get_path(&self, from: B::Pos, to: B::Pos) -> Result<Vec<B::Pos>> {
        self.map(to)?.path_to_target(from)
    }

    /// All targets in index order.
    pub fn targets(&self) -> impl Iterator<Item = B::Pos> + '_ {
        self.maps.iter().flatten().map(PathMap::target)
    }

    /// All maps in index order.
    pub fn maps(&self) -> impl Iterator<Item = &PathMap<B>> + '_ {
        self.maps.iter().flatten()
    }
}
