//! The grid capability consumed by every algorithm in the workspace.
//!
//! Consumers implement [`Tile`] for whatever cell type they already have and
//! [`TileGrid`] for the container. Nothing in tilenav writes through these
//! traits; results are snapshots of the grid at call time.

use crate::coord::Extent;

/// A single cell: walkability and traversal weight.
pub trait Tile {
    /// Whether an agent may occupy this cell.
    fn is_walkable(&self) -> bool;

    /// Traversal weight, `> 0`. Defaults to `1.0`.
    fn weight(&self) -> f32 {
        1.0
    }
}

impl Tile for bool {
    #[inline]
    fn is_walkable(&self) -> bool {
        *self
    }
}

/// Plain walkability + weight cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terrain {
    pub walkable: bool,
    pub weight: f32,
}

impl Terrain {
    /// Walkable floor with unit weight.
    pub const FLOOR: Self = Self {
        walkable: true,
        weight: 1.0,
    };
    /// Solid wall.
    pub const WALL: Self = Self {
        walkable: false,
        weight: 1.0,
    };

    /// Walkable floor with the given weight.
    pub const fn weighted(weight: f32) -> Self {
        Self {
            walkable: true,
            weight,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::FLOOR
    }
}

impl Tile for Terrain {
    #[inline]
    fn is_walkable(&self) -> bool {
        self.walkable
    }

    #[inline]
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Coordinate type of a [`TileGrid`].
pub type PosOf<G> = <<G as TileGrid>::Bounds as Extent>::Pos;

/// Read-only access to a rectangular 2D or 3D array of tiles.
pub trait TileGrid {
    /// Shape of the grid.
    type Bounds: Extent;
    /// Cell type.
    type Tile: Tile;

    /// The cells covered by the grid.
    fn bounds(&self) -> Self::Bounds;

    /// The tile at `p`, or `None` outside the bounds.
    fn tile(&self, p: PosOf<Self>) -> Option<&Self::Tile>;

    /// Whether `p` is in bounds and walkable.
    #[inline]
    fn is_walkable(&self, p: PosOf<Self>) -> bool {
        self.tile(p).is_some_and(Tile::is_walkable)
    }

    /// Weight of the tile at `p`, or `None` outside the bounds.
    #[inline]
    fn weight(&self, p: PosOf<Self>) -> Option<f32> {
        self.tile(p).map(Tile::weight)
    }

    /// Whether `p` is in bounds but not walkable.
    #[inline]
    fn is_solid(&self, p: PosOf<Self>) -> bool {
        self.tile(p).is_some_and(|t| !Tile::is_walkable(t))
    }
}

impl<G: TileGrid + ?Sized> TileGrid for &G {
    type Bounds = G::Bounds;
    type Tile = G::Tile;

    #[inline]
    fn bounds(&self) -> Self::Bounds {
        (**self).bounds()
    }

    #[inline]
    fn tile(&self, p: PosOf<Self>) -> Option<&Self::Tile> {
        (**self).tile(p)
    }
}
