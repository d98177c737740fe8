//! **tilenav-core**: geometry and grid capability shared by the tilenav
//! crates.
//!
//! This crate provides 2D ([`Point`], [`Range`]) and 3D ([`Point3`],
//! [`Cuboid`]) integer geometry, the [`Coord`]/[`Extent`] abstraction that
//! lets algorithms run on both, and the read-only grid capability
//! ([`Tile`], [`TileGrid`]) that pathfinding and shape queries consume.

pub mod coord;
pub mod geom;
pub mod geom3;
pub mod grid;
pub mod tile;

pub use coord::{Coord, Extent, Positions};
pub use geom::{OFFSETS_2D, Point, Range, RangeIter};
pub use geom3::{Cuboid, CuboidIter, OFFSETS_3D, Point3};
pub use grid::{DenseGrid, Grid2, Grid3, MapParseError};
pub use tile::{PosOf, Terrain, Tile, TileGrid};
