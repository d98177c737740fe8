//! Shape extraction and line tracing over tilenav grids.
//!
//! - [`plane`]: circles, rectangles and cones on 2D grids.
//! - [`volume`]: spheres and boxes on 3D volumes.
//! - [`adjacent`]: neighbour sets and straight lines, any dimension.
//! - [`raycast`]: grid-walk line tracing and line of sight, any dimension.
//!
//! All queries are stateless, read the grid through
//! [`TileGrid`](tilenav_core::TileGrid), clip to its bounds and never fail.

pub mod adjacent;
mod options;
pub mod plane;
pub mod raycast;
pub mod volume;

pub use adjacent::{all_neighbors, diagonal_neighbors, line, neighbor, orthogonal_neighbors};
pub use options::ShapeOptions;
pub use plane::{circle, circle_outline, cone, rectangle, rectangle_outline};
pub use raycast::{line_of_sight, line_of_sight_within, tiles_on_line};
pub use volume::{cuboid, cuboid_outline, sphere, sphere_outline};
