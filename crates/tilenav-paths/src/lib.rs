//! Weighted pathfinding and flow fields over 2D and 3D tile grids.
//!
//! This crate builds on the [`TileGrid`](tilenav_core::TileGrid) capability
//! from `tilenav-core`:
//!
//! - **Adjacency** rules ([`Policy2`], [`Policy3`], or any [`Adjacency`]
//!   implementation) decide which steps exist and what they cost.
//! - **[`PathMap`]**: Dijkstra flow field toward one target; distance, next
//!   hop and full route from every reachable cell.
//! - **[`PathGrid`]**: one path map per walkable cell for constant-time
//!   `next_hop(from, to)`, built synchronously, cooperatively
//!   ([`PathGridBaker`]), cancellably or on a background thread
//!   ([`PathGrid::spawn_bake`]), and persisted through
//!   [`records`](TargetRecords).
//!
//! Every structure is a snapshot: nothing observes later grid changes, and
//! nothing writes to the grid.
//!
//! # Example
//!
//! ```
//! use tilenav_core::{Grid2, Point};
//! use tilenav_paths::{PathMap, Policy2};
//!
//! let grid = Grid2::parse(
//!     "....
//!      .##.
//!      ....",
//! )
//! .unwrap();
//! let map = PathMap::build(&grid, &Policy2::new(), Point::new(3, 1), None).unwrap();
//! assert_eq!(map.distance_to_target(Point::new(0, 1)), Ok(5.0));
//! ```

mod bake;
mod distance;
mod error;
mod neighbors;
mod pathgrid;
mod pathmap;
mod policy;
mod records;

pub use bake::{BakeHandle, CancelToken, PathGridBaker};
pub use distance::{chebyshev, euclidean, manhattan};
pub use error::{PathError, Result};
pub use neighbors::Adjacency;
pub use tilenav_core::{OFFSETS_2D, OFFSETS_3D};
pub use pathgrid::{PathGrid, PathGrid2, PathGrid3};
pub use pathmap::{Node, PathMap, PathMap2, PathMap3};
pub use policy::{DiagonalPolicy, EdgeCost, MovementPolicy, Policy2, Policy3};
pub use records::{CellRecord, TargetRecords};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, RngExt, SeedableRng};
    use tilenav_core::{Grid2, Point, Range, Terrain, TileGrid};

    fn random_cave(rng: &mut impl Rng, w: i32, h: i32, wall_pct: f64) -> Grid2 {
        Grid2::from_fn(Range::with_size(w, h), |_| {
            let r: f64 = rng.random();
            if r < wall_pct {
                Terrain::WALL
            } else {
                Terrain::FLOOR
            }
        })
    }

    #[test]
    fn next_hop_chains_have_distance_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let g = random_cave(&mut rng, 16, 12, 0.3);
            let Some(t) = g.bounds().iter().find(|p| g.is_walkable(*p)) else {
                continue;
            };
            let pm = PathMap::build(&g, &Policy2::new(), t, None).unwrap();
            for p in pm.accessible_cells(None) {
                let d = pm.distance_to_target(p).unwrap();
                let mut cur = p;
                let mut steps = 0;
                while cur != t {
                    let next = pm.next_hop(cur).unwrap();
                    assert_eq!(manhattan(cur, next), 1);
                    assert_eq!(pm.direction(cur), Ok(next - cur));
                    assert!(g.is_walkable(next));
                    cur = next;
                    steps += 1;
                    assert!(steps <= pm.reached_count());
                }
                assert_eq!(steps as f32, d);
                assert!(d >= manhattan(p, t) as f32);
            }
            for p in g.bounds().iter().filter(|p| !g.is_walkable(*p)) {
                assert!(!pm.is_accessible(p));
            }
        }
    }

    #[test]
    fn path_grid_agrees_with_path_maps() {
        let mut rng = StdRng::seed_from_u64(11);
        let g = random_cave(&mut rng, 10, 8, 0.35);
        let policy = Policy2::new().with_diagonals(DiagonalPolicy::TwoFree, 1.4);
        let pg = PathGrid::build(&g, &policy).unwrap();
        for _ in 0..40 {
            let a = Point::new(rng.random_range(0..10), rng.random_range(0..8));
            let b = Point::new(rng.random_range(0..10), rng.random_range(0..8));
            if !g.is_walkable(b) {
                assert!(pg.map(b).is_err());
                continue;
            }
            let pm = PathMap::build(&g, &policy, b, None).unwrap();
            assert_eq!(pg.next_hop(a, b), pm.next_hop(a));
            assert_eq!(pg.is_path(a, b), pm.is_accessible(a));
        }
    }

    #[test]
    fn reachability_is_symmetric_without_movement_rules() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = random_cave(&mut rng, 9, 9, 0.4);
        let pg = PathGrid::build(&g, &Policy2::new()).unwrap();
        for a in pg.targets() {
            for b in pg.targets() {
                assert_eq!(pg.is_path(a, b), pg.is_path(b, a), "{a} {b}");
            }
        }
    }
}
