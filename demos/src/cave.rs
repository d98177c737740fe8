//! Cellular-automata cave maps.

use rand::{Rng, RngExt};
use tilenav_core::{Grid2, Point, Range, Terrain, Tile, TileGrid};

/// One smoothing pass of the cave automaton.
#[derive(Debug, Clone)]
pub struct CaveRule {
    /// A cell with at least this many walls among its 8 neighbours becomes
    /// a wall.
    pub w_cutoff1: i32,
    /// A cell with at most this many walls within Chebyshev distance 2 also
    /// becomes a wall, filling large open areas.
    pub w_cutoff2: i32,
    /// Whether cells outside the map count as walls.
    pub walls_out_of_range: bool,
    pub reps: usize,
}

impl Default for CaveRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Random cave generator.
pub struct CaveGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> CaveGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Fill `bounds` with walls at `wall_init_pct` density, then smooth with
    /// `rules`. Roughly one floor cell in `weighted_pct` gets a random weight
    /// in `2..=9`.
    pub fn generate(
        &mut self,
        bounds: Range,
        wall_init_pct: f64,
        weighted_pct: f64,
        rules: &[CaveRule],
    ) -> Grid2 {
        let mut grid = Grid2::from_fn(bounds, |_| {
            if self.rng.random::<f64>() < wall_init_pct {
                Terrain::WALL
            } else {
                Terrain::FLOOR
            }
        });

        for rule in rules {
            for _ in 0..rule.reps {
                grid = Grid2::from_fn(bounds, |p| {
                    let walls1 = count_walls(&grid, p, 1, rule.walls_out_of_range);
                    let walls2 = count_walls(&grid, p, 2, rule.walls_out_of_range);
                    if walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2 {
                        Terrain::WALL
                    } else {
                        Terrain::FLOOR
                    }
                });
            }
        }

        for p in bounds.iter() {
            if grid.is_walkable(p) && self.rng.random::<f64>() < weighted_pct {
                let w = self.rng.random_range(2..=9) as f32;
                grid.set(p, Terrain::weighted(w));
            }
        }
        grid
    }
}

/// Walls within Chebyshev distance `radius` of `center`, the centre excluded.
fn count_walls(grid: &Grid2, center: Point, radius: i32, walls_out_of_range: bool) -> i32 {
    let mut count = 0;
    for p in Range::around(center, Point::new(radius, radius)) {
        if p == center {
            continue;
        }
        match grid.at(p) {
            Some(t) if !Tile::is_walkable(t) => count += 1,
            None if walls_out_of_range => count += 1,
            _ => {}
        }
    }
    count
}
