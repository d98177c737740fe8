//! Discrete line tracing between two cells.
//!
//! Lines are traced as a grid walk: every step moves along exactly one axis,
//! so a traced line never slips diagonally between two solid cells. At each
//! step the axis with the least fractional progress `(0.5 + n_i) / |d_i|`
//! advances, where `n_i` is the number of steps already taken along axis `i`
//! and `d_i` the total displacement along it. Ties go to the later axis.

use tilenav_core::{Coord, PosOf, TileGrid};

/// The axis to advance from `cur` on the walk from `start` by `delta`, or
/// `None` once every axis is exhausted.
fn next_axis<P: Coord>(start: P, cur: P, delta: P) -> Option<usize> {
    let mut best: Option<(usize, i64, i64)> = None;
    for i in 0..P::DIM {
        let d = delta.axis(i).abs() as i64;
        let n = (cur.axis(i) - start.axis(i)).abs() as i64;
        if n >= d {
            continue;
        }
        // (1 + 2n) / d <= (1 + 2nb) / db, cross-multiplied.
        let better = match best {
            None => true,
            Some((_, nb, db)) => (1 + 2 * n) * db <= (1 + 2 * nb) * d,
        };
        if better {
            best = Some((i, n, d));
        }
    }
    best.map(|(i, _, _)| i)
}

/// Cells on the line from `start` toward `stop`, in order.
///
/// `start` is always the first cell. Tracing stops before the first
/// non-walkable (or out-of-bounds) cell and before the first cell farther
/// than `max_distance` from `start` in Euclidean distance; `None` leaves the
/// line unbounded.
pub fn tiles_on_line<G>(
    grid: &G,
    start: PosOf<G>,
    stop: PosOf<G>,
    max_distance: Option<f32>,
) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    let delta = stop - start;
    let mut out = vec![start];
    let mut cur = start;
    while let Some(i) = next_axis(start, cur, delta) {
        let next = cur.with_axis(i, cur.axis(i) + delta.axis(i).signum());
        if !grid.is_walkable(next) {
            break;
        }
        if let Some(max) = max_distance {
            if (next.distance_squared(start) as f64).sqrt() > max as f64 {
                break;
            }
        }
        out.push(next);
        cur = next;
    }
    out
}

/// Whether the line from `a` reaches `b` unobstructed.
pub fn line_of_sight<G>(grid: &G, a: PosOf<G>, b: PosOf<G>) -> bool
where
    G: TileGrid + ?Sized,
{
    tiles_on_line(grid, a, b, None).last() == Some(&b)
}

/// Whether the line from `a` reaches `b` unobstructed and `b` lies within
/// `max_distance` of `a`.
pub fn line_of_sight_within<G>(grid: &G, a: PosOf<G>, b: PosOf<G>, max_distance: f32) -> bool
where
    G: TileGrid + ?Sized,
{
    tiles_on_line(grid, a, b, Some(max_distance)).last() == Some(&b)
}
