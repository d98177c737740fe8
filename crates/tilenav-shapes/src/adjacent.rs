//! Neighbour sets and straight lines, for 2D grids and 3D volumes alike.

use tilenav_core::{Coord, PosOf, TileGrid};

use crate::options::ShapeOptions;

fn nonzero_axes<P: Coord>(d: P) -> usize {
    (0..P::DIM).filter(|&i| d.axis(i) != 0).count()
}

fn neighbors_where<G>(
    grid: &G,
    center: PosOf<G>,
    opts: ShapeOptions,
    mut keep: impl FnMut(usize) -> bool,
) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    <PosOf<G> as Coord>::UNIT_OFFSETS
        .iter()
        .copied()
        .filter(|&d| keep(nonzero_axes(d)))
        .map(|d| center + d)
        .filter(|&p| opts.accepts(grid, center, p))
        .collect()
}

/// The neighbour of `center` in `direction`, a unit step.
///
/// `None` if the direction is not a unit step, the cell is out of bounds, or
/// it is filtered out by `opts`.
pub fn neighbor<G>(
    grid: &G,
    center: PosOf<G>,
    direction: PosOf<G>,
    opts: ShapeOptions,
) -> Option<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    if !direction.is_unit_step() {
        return None;
    }
    let p = center + direction;
    opts.accepts(grid, center, p).then_some(p)
}

/// Face-adjacent neighbours: 4 in 2D, 6 in 3D.
pub fn orthogonal_neighbors<G>(grid: &G, center: PosOf<G>, opts: ShapeOptions) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    neighbors_where(grid, center, opts, |axes| axes == 1)
}

/// Neighbours differing on two or more axes: 4 in 2D, 20 in 3D.
pub fn diagonal_neighbors<G>(grid: &G, center: PosOf<G>, opts: ShapeOptions) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    neighbors_where(grid, center, opts, |axes| axes >= 2)
}

/// Every neighbour: 8 in 2D, 26 in 3D.
pub fn all_neighbors<G>(grid: &G, center: PosOf<G>, opts: ShapeOptions) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    neighbors_where(grid, center, opts, |_| true)
}

/// Up to `length` cells stepping from `origin` (excluded) along the unit
/// step `direction`.
///
/// Stops at the grid edge or before the first non-walkable cell, so a
/// `length` of `usize::MAX` runs to the first obstacle. A direction that is
/// not a unit step yields nothing. Any unit step is accepted; restricting
/// directions to those a movement policy allows (for instance
/// `Adjacency::offsets` in `tilenav-paths`) is up to the caller.
pub fn line<G>(grid: &G, origin: PosOf<G>, direction: PosOf<G>, length: usize) -> Vec<PosOf<G>>
where
    G: TileGrid + ?Sized,
{
    if !direction.is_unit_step() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut p = origin;
    for _ in 0..length {
        p = p + direction;
        if !grid.is_walkable(p) {
            break;
        }
        out.push(p);
    }
    out
}
