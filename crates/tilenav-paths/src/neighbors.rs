//! Adjacency rules: which cells an agent can step between and at what cost.

use tilenav_core::{Coord, Extent, OFFSETS_2D, OFFSETS_3D, Point, Point3, PosOf, Tile, TileGrid};

use crate::policy::{DiagonalPolicy, MovementPolicy, Policy2, Policy3};

/// Weighted neighbour enumeration over a [`TileGrid`].
///
/// Implementors only need [`offsets`](Self::offsets) and
/// [`step_cost`](Self::step_cost); the enumeration methods are derived from
/// them. [`Policy2`] and [`Policy3`] are the stock implementations.
pub trait Adjacency<G: TileGrid + ?Sized> {
    /// Candidate unit offsets, in the order neighbours are reported.
    fn offsets(&self) -> &[PosOf<G>];

    /// Cost of an agent stepping from `from` to the adjacent cell `to`, or
    /// `None` if the step is not allowed.
    fn step_cost(&self, grid: &G, from: PosOf<G>, to: PosOf<G>) -> Option<f32>;

    /// Append the cells reachable in one step from `p` into `buf`, with the
    /// cost of each step. The caller clears `buf` before calling.
    fn neighbors(&self, grid: &G, p: PosOf<G>, buf: &mut Vec<(PosOf<G>, f32)>) {
        for &d in self.offsets() {
            let n = p + d;
            if let Some(cost) = self.step_cost(grid, p, n) {
                buf.push((n, cost));
            }
        }
    }

    /// Append the cells from which `p` is reachable in one step into `buf`,
    /// with the cost of each step. The caller clears `buf` before calling.
    fn predecessors(&self, grid: &G, p: PosOf<G>, buf: &mut Vec<(PosOf<G>, f32)>) {
        for &d in self.offsets() {
            let n = p - d;
            if let Some(cost) = self.step_cost(grid, n, p) {
                buf.push((n, cost));
            }
        }
    }
}

/// Count the walkable cells cut past by the diagonal step `from + d`.
fn free_cut_cells<G: TileGrid + ?Sized>(grid: &G, from: PosOf<G>, d: PosOf<G>) -> (usize, usize) {
    let mut free = 0;
    let mut total = 0;
    for i in 0..<PosOf<G> as Coord>::DIM {
        let v = d.axis(i);
        if v == 0 {
            continue;
        }
        total += 1;
        let side = from + <PosOf<G> as Coord>::unit(i).with_axis(i, v);
        if grid.is_walkable(side) {
            free += 1;
        }
    }
    (free, total)
}

/// Whether `movement` permits a vertical step into `to`.
fn vertical_step_allowed<G: TileGrid + ?Sized>(
    grid: &G,
    movement: MovementPolicy,
    to: PosOf<G>,
) -> bool {
    if movement.is_empty() {
        return true;
    }
    let up = <PosOf<G> as Coord>::unit(<PosOf<G> as Coord>::VERTICAL);
    let solid = |p: PosOf<G>| !grid.is_walkable(p);
    if movement.contains(MovementPolicy::WALL_BELOW) && solid(to - up) {
        return true;
    }
    if movement.contains(MovementPolicy::WALL_ABOVE) && solid(to + up) {
        return true;
    }
    if movement.contains(MovementPolicy::WALL_ASIDE) {
        for i in 0..<PosOf<G> as Coord>::DIM {
            if i == <PosOf<G> as Coord>::VERTICAL {
                continue;
            }
            let side = <PosOf<G> as Coord>::unit(i);
            if solid(to + side) || solid(to - side) {
                return true;
            }
        }
    }
    false
}

/// Walkability, weights and vertical gating shared by both policies.
/// Returns the two weights when the step is possible at all.
fn endpoint_weights<G: TileGrid + ?Sized>(
    grid: &G,
    movement: MovementPolicy,
    from: PosOf<G>,
    to: PosOf<G>,
) -> Option<(f32, f32)> {
    let from_tile = grid.tile(from).filter(|t| Tile::is_walkable(*t))?;
    let to_tile = grid.tile(to).filter(|t| Tile::is_walkable(*t))?;
    let vertical = (to - from).axis(<PosOf<G> as Coord>::VERTICAL) != 0;
    if vertical && !vertical_step_allowed(grid, movement, to) {
        return None;
    }
    Some((Tile::weight(from_tile), Tile::weight(to_tile)))
}

impl<G> Adjacency<G> for Policy2
where
    G: TileGrid + ?Sized,
    G::Bounds: Extent<Pos = Point>,
{
    fn offsets(&self) -> &[Point] {
        if self.diagonals_policy == DiagonalPolicy::None {
            &OFFSETS_2D[..4]
        } else {
            &OFFSETS_2D
        }
    }

    fn step_cost(&self, grid: &G, from: Point, to: Point) -> Option<f32> {
        let d = to - from;
        if !d.is_unit_step() {
            return None;
        }
        let base = if d.x != 0 && d.y != 0 {
            let (free, total) = free_cut_cells(grid, from, d);
            if !self.diagonals_policy.allows(free, total) {
                return None;
            }
            self.diagonals_weight
        } else {
            1.0
        };
        let (wf, wt) = endpoint_weights(grid, self.movement_policy, from, to)?;
        Some(self.edge_cost.combine(base, wf, wt))
    }
}

impl Policy3 {
    /// Rule and weight for the diagonal class of the unit offset `d`, or
    /// `None` for face steps.
    fn diagonal_class(&self, d: Point3) -> Option<(DiagonalPolicy, f32)> {
        match d.nonzero_axes() {
            2 if d.y == 0 => Some((self.horizontal_edges_policy, self.horizontal_edges_weight)),
            2 => Some((self.vertical_edges_policy, self.vertical_edges_weight)),
            3 => Some((self.vertices_policy, self.vertices_weight)),
            _ => None,
        }
    }
}

impl<G> Adjacency<G> for Policy3
where
    G: TileGrid + ?Sized,
    G::Bounds: Extent<Pos = Point3>,
{
    fn offsets(&self) -> &[Point3] {
        if self.vertices_policy != DiagonalPolicy::None {
            &OFFSETS_3D
        } else if self.horizontal_edges_policy != DiagonalPolicy::None
            || self.vertical_edges_policy != DiagonalPolicy::None
        {
            &OFFSETS_3D[..18]
        } else {
            &OFFSETS_3D[..6]
        }
    }

    fn step_cost(&self, grid: &G, from: Point3, to: Point3) -> Option<f32> {
        let d = to - from;
        if !d.is_unit_step() {
            return None;
        }
        let base = match self.diagonal_class(d) {
            Some((policy, weight)) => {
                let (free, total) = free_cut_cells(grid, from, d);
                if !policy.allows(free, total) {
                    return None;
                }
                weight
            }
            None => 1.0,
        };
        let (wf, wt) = endpoint_weights(grid, self.movement_policy, from, to)?;
        Some(self.edge_cost.combine(base, wf, wt))
    }
}
