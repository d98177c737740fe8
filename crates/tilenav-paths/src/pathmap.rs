//! Single-target flow fields.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use tilenav_core::{Cuboid, Extent, Range, Tile, TileGrid};

use crate::error::{PathError, Result};
use crate::neighbors::Adjacency;

/// Per-cell search state of a [`PathMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<P> {
    /// Whether the search reached this cell. Unreached nodes are never
    /// reported by queries.
    pub reached: bool,
    /// Cost of the cheapest route from this cell to the target.
    pub distance: f32,
    /// Next cell on that route; the target points at itself.
    pub next: P,
    /// `next - pos`, a unit step (zero at the target).
    pub direction: P,
    /// Cell weight at build time.
    pub weight: f32,
}

impl<P: Default> Node<P> {
    pub(crate) fn unreached() -> Self {
        Self {
            reached: false,
            distance: f32::INFINITY,
            next: P::default(),
            direction: P::default(),
            weight: 1.0,
        }
    }
}

/// Frontier entry, ordered so that `BinaryHeap` pops the smallest distance
/// first and, among equal distances, the earliest discovered entry.
#[derive(Clone, Copy)]
struct NodeRef {
    idx: usize,
    dist: f32,
    seq: u64,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest distance first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Distances and next hops from every reachable cell toward one target.
///
/// Built by a single Dijkstra search expanding outward from the target over
/// the *predecessors* given by an [`Adjacency`], so each recorded step is a
/// step an agent may actually take toward the target. Among equal-distance
/// frontier entries the earliest discovered is settled first, and neighbours
/// are discovered in the adjacency's offset order; this decides which of
/// several equally short routes is recorded.
///
/// A `PathMap` is immutable: rebuild it whenever the grid, target or policy
/// changes.
#[derive(Debug, Clone)]
pub struct PathMap<B: Extent> {
    bounds: B,
    target: B::Pos,
    max_distance: Option<f32>,
    nodes: Vec<Node<B::Pos>>,
    reached: usize,
}

/// A 2D [`PathMap`].
pub type PathMap2 = PathMap<Range>;

/// A 3D [`PathMap`].
pub type PathMap3 = PathMap<Cuboid>;

impl<B: Extent> PathMap<B> {
    /// Build the flow field toward `target`.
    ///
    /// `max_distance` bounds the search: cells farther than it stay
    /// unreached. `None` or a non-positive bound means unbounded.
    ///
    /// Fails with [`PathError::OutOfBounds`] if `target` lies outside the
    /// grid and [`PathError::InvalidTarget`] if it is not walkable.
    pub fn build<G, A>(
        grid: &G,
        adjacency: &A,
        target: B::Pos,
        max_distance: Option<f32>,
    ) -> Result<Self>
    where
        G: TileGrid<Bounds = B> + ?Sized,
        A: Adjacency<G> + ?Sized,
    {
        let bounds = grid.bounds();
        let ti = bounds
            .index(target)
            .ok_or_else(|| PathError::out_of_bounds(target))?;
        let target_tile = grid
            .tile(target)
            .filter(|t| Tile::is_walkable(*t))
            .ok_or_else(|| PathError::invalid_target(target))?;
        let max_distance = max_distance.filter(|d| *d > 0.0);
        let limit = max_distance.unwrap_or(f32::INFINITY);

        let mut nodes = vec![Node::unreached(); bounds.cell_count()];
        let mut settled = vec![false; nodes.len()];
        nodes[ti] = Node {
            reached: true,
            distance: 0.0,
            next: target,
            direction: B::Pos::default(),
            weight: Tile::weight(target_tile),
        };

        let mut seq: u64 = 0;
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: ti,
            dist: 0.0,
            seq,
        });

        let mut nbuf = Vec::with_capacity(8);
        let mut reached = 1;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            if settled[ci] || current.dist > nodes[ci].distance {
                continue;
            }
            settled[ci] = true;
            let cp = bounds.pos(ci);
            let current_dist = nodes[ci].distance;

            nbuf.clear();
            adjacency.predecessors(grid, cp, &mut nbuf);

            for &(np, cost) in nbuf.iter() {
                let Some(ni) = bounds.index(np) else {
                    continue;
                };
                if settled[ni] || !cost.is_finite() || cost < 0.0 {
                    continue;
                }
                let tentative = current_dist + cost;
                if tentative > limit {
                    continue;
                }

                let n = &mut nodes[ni];
                if n.reached && tentative >= n.distance {
                    continue;
                }
                if !n.reached {
                    reached += 1;
                    n.weight = grid.weight(np).unwrap_or(1.0);
                }
                n.reached = true;
                n.distance = tentative;
                n.next = cp;
                n.direction = cp - np;

                seq += 1;
                open.push(NodeRef {
                    idx: ni,
                    dist: tentative,
                    seq,
                });
            }
        }

        debug!("path map toward {target}: {reached} of {} cells reached", nodes.len());
        Ok(Self {
            bounds,
            target,
            max_distance,
            nodes,
            reached,
        })
    }

    /// Reassemble a map from stored nodes. `nodes` is indexed by `bounds`.
    pub(crate) fn from_nodes(
        bounds: B,
        target: B::Pos,
        max_distance: Option<f32>,
        nodes: Vec<Node<B::Pos>>,
    ) -> Self {
        let reached = nodes.iter().filter(|n| n.reached).count();
        Self {
            bounds,
            target,
            max_distance,
            nodes,
            reached,
        }
    }

    /// The target cell.
    #[inline]
    pub fn target(&self) -> B::Pos {
        self.target
    }

    /// The search bound the map was built with.
    #[inline]
    pub fn max_distance(&self) -> Option<f32> {
        self.max_distance
    }

    /// The grid extents the map covers.
    #[inline]
    pub fn bounds(&self) -> B {
        self.bounds
    }

    /// Number of reached cells, the target included.
    #[inline]
    pub fn reached_count(&self) -> usize {
        self.reached
    }

    /// The node at `p` if it was reached.
    pub fn node(&self, p: B::Pos) -> Result<&Node<B::Pos>> {
        let i = self
            .bounds
            .index(p)
            .ok_or_else(|| PathError::out_of_bounds(p))?;
        let n = &self.nodes[i];
        if n.reached {
            Ok(n)
        } else {
            Err(PathError::not_accessible(p))
        }
    }

    /// Whether `p` has a route to the target.
    #[inline]
    pub fn is_accessible(&self, p: B::Pos) -> bool {
        self.node(p).is_ok()
    }

    /// Cost of the cheapest route from `p` to the target.
    pub fn distance_to_target(&self, p: B::Pos) -> Result<f32> {
        self.node(p).map(|n| n.distance)
    }

    /// Next cell on the route from `p` to the target; the target itself for
    /// `p == target`.
    pub fn next_hop(&self, p: B::Pos) -> Result<B::Pos> {
        self.node(p).map(|n| n.next)
    }

    /// Unit step from `p` toward the target.
    pub fn direction(&self, p: B::Pos) -> Result<B::Pos> {
        self.node(p).map(|n| n.direction)
    }

    /// The route from `p` to the target, both endpoints included.
    pub fn path_to_target(&self, p: B::Pos) -> Result<Vec<B::Pos>> {
        let mut path = vec![p];
        let mut cur = p;
        let mut node = self.node(p)?;
        while cur != self.target {
            // A well-formed map never revisits a cell.
            if path.len() > self.reached {
                return Err(PathError::not_accessible(p));
            }
            cur = node.next;
            node = self.node(cur)?;
            path.push(cur);
        }
        Ok(path)
    }

    /// The route from the target to `p`, both endpoints included.
    pub fn path_from_target(&self, p: B::Pos) -> Result<Vec<B::Pos>> {
        let mut path = self.path_to_target(p)?;
        path.reverse();
        Ok(path)
    }

    /// Every reached cell, in index order, optionally restricted to cells
    /// at most `max_distance` away.
    pub fn accessible_cells(&self, max_distance: Option<f32>) -> Vec<B::Pos> {
        let limit = max_distance.unwrap_or(f32::INFINITY);
        self.iter()
            .filter(|(_, n)| n.distance <= limit)
            .map(|(p, _)| p)
            .collect()
    }

    /// Iterate over `(position, node)` for every reached cell.
    pub fn iter(&self) -> impl Iterator<Item = (B::Pos, &Node<B::Pos>)> + '_ {
        let bounds = self.bounds;
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.reached)
            .map(move |(i, n)| (bounds.pos(i), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::manhattan;
    use crate::error::PathError;
    use crate::policy::{DiagonalPolicy, MovementPolicy, Policy2, Policy3};
    use tilenav_core::{Grid2, Grid3, Point, Point3, Terrain};

    fn open5() -> Grid2 {
        Grid2::new(Range::with_size(5, 5), Terrain::FLOOR)
    }

    /// 5×5 with row 2 walled except column 3.
    fn gapped5() -> Grid2 {
        let mut g = open5();
        for x in 0..5 {
            if x != 3 {
                g.set(Point::new(x, 2), Terrain::WALL);
            }
        }
        g
    }

    #[test]
    fn open_grid_distances_are_manhattan() {
        let g = open5();
        let t = Point::new(4, 4);
        let pm = PathMap::build(&g, &Policy2::new(), t, None).unwrap();
        assert_eq!(pm.distance_to_target(Point::new(0, 0)), Ok(8.0));
        assert_eq!(pm.distance_to_target(Point::new(4, 0)), Ok(4.0));
        for p in g.bounds().iter() {
            assert_eq!(pm.distance_to_target(p), Ok(manhattan(p, t) as f32));
        }
        assert_eq!(pm.reached_count(), 25);
    }

    #[test]
    fn target_points_at_itself() {
        let g = open5();
        let t = Point::new(2, 3);
        let pm = PathMap::build(&g, &Policy2::new(), t, None).unwrap();
        assert_eq!(pm.distance_to_target(t), Ok(0.0));
        assert_eq!(pm.next_hop(t), Ok(t));
        assert_eq!(pm.direction(t), Ok(Point::ZERO));
        assert_eq!(pm.path_to_target(t), Ok(vec![t]));
    }

    #[test]
    fn wall_gap_is_the_only_crossing() {
        let g = gapped5();
        let pm = PathMap::build(&g, &Policy2::new(), Point::new(4, 4), None).unwrap();
        let path = pm.path_to_target(Point::new(0, 0)).unwrap();
        assert!(path.contains(&Point::new(3, 2)));
        // The gap lies inside the bounding box, so a monotone route survives.
        assert_eq!(pm.distance_to_target(Point::new(0, 0)), Ok(8.0));
        assert!(pm.node(Point::new(1, 2)).is_err());
    }

    #[test]
    fn wall_gap_off_the_direct_route_costs_extra() {
        let g = gapped5();
        let pm = PathMap::build(&g, &Policy2::new(), Point::new(0, 4), None).unwrap();
        // From (0,0) the route must swing out to column 3 and back.
        assert_eq!(pm.distance_to_target(Point::new(0, 0)), Ok(10.0));
        let path = pm.path_to_target(Point::new(0, 0)).unwrap();
        assert!(path.contains(&Point::new(3, 2)));
    }

    #[test]
    fn following_next_hop_takes_distance_steps() {
        let g = Grid2::parse(
            ".....#....
             .###.#.##.
             .#...#..#.
             .#.####.#.
             .#......#.
             .########.
             ..........",
        )
        .unwrap();
        let t = Point::new(4, 2);
        let pm = PathMap::build(&g, &Policy2::new(), t, None).unwrap();
        for p in pm.accessible_cells(None) {
            let d = pm.distance_to_target(p).unwrap();
            let path = pm.path_to_target(p).unwrap();
            assert_eq!(path.len() - 1, d as usize, "from {p}");
            assert_eq!(*path.last().unwrap(), t);
            for w in path.windows(2) {
                assert_eq!(manhattan(w[0], w[1]), 1);
                assert!(g.is_walkable(w[1]));
            }
        }
    }

    #[test]
    fn errors_distinguish_failure_modes() {
        let g = gapped5();
        let policy = Policy2::new();
        assert_eq!(
            PathMap::build(&g, &policy, Point::new(0, 2), None).unwrap_err(),
            PathError::invalid_target(Point::new(0, 2))
        );
        assert_eq!(
            PathMap::build(&g, &policy, Point::new(9, 9), None).unwrap_err(),
            PathError::out_of_bounds(Point::new(9, 9))
        );
        let pm = PathMap::build(&g, &policy, Point::new(0, 0), None).unwrap();
        assert_eq!(
            pm.next_hop(Point::new(1, 2)),
            Err(PathError::not_accessible(Point::new(1, 2)))
        );
        assert_eq!(
            pm.next_hop(Point::new(-1, 0)),
            Err(PathError::out_of_bounds(Point::new(-1, 0)))
        );
        assert!(!pm.is_accessible(Point::new(1, 2)));
    }

    #[test]
    fn enclosed_cells_stay_unreached() {
        let g = Grid2::parse(
            "...#.
             ...#.
             ####.",
        )
        .unwrap();
        let pm = PathMap::build(&g, &Policy2::new(), Point::new(0, 2), None).unwrap();
        assert_eq!(pm.reached_count(), 6);
        assert!(!pm.is_accessible(Point::new(4, 0)));
        assert!(pm.path_to_target(Point::new(4, 0)).is_err());
        assert!(
            pm.accessible_cells(None)
                .iter()
                .all(|&p| g.is_walkable(p))
        );
    }

    #[test]
    fn max_distance_bounds_the_search() {
        let g = open5();
        let t = Point::new(0, 0);
        let pm = PathMap::build(&g, &Policy2::new(), t, Some(2.0)).unwrap();
        assert_eq!(pm.max_distance(), Some(2.0));
        assert_eq!(pm.reached_count(), 6);
        assert!(pm.is_accessible(Point::new(1, 1)));
        assert!(!pm.is_accessible(Point::new(2, 1)));
        assert_eq!(pm.accessible_cells(Some(1.0)).len(), 3);

        // Zero means unbounded.
        let pm = PathMap::build(&g, &Policy2::new(), t, Some(0.0)).unwrap();
        assert_eq!(pm.max_distance(), None);
        assert_eq!(pm.reached_count(), 25);
    }

    #[test]
    fn weights_steer_the_route() {
        let g = Grid2::parse(
            "...
             .9.
             ...",
        )
        .unwrap();
        let pm = PathMap::build(&g, &Policy2::new(), Point::new(2, 1), None).unwrap();
        // Going around the heavy centre is cheaper than through it.
        assert_eq!(pm.distance_to_target(Point::new(0, 1)), Ok(4.0));
        let path = pm.path_to_target(Point::new(0, 1)).unwrap();
        assert!(!path.contains(&Point::new(1, 1)));
        // Leaving the heavy cell is cheap under the default edge cost.
        assert_eq!(pm.distance_to_target(Point::new(1, 1)), Ok(1.0));
    }

    #[test]
    fn diagonals_shorten_routes() {
        let g = open5();
        let p = Policy2::new().with_diagonals(DiagonalPolicy::All, 1.5);
        let pm = PathMap::build(&g, &p, Point::new(4, 4), None).unwrap();
        assert_eq!(pm.distance_to_target(Point::new(0, 0)), Ok(6.0));
        assert_eq!(pm.direction(Point::new(0, 0)), Ok(Point::new(1, 1)));
        assert_eq!(pm.distance_to_target(Point::new(4, 0)), Ok(4.0));
    }

    #[test]
    fn walker_cannot_climb_without_support() {
        // Side view: floor at the bottom, a ledge on the right.
        let g = Grid2::parse(
            "....
             ...#
             ####",
        )
        .unwrap();
        let walker = Policy2::new().with_movement(MovementPolicy::WALL_BELOW);
        let t = Point::new(3, 2);
        let pm = PathMap::build(&g, &walker, t, None).unwrap();
        // Climbing from (2,1) to (2,2) needs a floor below (2,2): there is none.
        assert!(!pm.is_accessible(Point::new(0, 1)));
        let flyer = PathMap::build(&g, &Policy2::new(), t, None).unwrap();
        assert!(flyer.is_accessible(Point::new(0, 1)));

        // A crawler climbs along the map edge, which counts as solid.
        let crawler = Policy2::new()
            .with_movement(MovementPolicy::WALL_BELOW | MovementPolicy::WALL_ASIDE);
        let pm = PathMap::build(&g, &crawler, t, None).unwrap();
        assert!(pm.is_accessible(Point::new(0, 1)));
        let path = pm.path_to_target(Point::new(0, 1)).unwrap();
        assert_eq!(path[1], Point::new(0, 2));
    }

    /// 5×4×5 volume on a solid ground layer, with a two-cell pillar at
    /// x = z = 2.
    fn pillar_volume() -> Grid3 {
        let mut g = Grid3::new(Cuboid::with_size(5, 4, 5), Terrain::FLOOR);
        for x in 0..5 {
            for z in 0..5 {
                g.set(Point3::new(x, 0, z), Terrain::WALL);
            }
        }
        g.set(Point3::new(2, 1, 2), Terrain::WALL);
        g.set(Point3::new(2, 2, 2), Terrain::WALL);
        g
    }

    #[test]
    fn pillar_top_by_movement_rule() {
        let g = pillar_volume();
        let top = Point3::new(2, 3, 2);
        let start = Point3::new(1, 1, 2);

        // Walkers never find a floor at y = 1 or 2 to climb from.
        let walker = Policy3::new().with_movement(MovementPolicy::WALL_BELOW);
        let pm = PathMap::build(&g, &walker, top, None).unwrap();
        assert!(matches!(
            pm.distance_to_target(start),
            Err(PathError::NotAccessible(_))
        ));
        assert!(!pm.is_accessible(Point3::new(0, 1, 0)));
        assert_eq!(pm.distance_to_target(Point3::new(1, 3, 2)), Ok(1.0));

        // Crawlers climb beside the pillar, then need the volume edge to
        // reach the top layer.
        let crawler = Policy3::new().with_movement(MovementPolicy::WALL_ASIDE);
        let pm = PathMap::build(&g, &crawler, top, None).unwrap();
        assert_eq!(pm.distance_to_target(start), Ok(5.0));
        let path = pm.path_to_target(start).unwrap();
        assert_eq!(path.len(), 6);
        assert!(path.iter().all(|p| g.is_walkable(*p)));
        assert!(path.iter().any(|p| p.x == 0 || p.x == 4 || p.z == 0 || p.z == 4));
        assert!(pm.is_accessible(Point3::new(0, 1, 0)));

        let fly = PathMap::build(&g, &Policy3::new(), top, None).unwrap();
        assert_eq!(fly.distance_to_target(start), Ok(3.0));
    }

    #[test]
    fn three_d_column_route() {
        let mut g = Grid3::new(Cuboid::with_size(3, 3, 3), Terrain::FLOOR);
        // Solid middle layer except one hole.
        for x in 0..3 {
            for z in 0..3 {
                if (x, z) != (2, 2) {
                    g.set(Point3::new(x, 1, z), Terrain::WALL);
                }
            }
        }
        let t = Point3::new(0, 2, 0);
        let pm = PathMap::build(&g, &Policy3::new(), t, None).unwrap();
        let path = pm.path_to_target(Point3::new(0, 0, 0)).unwrap();
        assert!(path.contains(&Point3::new(2, 1, 2)));
        assert_eq!(pm.distance_to_target(Point3::ZERO), Ok(10.0));
        assert_eq!(
            pm.path_from_target(Point3::ZERO).unwrap().first(),
            Some(&t)
        );
    }
}
