//! Flat record layout for persisting baked path grids.
//!
//! Each target is stored as a [`TargetRecords`] listing one [`CellRecord`]
//! per reached cell. Loading the records back rebuilds every map without
//! running a search.

use log::warn;
use tilenav_core::{Extent, TileGrid};

use crate::error::{PathError, Result};
use crate::pathgrid::PathGrid;
use crate::pathmap::{Node, PathMap};

/// One reached cell of one target's flow field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord<P> {
    pub coord: P,
    /// Walkability at bake time.
    pub is_walkable: bool,
    /// Weight at bake time.
    pub weight: f32,
    pub next: P,
    pub direction: P,
    pub distance: f32,
}

/// Every reached cell of one target's flow field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRecords<P> {
    pub target: P,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_distance: Option<f32>,
    pub cells: Vec<CellRecord<P>>,
}

impl<B: Extent> PathMap<B> {
    /// Flatten into records, one per reached cell in index order.
    pub fn to_records(&self) -> TargetRecords<B::Pos> {
        TargetRecords {
            target: self.target(),
            max_distance: self.max_distance(),
            cells: self
                .iter()
                .map(|(coord, n)| CellRecord {
                    coord,
                    is_walkable: true,
                    weight: n.weight,
                    next: n.next,
                    direction: n.direction,
                    distance: n.distance,
                })
                .collect(),
        }
    }

    /// Rebuild a map over `bounds` from its records.
    ///
    /// Returns the map and the number of cells whose recorded walkability
    /// or weight disagrees with `grid`.
    fn from_target_records<G>(records: &TargetRecords<B::Pos>, grid: &G) -> Result<(Self, usize)>
    where
        G: TileGrid<Bounds = B> + ?Sized,
    {
        let bounds = grid.bounds();
        let ti = bounds
            .index(records.target)
            .ok_or_else(|| PathError::out_of_bounds(records.target))?;
        let mut nodes = vec![Node::unreached(); bounds.cell_count()];
        let mut stale = 0;
        for c in &records.cells {
            let i = bounds
                .index(c.coord)
                .ok_or_else(|| PathError::out_of_bounds(c.coord))?;
            if !bounds.includes(c.next) {
                return Err(PathError::out_of_bounds(c.next));
            }
            if grid.is_walkable(c.coord) != c.is_walkable
                || grid.weight(c.coord) != Some(c.weight)
            {
                stale += 1;
            }
            if !c.is_walkable {
                continue;
            }
            nodes[i] = Node {
                reached: true,
                distance: c.distance,
                next: c.next,
                direction: c.direction,
                weight: c.weight,
            };
        }
        if !nodes[ti].reached {
            return Err(PathError::invalid_target(records.target));
        }
        let max_distance = records.max_distance.filter(|d| *d > 0.0);
        Ok((
            Self::from_nodes(bounds, records.target, max_distance, nodes),
            stale,
        ))
    }
}

impl<B: Extent> PathGrid<B> {
    /// Flatten every map into records, in target index order.
    pub fn to_records(&self) -> Vec<TargetRecords<B::Pos>> {
        self.maps().map(PathMap::to_records).collect()
    }

    /// Rebuild a path grid over `grid`'s bounds from stored records.
    ///
    /// Records disagreeing with the current walkability or weights of
    /// `grid` are loaded as stored and reported with a warning; rebake to
    /// pick up the changes. Coordinates outside the grid are rejected.
    pub fn from_records<G>(records: &[TargetRecords<B::Pos>], grid: &G) -> Result<Self>
    where
        G: TileGrid<Bounds = B> + ?Sized,
    {
        let bounds = grid.bounds();
        let mut maps = Vec::with_capacity(bounds.cell_count());
        maps.resize_with(bounds.cell_count(), || None);
        let mut stale = 0;
        for rec in records {
            let (map, s) = PathMap::from_target_records(rec, grid)?;
            stale += s;
            if let Some(i) = bounds.index(rec.target) {
                maps[i] = Some(map);
            }
        }
        if stale > 0 {
            warn!("{stale} path grid records disagree with the current grid; rebake to refresh");
        }
        Ok(Self::from_maps(bounds, maps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathgrid::PathGrid3;
    use crate::policy::{DiagonalPolicy, EdgeCost, MovementPolicy, Policy2, Policy3};
    use tilenav_core::{Cuboid, Grid2, Grid3, Point, Point3, Range, Terrain};

    const CAVE: &str = "
        ..#...
        .2#.#.
        ...3#.
        ##.#..
        ......";

    fn baked() -> (Grid2, PathGrid<Range>) {
        let g = Grid2::parse(CAVE).unwrap();
        let policy = Policy2::new()
            .with_diagonals(DiagonalPolicy::OneFree, 1.5)
            .with_edge_cost(EdgeCost::Average);
        let pg = PathGrid::build(&g, &policy).unwrap();
        (g, pg)
    }

    #[test]
    fn records_answer_identically() {
        let (g, pg) = baked();
        let records = pg.to_records();
        assert_eq!(records.len(), pg.len());
        let back = PathGrid::from_records(&records, &g).unwrap();
        assert_eq!(back.len(), pg.len());
        for to in pg.targets() {
            for from in g.bounds().iter() {
                assert_eq!(back.next_hop(from, to), pg.next_hop(from, to));
                assert_eq!(back.distance(from, to), pg.distance(from, to));
            }
        }
    }

    #[test]
    fn only_reached_cells_are_written() {
        let (g, pg) = baked();
        let t = Point::new(0, 0);
        let rec = pg.map(t).unwrap().to_records();
        assert_eq!(rec.target, t);
        assert_eq!(rec.cells.len(), pg.map(t).unwrap().reached_count());
        assert!(rec.cells.iter().all(|c| g.is_walkable(c.coord) && c.is_walkable));
        let own = rec.cells.iter().find(|c| c.coord == t).unwrap();
        assert_eq!((own.next, own.distance), (t, 0.0));
    }

    #[test]
    fn stale_records_still_load() {
        let (mut g, pg) = baked();
        let records = pg.to_records();
        g.set(Point::new(0, 4), Terrain::weighted(5.0));
        let back = PathGrid::from_records(&records, &g).unwrap();
        assert_eq!(
            back.next_hop(Point::new(0, 4), Point::ZERO),
            pg.next_hop(Point::new(0, 4), Point::ZERO)
        );
    }

    #[test]
    fn volume_records_answer_identically() {
        let mut g = Grid3::new(Cuboid::with_size(5, 4, 5), Terrain::FLOOR);
        for x in 0..5 {
            for z in 0..5 {
                g.set(Point3::new(x, 0, z), Terrain::WALL);
            }
        }
        g.set(Point3::new(2, 1, 2), Terrain::WALL);
        g.set(Point3::new(2, 2, 2), Terrain::WALL);
        let crawler = Policy3::new().with_movement(MovementPolicy::WALL_ASIDE);
        let pg: PathGrid3 = PathGrid::build(&g, &crawler).unwrap();
        assert_eq!(pg.len(), 100 - 25 - 2);

        let (start, top) = (Point3::new(1, 1, 2), Point3::new(2, 3, 2));
        assert_eq!(pg.distance(start, top), Ok(5.0));
        let pm = PathMap::build(&g, &crawler, top, None).unwrap();
        assert_eq!(pg.next_hop(start, top), pm.next_hop(start));

        let back = PathGrid::from_records(&pg.to_records(), &g).unwrap();
        assert_eq!(back.len(), pg.len());
        for to in pg.targets() {
            for from in pg.targets() {
                assert_eq!(back.next_hop(from, to), pg.next_hop(from, to));
                assert_eq!(back.distance(from, to), pg.distance(from, to));
            }
        }
    }

    #[test]
    fn foreign_coordinates_are_rejected() {
        let (g, pg) = baked();
        let mut records = pg.to_records();
        records[0].cells[0].coord = Point::new(40, 0);
        assert_eq!(
            PathGrid::from_records(&records, &g).unwrap_err(),
            PathError::out_of_bounds(Point::new(40, 0))
        );

        let mut records = pg.to_records();
        records[1].cells.retain(|c| c.distance > 0.0);
        assert!(matches!(
            PathGrid::from_records(&records, &g),
            Err(PathError::InvalidTarget(_))
        ));
    }
}
