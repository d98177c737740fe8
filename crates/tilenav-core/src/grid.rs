//! A dense, owned tile array usable as a [`TileGrid`].
//!
//! [`DenseGrid`] is the reference grid used by the tests and demos; real
//! consumers are expected to implement [`TileGrid`] over their own storage.

use crate::coord::Extent;
use crate::geom::{Point, Range};
use crate::geom3::Cuboid;
use crate::tile::{Terrain, Tile, TileGrid};

/// A 2D grid of tiles.
pub type Grid2<T = Terrain> = DenseGrid<Range, T>;

/// A 3D grid of tiles.
pub type Grid3<T = Terrain> = DenseGrid<Cuboid, T>;

/// A fixed-size array of tiles covering an [`Extent`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseGrid<B, T> {
    bounds: B,
    cells: Vec<T>,
}

impl<B: Extent, T: Clone> DenseGrid<B, T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(bounds: B, fill: T) -> Self {
        Self {
            bounds,
            cells: vec![fill; bounds.cell_count()],
        }
    }

    /// Set every cell to `tile`.
    pub fn fill(&mut self, tile: T) {
        for c in self.cells.iter_mut() {
            *c = tile.clone();
        }
    }
}

impl<B: Extent, T> DenseGrid<B, T> {
    /// Create a grid by evaluating `f` at every position.
    pub fn from_fn(bounds: B, mut f: impl FnMut(B::Pos) -> T) -> Self {
        Self {
            bounds,
            cells: bounds.positions().map(&mut f).collect(),
        }
    }

    /// Get the tile at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: B::Pos) -> Option<&T> {
        self.bounds.index(p).map(|i| &self.cells[i])
    }

    /// Mutable access to the tile at `p`.
    #[inline]
    pub fn at_mut(&mut self, p: B::Pos) -> Option<&mut T> {
        self.bounds.index(p).map(|i| &mut self.cells[i])
    }

    /// Set the tile at `p`. Returns `false` (and does nothing) out of bounds.
    pub fn set(&mut self, p: B::Pos, tile: T) -> bool {
        match self.bounds.index(p) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Iterate over `(position, tile)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (B::Pos, &T)> + '_ {
        self.bounds.positions().zip(self.cells.iter())
    }

    /// Count how many tiles satisfy a predicate.
    pub fn count(&self, mut f: impl FnMut(&T) -> bool) -> usize {
        self.cells.iter().filter(|t| f(t)).count()
    }
}

impl<B: Extent, T: Tile> TileGrid for DenseGrid<B, T> {
    type Bounds = B;
    type Tile = T;

    #[inline]
    fn bounds(&self) -> B {
        self.bounds
    }

    #[inline]
    fn tile(&self, p: B::Pos) -> Option<&T> {
        self.at(p)
    }
}

/// Errors returned by [`Grid2::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapParseError {
    /// Lines have different widths.
    #[error("map line {line} is {found} cells wide, expected {expected}")]
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside `#`, `.` and `1`-`9`.
    #[error("map contains invalid character {ch:?} at {pos}")]
    InvalidChar { ch: char, pos: Point },
}

impl Grid2<Terrain> {
    /// Parse an ASCII map.
    ///
    /// `#` is a wall, `.` a unit-weight floor, and a digit `1`-`9` a floor
    /// with that weight. The first line is the top row, i.e. the highest
    /// `y`; the bottom line is `y = 0`. Surrounding blank lines are ignored.
    pub fn parse(s: &str) -> Result<Self, MapParseError> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim).collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        let height = lines.len();
        for (line, l) in lines.iter().enumerate() {
            let found = l.chars().count();
            if found != width {
                return Err(MapParseError::InconsistentWidth {
                    line,
                    expected: width,
                    found,
                });
            }
        }

        let mut grid = Self::new(Range::with_size(width as i32, height as i32), Terrain::FLOOR);
        for (row, l) in lines.iter().enumerate() {
            let y = (height - 1 - row) as i32;
            for (x, ch) in l.chars().enumerate() {
                let pos = Point::new(x as i32, y);
                let tile = match ch {
                    '#' => Terrain::WALL,
                    '.' => Terrain::FLOOR,
                    '1'..='9' => Terrain::weighted(ch.to_digit(10).unwrap_or(1) as f32),
                    _ => return Err(MapParseError::InvalidChar { ch, pos }),
                };
                grid.set(pos, tile);
            }
        }
        Ok(grid)
    }
}
