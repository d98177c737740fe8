use tilenav_core::{PosOf, TileGrid};

/// Filters applied to every shape query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeOptions {
    /// Drop cells that are not walkable.
    pub walkable_only: bool,
    /// Keep the shape's centre cell when it otherwise belongs to the shape.
    pub include_center: bool,
}

impl ShapeOptions {
    /// Every in-bounds cell, centre included.
    pub const ALL: Self = Self {
        walkable_only: false,
        include_center: true,
    };

    pub const fn walkable(mut self) -> Self {
        self.walkable_only = true;
        self
    }

    pub const fn without_center(mut self) -> Self {
        self.include_center = false;
        self
    }

    /// Whether `p`, an in-shape cell of the shape around `center`, passes
    /// the filters. Out-of-bounds cells never pass.
    pub(crate) fn accepts<G>(self, grid: &G, center: PosOf<G>, p: PosOf<G>) -> bool
    where
        G: TileGrid + ?Sized,
    {
        if p == center && !self.include_center {
            return false;
        }
        if self.walkable_only {
            grid.is_walkable(p)
        } else {
            grid.tile(p).is_some()
        }
    }

    /// Keep the candidates inside the shape that pass the filters.
    pub(crate) fn collect<G, I>(
        self,
        grid: &G,
        center: PosOf<G>,
        candidates: I,
        mut in_shape: impl FnMut(PosOf<G>) -> bool,
    ) -> Vec<PosOf<G>>
    where
        G: TileGrid + ?Sized,
        I: IntoIterator<Item = PosOf<G>>,
    {
        candidates
            .into_iter()
            .filter(|&p| in_shape(p) && self.accepts(grid, center, p))
            .collect()
    }
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self::ALL
    }
}

/// Whether `v` lies on the face `c ± |h|` of one axis.
pub(crate) fn on_border(v: i32, c: i32, h: i32) -> bool {
    (v as i64 - c as i64).unsigned_abs() == h.unsigned_abs() as u64
}
