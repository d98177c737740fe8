//! Movement configuration: which steps an agent may take and what they cost.
//!
//! [`Policy2`] configures 2D grids and [`Policy3`] 3D volumes. Both are plain
//! value objects; builds read them and never mutate them.

// ---------------------------------------------------------------------------
// DiagonalPolicy
// ---------------------------------------------------------------------------

/// Rule for a class of diagonal steps.
///
/// A diagonal step "cuts past" the orthogonal cells reached by moving along
/// each of its axes alone: two cells for an edge diagonal, three for a 3D
/// corner diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalPolicy {
    /// Diagonal steps are not allowed.
    #[default]
    None,
    /// Allowed if at least one cut-past cell is walkable.
    OneFree,
    /// Allowed only if every cut-past cell is walkable.
    TwoFree,
    /// Always allowed (the destination must still be walkable).
    All,
}

impl DiagonalPolicy {
    /// Whether a diagonal with `free` walkable cut-past cells out of `total`
    /// is allowed.
    #[inline]
    pub fn allows(self, free: usize, total: usize) -> bool {
        match self {
            Self::None => false,
            Self::OneFree => free >= 1,
            Self::TwoFree => free == total,
            Self::All => true,
        }
    }
}

// ---------------------------------------------------------------------------
// MovementPolicy
// ---------------------------------------------------------------------------

/// Bitmask of contact requirements gating vertical steps.
///
/// An empty mask ([`FLY`](Self::FLY)) allows every vertical step. Otherwise
/// a step with a vertical component is allowed if *any* requested contact
/// exists around the destination cell. Out-of-bounds cells count as solid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementPolicy(pub u8);

impl MovementPolicy {
    /// No contact required.
    pub const FLY: Self = Self(0);
    /// Solid cell directly below the destination (walking, climbing stairs).
    pub const WALL_BELOW: Self = Self(1 << 0);
    /// Solid cell horizontally adjacent to the destination (wall-crawling).
    pub const WALL_ASIDE: Self = Self(1 << 1);
    /// Solid cell directly above the destination (ceiling-crawling).
    pub const WALL_ABOVE: Self = Self(1 << 2);

    /// Whether this mask contains all bits of `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for MovementPolicy {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for MovementPolicy {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for MovementPolicy {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// EdgeCost
// ---------------------------------------------------------------------------

/// How a step's base cost combines with the weights of the two cells.
///
/// The base cost is `1.0` for orthogonal steps and the configured diagonal
/// weight for diagonal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeCost {
    /// `base * weight(to)`: entering a cell costs its weight.
    #[default]
    Destination,
    /// `base * weight(from)`: leaving a cell costs its weight.
    Source,
    /// `base * (weight(from) + weight(to)) / 2`.
    Average,
    /// `base`; cell weights are ignored.
    Fixed,
}

impl EdgeCost {
    /// Cost of a step with the given base cost between cells of the given
    /// weights.
    #[inline]
    pub fn combine(self, base: f32, from_weight: f32, to_weight: f32) -> f32 {
        match self {
            Self::Destination => base * to_weight,
            Self::Source => base * from_weight,
            Self::Average => base * (from_weight + to_weight) * 0.5,
            Self::Fixed => base,
        }
    }
}

// ---------------------------------------------------------------------------
// Policy2
// ---------------------------------------------------------------------------

/// Adjacency configuration for 2D grids.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Policy2 {
    pub diagonals_policy: DiagonalPolicy,
    pub diagonals_weight: f32,
    pub movement_policy: MovementPolicy,
    pub edge_cost: EdgeCost,
}

impl Default for Policy2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy2 {
    /// Orthogonal moves only, unit diagonal weight, free vertical movement.
    pub const fn new() -> Self {
        Self {
            diagonals_policy: DiagonalPolicy::None,
            diagonals_weight: 1.0,
            movement_policy: MovementPolicy::FLY,
            edge_cost: EdgeCost::Destination,
        }
    }

    pub const fn with_diagonals(mut self, policy: DiagonalPolicy, weight: f32) -> Self {
        self.diagonals_policy = policy;
        self.diagonals_weight = weight;
        self
    }

    pub const fn with_movement(mut self, movement: MovementPolicy) -> Self {
        self.movement_policy = movement;
        self
    }

    pub const fn with_edge_cost(mut self, edge_cost: EdgeCost) -> Self {
        self.edge_cost = edge_cost;
        self
    }
}

// ---------------------------------------------------------------------------
// Policy3
// ---------------------------------------------------------------------------

/// Adjacency configuration for 3D volumes.
///
/// Diagonals fall into three independently configured classes:
/// horizontal-plane edges (same `y`), vertical-plane edges (change `y` and
/// one of `x`/`z`) and vertices (change all three axes).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Policy3 {
    pub horizontal_edges_policy: DiagonalPolicy,
    pub horizontal_edges_weight: f32,
    pub vertical_edges_policy: DiagonalPolicy,
    pub vertical_edges_weight: f32,
    pub vertices_policy: DiagonalPolicy,
    pub vertices_weight: f32,
    pub movement_policy: MovementPolicy,
    pub edge_cost: EdgeCost,
}

impl Default for Policy3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy3 {
    /// Face moves only, unit diagonal weights, free vertical movement.
    pub const fn new() -> Self {
        Self {
            horizontal_edges_policy: DiagonalPolicy::None,
            horizontal_edges_weight: 1.0,
            vertical_edges_policy: DiagonalPolicy::None,
            vertical_edges_weight: 1.0,
            vertices_policy: DiagonalPolicy::None,
            vertices_weight: 1.0,
            movement_policy: MovementPolicy::FLY,
            edge_cost: EdgeCost::Destination,
        }
    }

    pub const fn with_horizontal_edges(mut self, policy: DiagonalPolicy, weight: f32) -> Self {
        self.horizontal_edges_policy = policy;
        self.horizontal_edges_weight = weight;
        self
    }

    pub const fn with_vertical_edges(mut self, policy: DiagonalPolicy, weight: f32) -> Self {
        self.vertical_edges_policy = policy;
        self.vertical_edges_weight = weight;
        self
    }

    pub const fn with_vertices(mut self, policy: DiagonalPolicy, weight: f32) -> Self {
        self.vertices_policy = policy;
        self.vertices_weight = weight;
        self
    }

    pub const fn with_movement(mut self, movement: MovementPolicy) -> Self {
        self.movement_policy = movement;
        self
    }

    pub const fn with_edge_cost(mut self, edge_cost: EdgeCost) -> Self {
        self.edge_cost = edge_cost;
        self
    }
}
