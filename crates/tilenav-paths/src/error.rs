//! Error type shared by path maps and path grids.

use std::fmt;

/// Errors returned by pathfinding construction and queries.
///
/// Positions are carried pre-formatted so the error does not depend on the
/// grid's dimensionality.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    /// The requested target cell is not walkable.
    #[error("target {0} is not walkable")]
    InvalidTarget(String),

    /// A coordinate lies outside the grid extents.
    #[error("position {0} is outside the grid")]
    OutOfBounds(String),

    /// The cell has no recorded path to the target, or lies beyond the
    /// distance bound.
    #[error("position {0} has no path to the target")]
    NotAccessible(String),

    /// An asynchronous bake was aborted by its cancel token.
    #[error("path grid bake was cancelled")]
    Cancelled,

    /// A background bake terminated abnormally.
    #[error("path grid bake failed: {0}")]
    BakeFailed(String),
}

impl PathError {
    pub fn invalid_target(p: impl fmt::Display) -> Self {
        Self::InvalidTarget(p.to_string())
    }

    pub fn out_of_bounds(p: impl fmt::Display) -> Self {
        Self::OutOfBounds(p.to_string())
    }

    pub fn not_accessible(p: impl fmt::Display) -> Self {
        Self::NotAccessible(p.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tilenav_core::Point;

    #[test]
    fn messages_name_the_position() {
        let e = PathError::not_accessible(Point::new(3, 4));
        assert_eq!(e, PathError::NotAccessible("(3, 4)".into()));
        assert!(e.to_string().contains("(3, 4)"));
        assert!(PathError::Cancelled.to_string().contains("cancelled"));
    }
}
