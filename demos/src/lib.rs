//! Shared helpers for the tilenav demos: random cave maps and ASCII
//! rendering of grids and flow fields.

pub mod cave;
pub mod render;

pub use cave::{CaveGen, CaveRule};
pub use render::{render_flow, render_grid};
