//! 2D shape queries: circles, rectangles and cones.
//!
//! Every query returns the in-bounds cells of the shape in row-major order,
//! filtered by [`ShapeOptions`]. Nothing here consults the pathfinder.

use tilenav_core::{Coord, Point, Range, TileGrid};

use crate::options::{ShapeOptions, on_border};

/// Candidate cells: the box `center ± half_extents` clipped to the grid.
fn clipped<G>(grid: &G, center: Point, half_extents: Point) -> Range
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    Range::around(center, half_extents).intersect(grid.bounds())
}

/// Cells with `dx² + dy² ≤ radius²`. A negative radius yields nothing.
pub fn circle<G>(grid: &G, center: Point, radius: i32, opts: ShapeOptions) -> Vec<Point>
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    if radius < 0 {
        return Vec::new();
    }
    let r2 = radius as i64 * radius as i64;
    let area = clipped(grid, center, Point::new(radius, radius));
    opts.collect(grid, center, area, |p| p.distance_squared(center) <= r2)
}

/// The ring of cells whose Euclidean distance rounds to `radius`, i.e.
/// `(radius - ½)² ≤ d² < (radius + ½)²`. Radius 0 is the centre alone.
pub fn circle_outline<G>(grid: &G, center: Point, radius: i32, opts: ShapeOptions) -> Vec<Point>
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    if radius <= 0 {
        return circle(grid, center, radius, opts);
    }
    // Scaled by 4 to stay in integers.
    let inner = (2 * radius as i64 - 1).pow(2);
    let outer = (2 * radius as i64 + 1).pow(2);
    let area = clipped(grid, center, Point::new(radius, radius));
    opts.collect(grid, center, area, |p| {
        let d4 = 4 * p.distance_squared(center);
        inner <= d4 && d4 < outer
    })
}

/// The filled box `center ± half_extents`.
pub fn rectangle<G>(grid: &G, center: Point, half_extents: Point, opts: ShapeOptions) -> Vec<Point>
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    opts.collect(grid, center, clipped(grid, center, half_extents), |_| true)
}

/// The border of the box `center ± half_extents`. Border cells outside the
/// grid are dropped, the clipped edge is not replaced.
pub fn rectangle_outline<G>(
    grid: &G,
    center: Point,
    half_extents: Point,
    opts: ShapeOptions,
) -> Vec<Point>
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    let area = clipped(grid, center, half_extents);
    opts.collect(grid, center, area, |p| {
        (0..2).any(|i| on_border(p.axis(i), center.axis(i), half_extents.axis(i)))
    })
}

/// Cells within `radius` whose angle from `facing` is at most
/// `half_angle` degrees.
///
/// The centre has no direction; it is kept or dropped by
/// [`ShapeOptions::include_center`] alone. A zero `facing` yields at most the
/// centre.
pub fn cone<G>(
    grid: &G,
    center: Point,
    radius: i32,
    facing: Point,
    half_angle: f32,
    opts: ShapeOptions,
) -> Vec<Point>
where
    G: TileGrid<Bounds = Range> + ?Sized,
{
    if radius < 0 {
        return Vec::new();
    }
    let r2 = radius as i64 * radius as i64;
    let flen = (facing.length_squared() as f64).sqrt();
    let cos_limit = (half_angle as f64).to_radians().cos();
    let area = clipped(grid, center, Point::new(radius, radius));
    opts.collect(grid, center, area, |p| {
        if p == center {
            return true;
        }
        let len2 = p.distance_squared(center);
        if len2 > r2 || flen == 0.0 {
            return false;
        }
        let (dx, dy) = (p.x as f64 - center.x as f64, p.y as f64 - center.y as f64);
        let dot = dx * facing.x as f64 + dy * facing.y as f64;
        let cos = dot / ((len2 as f64).sqrt() * flen);
        cos >= cos_limit - 1e-9
    })
}
