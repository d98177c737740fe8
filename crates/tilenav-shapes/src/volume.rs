//! 3D shape queries: spheres and boxes. Results come in `x`, `y`, `z`
//! nesting order.

use tilenav_core::{Coord, Cuboid, Point3, TileGrid};

use crate::options::{ShapeOptions, on_border};

fn clipped<G>(grid: &G, center: Point3, half_extents: Point3) -> Cuboid
where
    G: TileGrid<Bounds = Cuboid> + ?Sized,
{
    Cuboid::around(center, half_extents).intersect(grid.bounds())
}

/// Cells with `dx² + dy² + dz² ≤ radius²`.
pub fn sphere<G>(grid: &G, center: Point3, radius: i32, opts: ShapeOptions) -> Vec<Point3>
where
    G: TileGrid<Bounds = Cuboid> + ?Sized,
{
    if radius < 0 {
        return Vec::new();
    }
    let r2 = radius as i64 * radius as i64;
    let area = clipped(grid, center, Point3::new(radius, radius, radius));
    opts.collect(grid, center, area, |p| p.distance_squared(center) <= r2)
}

/// The shell of cells whose Euclidean distance rounds to `radius`.
pub fn sphere_outline<G>(grid: &G, center: Point3, radius: i32, opts: ShapeOptions) -> Vec<Point3>
where
    G: TileGrid<Bounds = Cuboid> + ?Sized,
{
    if radius <= 0 {
        return sphere(grid, center, radius, opts);
    }
    let inner = (2 * radius as i64 - 1).pow(2);
    let outer = (2 * radius as i64 + 1).pow(2);
    let area = clipped(grid, center, Point3::new(radius, radius, radius));
    opts.collect(grid, center, area, |p| {
        let d4 = 4 * p.distance_squared(center);
        inner <= d4 && d4 < outer
    })
}

/// The filled box `center ± half_extents`.
pub fn cuboid<G>(grid: &G, center: Point3, half_extents: Point3, opts: ShapeOptions) -> Vec<Point3>
where
    G: TileGrid<Bounds = Cuboid> + ?Sized,
{
    opts.collect(grid, center, clipped(grid, center, half_extents), |_| true)
}

/// The six faces of the box `center ± half_extents`.
pub fn cuboid_outline<G>(
    grid: &G,
    center: Point3,
    half_extents: Point3,
    opts: ShapeOptions,
) -> Vec<Point3>
where
    G: TileGrid<Bounds = Cuboid> + ?Sized,
{
    let area = clipped(grid, center, half_extents);
    opts.collect(grid, center, area, |p| {
        (0..3).any(|i| on_border(p.axis(i), center.axis(i), half_extents.axis(i)))
    })
}
