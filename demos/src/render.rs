//! ASCII rendering, top row (highest `y`) first.

use tilenav_core::{Point, Range, TileGrid};
use tilenav_paths::PathMap;

fn rows(bounds: Range, mut cell: impl FnMut(Point) -> char) -> String {
    let mut out = String::with_capacity(bounds.len() + bounds.height() as usize);
    for y in (bounds.min.y..bounds.max.y).rev() {
        for x in bounds.min.x..bounds.max.x {
            out.push(cell(Point::new(x, y)));
        }
        out.push('\n');
    }
    out
}

fn terrain_char<G: TileGrid<Bounds = Range> + ?Sized>(grid: &G, p: Point) -> char {
    match grid.weight(p) {
        _ if !grid.is_walkable(p) => '#',
        Some(w) if w > 1.0 => char::from_digit(w.round().min(9.0) as u32, 10).unwrap_or('9'),
        _ => '.',
    }
}

/// The grid in the format read by [`Grid2::parse`](tilenav_core::Grid2::parse).
pub fn render_grid<G: TileGrid<Bounds = Range> + ?Sized>(grid: &G) -> String {
    rows(grid.bounds(), |p| terrain_char(grid, p))
}

fn arrow(d: Point) -> char {
    match (d.x.signum(), d.y.signum()) {
        (0, 1) => '↑',
        (1, 1) => '↗',
        (1, 0) => '→',
        (1, -1) => '↘',
        (0, -1) => '↓',
        (-1, -1) => '↙',
        (-1, 0) => '←',
        (-1, 1) => '↖',
        _ => '@',
    }
}

/// The flow field of `map` drawn over `grid`: an arrow toward the next hop
/// on every reached cell, `@` on the target and `?` on unreached floor.
pub fn render_flow<G: TileGrid<Bounds = Range> + ?Sized>(grid: &G, map: &PathMap<Range>) -> String {
    rows(grid.bounds(), |p| match map.direction(p) {
        Ok(d) => arrow(d),
        Err(_) if grid.is_walkable(p) => '?',
        Err(_) => terrain_char(grid, p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilenav_core::Grid2;
    use tilenav_paths::Policy2;

    const MAP: &str = "\
..#.
.3#.
....
";

    #[test]
    fn grid_round_trips_through_text() {
        let g = Grid2::parse(MAP).unwrap();
        assert_eq!(render_grid(&g), MAP);
        assert_eq!(Grid2::parse(&render_grid(&g)).unwrap(), g);
    }

    #[test]
    fn flow_points_at_the_target() {
        let g = Grid2::parse(MAP).unwrap();
        let pm = PathMap::build(&g, &Policy2::new(), Point::new(3, 2), None).unwrap();
        let flow = render_flow(&g, &pm);
        let lines: Vec<&str> = flow.lines().collect();
        assert_eq!(lines[0], "↓↓#@");
        assert_eq!(lines[2], "→→→↑");
    }
}
