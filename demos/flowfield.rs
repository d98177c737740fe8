//! Bake a path grid for a random cave on a background thread, then draw the
//! flow field toward a random target.
//!
//! Run: cargo run --bin flowfield [seed]

use std::io::Write;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tilenav_core::{Point, Range, TileGrid};
use tilenav_demos::{CaveGen, CaveRule, render_flow, render_grid};
use tilenav_paths::{DiagonalPolicy, PathGrid, Policy2};
use tilenav_shapes::{ShapeOptions, circle, line_of_sight};

const WIDTH: i32 = 48;
const HEIGHT: i32 = 20;

fn main() {
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    let rules = [CaveRule {
        w_cutoff1: 5,
        w_cutoff2: 25,
        walls_out_of_range: true,
        reps: 4,
    }];
    let grid = CaveGen::new(StdRng::seed_from_u64(seed)).generate(
        Range::with_size(WIDTH, HEIGHT),
        0.42,
        0.05,
        &rules,
    );
    println!("{}", render_grid(&grid));

    let policy = Policy2::new().with_diagonals(DiagonalPolicy::TwoFree, 1.4);
    let mut handle = match PathGrid::spawn_bake(grid.clone(), policy) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    while !handle.is_finished() {
        print!("\rbaking... {:5.1}%", handle.progress() * 100.0);
        let _ = std::io::stdout().flush();
        thread::sleep(Duration::from_millis(20));
    }
    println!("\rbaking... {:5.1}%", handle.progress() * 100.0);
    let paths = match handle.join() {
        Ok(pg) => pg,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let floor: Vec<Point> = grid.bounds().iter().filter(|p| grid.is_walkable(*p)).collect();
    if floor.is_empty() {
        println!("no floor in this cave, try another seed");
        return;
    }
    let target = floor[rng.random_range(0..floor.len())];
    let start = floor[rng.random_range(0..floor.len())];
    let Ok(map) = paths.map(target) else {
        return;
    };
    println!("flow toward {target} ({} cells reach it)", map.reached_count());
    println!("{}", render_flow(&grid, map));

    match paths.get_path(start, target) {
        Ok(path) => println!(
            "{start} -> {target}: {} steps, cost {:.1}",
            path.len() - 1,
            map.distance_to_target(start).unwrap_or(f32::NAN)
        ),
        Err(e) => println!("{start} -> {target}: {e}"),
    }
    let visible = circle(&grid, target, 6, ShapeOptions::ALL.walkable().without_center())
        .into_iter()
        .filter(|&p| line_of_sight(&grid, target, p))
        .count();
    println!("{visible} floor cells within 6 are in sight of the target");
}
