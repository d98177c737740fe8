//! Building a [`PathGrid`]: blocking, cooperative, cancellable and
//! background variants sharing one per-cell loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::{info, trace};
use tilenav_core::{Extent, PosOf, TileGrid};

use crate::error::{PathError, Result};
use crate::neighbors::Adjacency;
use crate::pathgrid::PathGrid;
use crate::pathmap::PathMap;

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PathGridBaker
// ---------------------------------------------------------------------------

/// Cooperative single-threaded bake: one target per [`step`](Self::step).
///
/// Useful for spreading a bake over frames of a game loop. Dropping the
/// baker discards the partial result.
pub struct PathGridBaker<'a, G: TileGrid + ?Sized, A: ?Sized> {
    grid: &'a G,
    adjacency: &'a A,
    targets: Vec<PosOf<G>>,
    done: usize,
    maps: Vec<Option<PathMap<G::Bounds>>>,
}

impl<'a, G, A> PathGridBaker<'a, G, A>
where
    G: TileGrid + ?Sized,
    A: Adjacency<G> + ?Sized,
{
    /// Prepare a bake with one target per walkable cell of `grid`.
    pub fn new(grid: &'a G, adjacency: &'a A) -> Self {
        let bounds = grid.bounds();
        let targets: Vec<_> = bounds
            .positions()
            .filter(|p| grid.is_walkable(*p))
            .collect();
        let mut maps = Vec::with_capacity(bounds.cell_count());
        maps.resize_with(bounds.cell_count(), || None);
        Self {
            grid,
            adjacency,
            targets,
            done: 0,
            maps,
        }
    }

    /// Number of targets to bake.
    #[inline]
    pub fn total(&self) -> usize {
        self.targets.len()
    }

    /// Number of targets baked so far.
    #[inline]
    pub fn completed(&self) -> usize {
        self.done
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done >= self.targets.len()
    }

    /// Fraction of targets baked, in `[0, 1]`. An empty bake is complete.
    pub fn progress(&self) -> f32 {
        if self.targets.is_empty() {
            1.0
        } else {
            self.done as f32 / self.targets.len() as f32
        }
    }

    /// Bake the next target and return the new progress. Does nothing once
    /// every target is baked.
    pub fn step(&mut self) -> Result<f32> {
        let Some(&target) = self.targets.get(self.done) else {
            return Ok(1.0);
        };
        let map = PathMap::build(self.grid, self.adjacency, target, None)?;
        trace!(
            "baked target {target} ({} reached), {}/{}",
            map.reached_count(),
            self.done + 1,
            self.targets.len()
        );
        if let Some(i) = self.grid.bounds().index(target) {
            self.maps[i] = Some(map);
        }
        self.done += 1;
        Ok(self.progress())
    }

    /// The finished grid, or `None` if targets remain.
    pub fn finish(self) -> Option<PathGrid<G::Bounds>> {
        if !self.is_done() {
            return None;
        }
        Some(PathGrid::from_maps(self.grid.bounds(), self.maps))
    }
}

// ---------------------------------------------------------------------------
// Blocking builds
// ---------------------------------------------------------------------------

impl<B: Extent> PathGrid<B> {
    /// Bake every walkable cell of `grid`.
    pub fn build<G, A>(grid: &G, adjacency: &A) -> Result<Self>
    where
        G: TileGrid<Bounds = B> + ?Sized,
        A: Adjacency<G> + ?Sized,
    {
        Self::build_cancellable(grid, adjacency, &CancelToken::new(), |_| {})
    }

    /// Bake every walkable cell of `grid`, reporting the completed fraction
    /// to `progress` after each target and stopping with
    /// [`PathError::Cancelled`] once `token` is cancelled.
    ///
    /// Cancellation is checked between targets only.
    pub fn build_cancellable<G, A>(
        grid: &G,
        adjacency: &A,
        token: &CancelToken,
        mut progress: impl FnMut(f32),
    ) -> Result<Self>
    where
        G: TileGrid<Bounds = B> + ?Sized,
        A: Adjacency<G> + ?Sized,
    {
        let mut baker = PathGridBaker::new(grid, adjacency);
        info!("baking path grid: {} targets", baker.total());
        while !baker.is_done() {
            if token.is_cancelled() {
                info!(
                    "path grid bake cancelled after {}/{} targets",
                    baker.completed(),
                    baker.total()
                );
                return Err(PathError::Cancelled);
            }
            progress(baker.step()?);
        }
        let total = baker.total();
        let grid = baker.finish().ok_or(PathError::Cancelled)?;
        info!("path grid baked: {total} targets");
        Ok(grid)
    }

    /// Bake and publish into `slot`. On error the slot keeps its previous
    /// content.
    pub fn rebake_into<G, A>(
        slot: &mut Option<Self>,
        grid: &G,
        adjacency: &A,
        token: &CancelToken,
        progress: impl FnMut(f32),
    ) -> Result<()>
    where
        G: TileGrid<Bounds = B> + ?Sized,
        A: Adjacency<G> + ?Sized,
    {
        let baked = Self::build_cancellable(grid, adjacency, token, progress)?;
        *slot = Some(baked);
        Ok(())
    }

    /// Bake on a background thread. The grid snapshot and adjacency move
    /// into the thread.
    pub fn spawn_bake<G, A>(grid: G, adjacency: A) -> Result<BakeHandle<B>>
    where
        G: TileGrid<Bounds = B> + Send + 'static,
        A: Adjacency<G> + Send + 'static,
    {
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let thread_token = token.clone();
        let join = thread::Builder::new()
            .name("tilenav-bake".into())
            .spawn(move || {
                Self::build_cancellable(&grid, &adjacency, &thread_token, |f| {
                    // The handle may already be gone.
                    let _ = tx.send(f);
                })
            })
            .map_err(|e| PathError::BakeFailed(e.to_string()))?;
        Ok(BakeHandle {
            token,
            progress_rx: rx,
            last_progress: 0.0,
            join,
        })
    }
}

// ---------------------------------------------------------------------------
// BakeHandle
// ---------------------------------------------------------------------------

/// A bake running on a background thread, see [`PathGrid::spawn_bake`].
pub struct BakeHandle<B: Extent> {
    token: CancelToken,
    progress_rx: Receiver<f32>,
    last_progress: f32,
    join: JoinHandle<Result<PathGrid<B>>>,
}

impl<B: Extent> BakeHandle<B> {
    /// Latest reported fraction of targets baked.
    pub fn progress(&mut self) -> f32 {
        while let Ok(f) = self.progress_rx.try_recv() {
            self.last_progress = f;
        }
        self.last_progress
    }

    /// Ask the bake to stop before its next target.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this bake.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the bake to end.
    pub fn join(self) -> Result<PathGrid<B>> {
        self.join
            .join()
            .map_err(|_| PathError::BakeFailed("bake thread panicked".into()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy2;
    use tilenav_core::{Grid2, Point, Range, Terrain};

    fn open10() -> Grid2 {
        Grid2::new(Range::with_size(10, 10), Terrain::FLOOR)
    }

    #[test]
    fn baker_steps_one_target_at_a_time() {
        let g = Grid2::parse(
            ".#.
             ...",
        )
        .unwrap();
        let policy = Policy2::new();
        let mut baker = PathGridBaker::new(&g, &policy);
        assert_eq!(baker.total(), 5);
        assert_eq!(baker.progress(), 0.0);
        assert_eq!(baker.step(), Ok(0.2));
        assert!(!baker.is_done());
        while !baker.is_done() {
            baker.step().unwrap();
        }
        assert_eq!(baker.progress(), 1.0);
        assert_eq!(baker.step(), Ok(1.0));
        let pg = baker.finish().unwrap();
        assert_eq!(pg.len(), 5);
        assert_eq!(pg.next_hop(Point::new(0, 1), Point::new(2, 1)), Ok(Point::new(0, 0)));
    }

    #[test]
    fn unfinished_baker_yields_nothing() {
        let g = open10();
        let policy = Policy2::new();
        let mut baker = PathGridBaker::new(&g, &policy);
        baker.step().unwrap();
        assert!(baker.finish().is_none());
    }

    #[test]
    fn progress_is_reported_per_target() {
        let g = open10();
        let mut reports = Vec::new();
        let pg = PathGrid::build_cancellable(&g, &Policy2::new(), &CancelToken::new(), |f| {
            reports.push(f)
        })
        .unwrap();
        assert_eq!(pg.len(), 100);
        assert_eq!(reports.len(), 100);
        assert!(reports.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(reports.last(), Some(&1.0));
    }

    #[test]
    fn immediate_cancel_leaves_prior_state_untouched() {
        let g = open10();
        let policy = Policy2::new();
        let small = Grid2::new(Range::with_size(2, 1), Terrain::FLOOR);
        let mut slot = Some(PathGrid::build(&small, &policy).unwrap());

        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let res = PathGrid::rebake_into(&mut slot, &g, &policy, &token, |_| calls += 1);
        assert_eq!(res, Err(PathError::Cancelled));
        assert_eq!(calls, 0);
        let kept = slot.as_ref().unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.bounds(), Range::with_size(2, 1));
    }

    #[test]
    fn rebake_publishes_on_success() {
        let g = open10();
        let mut slot = None;
        PathGrid::rebake_into(&mut slot, &g, &Policy2::new(), &CancelToken::new(), |_| {})
            .unwrap();
        assert_eq!(slot.map(|pg| pg.len()), Some(100));
    }

    #[test]
    fn cancel_mid_bake() {
        let g = open10();
        let token = CancelToken::new();
        let stopper = token.clone();
        let mut seen = 0;
        let res = PathGrid::build_cancellable(&g, &Policy2::new(), &token, |_| {
            seen += 1;
            if seen == 10 {
                stopper.cancel();
            }
        });
        assert!(matches!(res, Err(PathError::Cancelled)));
        assert_eq!(seen, 10);
    }

    #[test]
    fn background_bake_completes() {
        let mut handle = PathGrid::spawn_bake(open10(), Policy2::new()).unwrap();
        while !handle.is_finished() {
            let p = handle.progress();
            assert!((0.0..=1.0).contains(&p));
            thread::yield_now();
        }
        assert_eq!(handle.progress(), 1.0);
        let pg = handle.join().unwrap();
        assert_eq!(pg.len(), 100);
        assert_eq!(pg.distance(Point::ZERO, Point::new(9, 9)), Ok(18.0));
    }

    #[test]
    fn background_bake_cancelled_immediately() {
        let handle = PathGrid::spawn_bake(open10(), Policy2::new()).unwrap();
        handle.cancel();
        // The bake may have finished before the flag was seen.
        match handle.join() {
            Ok(pg) => assert_eq!(pg.len(), 100),
            Err(e) => assert_eq!(e, PathError::Cancelled),
        }
    }
}
