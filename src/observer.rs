use grid_util::point::Point;

/// Passive hooks for visualising a search. The engine calls them at fixed points and never
/// reads anything back, so attaching an observer does not change any result.
///
/// Cell lists are only gathered when [enabled](SearchObserver::enabled) returns `true`.
pub trait SearchObserver {
    fn enabled(&self) -> bool {
        true
    }
    /// A search passed its precondition checks and is about to seed the open set.
    fn on_search_start(&mut self) {}
    /// Cells that were finalized when the search ended.
    fn on_closed_set(&mut self, _cells: &[Point]) {}
    /// Cells still on the frontier when the goal was reached.
    fn on_open_set(&mut self, _cells: &[Point]) {}
    fn on_path(&mut self, _cells: &[Point]) {}
}

/// Observer that ignores everything; the default for [AStar](crate::AStar).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn enabled(&self) -> bool {
        false
    }
}
