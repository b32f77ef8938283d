//! The A* engine. Open and closed sets, the heap and the node pool are owned by one
//! [AStar] instance and reset after every call, so an instance can be reused for any number of
//! searches but only runs one at a time.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, trace, warn};
use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::key::CellKey;
use crate::observer::{NoopObserver, SearchObserver};
use crate::oracle::BlockedOracle;
use crate::pool::{NodeId, NodePool};
use crate::pqueue::{Comparator, PriorityQueue};
use crate::smoothing::PathSmoother;
use crate::{manhattan_cost, octile_cost, SearchConfig, SearchError, SLANT_COST, STRAIGHT_COST};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Orthogonal offsets first so that 4-directional search uses a prefix of the table.
static DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
const ORTHOGONAL_DIRECTIONS: usize = 4;

/// A frontier entry. Relaxing an open node pushes a fresh entry rather than moving the old
/// one, so entries whose `f` is above the node's current `f` are stale and skipped on pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenEntry {
    pub f: i32,
    pub h: i32,
    pub seq: u32,
    pub node: NodeId,
}

/// Lowest `f` first. Among equal `f`, the lower `h` (the node further along) wins, then the
/// earlier insertion.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowestScore;

impl Comparator<OpenEntry> for LowestScore {
    fn compare(&self, lhs: &OpenEntry, rhs: &OpenEntry) -> Ordering {
        lhs.f
            .cmp(&rhs.f)
            .then(lhs.h.cmp(&rhs.h))
            .then(lhs.seq.cmp(&rhs.seq))
    }
}

/// Counters from the most recent [AStar::find_path] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded.
    pub expanded: usize,
    /// Closed set size when the search ended.
    pub closed: usize,
    /// Open set size when the search ended.
    pub open: usize,
    /// Pool nodes alive when the search ended.
    pub pool_high_water: usize,
}

#[derive(Clone, Debug)]
struct SearchState {
    open_queue: PriorityQueue<OpenEntry, LowestScore>,
    open: FxIndexMap<CellKey, NodeId>,
    closed: FxIndexMap<CellKey, Point>,
    pool: NodePool,
    seq: u32,
}

impl SearchState {
    fn new(config: &SearchConfig) -> SearchState {
        SearchState {
            open_queue: PriorityQueue::with_capacity(config.open_set_capacity, LowestScore),
            open: FxIndexMap::with_capacity_and_hasher(
                config.open_set_capacity,
                FxBuildHasher::default(),
            ),
            closed: FxIndexMap::with_capacity_and_hasher(
                config.closed_set_capacity,
                FxBuildHasher::default(),
            ),
            pool: NodePool::new(config.pool_initial_size, config.pool_max_size),
            seq: 0,
        }
    }

    fn reset_for_new_search(&mut self) {
        self.open_queue.clear();
        self.open.clear();
        self.closed.clear();
        self.pool.release_all();
        self.seq = 0;
    }

    fn push_open(&mut self, key: CellKey, id: NodeId) {
        let node = &self.pool[id];
        let entry = OpenEntry {
            f: node.f,
            h: node.h,
            seq: self.seq,
            node: id,
        };
        self.seq = self.seq.wrapping_add(1);
        self.open.insert(key, id);
        self.open_queue.push(entry);
    }

    /// Walks the predecessor chain into an owned start-to-goal path.
    fn reconstruct(&self, goal: NodeId) -> Vec<Point> {
        let mut path: Vec<Point> = std::iter::successors(Some(goal), |&id| self.pool[id].parent)
            .map(|id| self.pool[id].cell)
            .collect();
        path.reverse();
        path
    }

    fn stats(&self, expanded: usize) -> SearchStats {
        SearchStats {
            expanded,
            closed: self.closed.len(),
            open: self.open.len(),
            pool_high_water: self.pool.in_use(),
        }
    }
}

/// A* search over a grid described by a [BlockedOracle].
///
/// Orthogonal steps cost [STRAIGHT_COST] and diagonal steps [SLANT_COST]. Diagonal steps are
/// only taken when both orthogonal cells sharing an edge with the move are free, so a path
/// never squeezes between two blocked corners.
pub struct AStar<O, D = NoopObserver> {
    oracle: O,
    config: SearchConfig,
    observer: D,
    state: SearchState,
    last_stats: SearchStats,
}

impl<O: BlockedOracle> AStar<O, NoopObserver> {
    pub fn new(oracle: O, config: SearchConfig) -> Self {
        AStar::with_observer(oracle, config, NoopObserver)
    }
}

impl<O: BlockedOracle, D: SearchObserver> AStar<O, D> {
    pub fn with_observer(oracle: O, config: SearchConfig, observer: D) -> Self {
        let state = SearchState::new(&config);
        AStar {
            oracle,
            config,
            observer,
            state,
            last_stats: SearchStats::default(),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn observer(&self) -> &D {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut D {
        &mut self.observer
    }

    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Estimated cost between two cells: Manhattan distance for orthogonal movement, octile
    /// distance when diagonal moves are allowed. Both never overestimate the true cost under
    /// their movement policy.
    pub fn heuristic(&self, from: &Point, to: &Point) -> i32 {
        if self.config.allow_diagonal_movement {
            octile_cost(from, to)
        } else {
            manhattan_cost(from, to)
        }
    }

    /// Computes a shortest path from `start` to `goal`, both included.
    ///
    /// Returns `Ok(None)` when either end is blocked, when `start == goal` or when the goal
    /// cannot be reached. The only error is running out of pool nodes.
    ///
    /// Panics if `start` or `goal` lies outside the range supported by [CellKey].
    pub fn find_path(
        &mut self,
        start: Point,
        goal: Point,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        assert!(
            CellKey::supports(start.x, start.y) && CellKey::supports(goal.x, goal.y),
            "start {} or goal {} outside the supported coordinate range",
            start,
            goal
        );
        if self.oracle.is_blocked(start.x, start.y) {
            debug!("Start {} is blocked", start);
            return Ok(None);
        }
        if self.oracle.is_blocked(goal.x, goal.y) {
            debug!("Goal {} is blocked", goal);
            return Ok(None);
        }
        if start == goal {
            debug!("Start and goal are both {}, nothing to do", start);
            return Ok(None);
        }

        trace!("Searching from {} to {}", start, goal);
        self.observer.on_search_start();
        let result = self.search(start, goal);
        if let Err(e) = &result {
            warn!("Search from {} to {} aborted: {}", start, goal, e);
        }
        self.state.reset_for_new_search();
        result
    }

    /// Free neighbours of `cell` with their step cost. Diagonal neighbours need both shoulders
    /// free. Cells outside the [CellKey] range count as blocked; the shoulders of an in-range
    /// diagonal neighbour are in range too.
    fn successors(&self, cell: &Point) -> SmallVec<[(Point, i32); 8]> {
        let directions = if self.config.allow_diagonal_movement {
            &DIRECTIONS[..]
        } else {
            &DIRECTIONS[..ORTHOGONAL_DIRECTIONS]
        };
        directions
            .iter()
            .filter(|&&(dx, dy)| {
                let (nx, ny) = (cell.x + dx, cell.y + dy);
                CellKey::supports(nx, ny)
                    && !self.oracle.is_blocked(nx, ny)
                    && (dx == 0
                        || dy == 0
                        || !(self.oracle.is_blocked(nx, cell.y)
                            || self.oracle.is_blocked(cell.x, ny)))
            })
            .map(|&(dx, dy)| {
                let cost = if dx != 0 && dy != 0 {
                    SLANT_COST
                } else {
                    STRAIGHT_COST
                };
                (Point::new(cell.x + dx, cell.y + dy), cost)
            })
            .collect()
    }

    fn search(&mut self, start: Point, goal: Point) -> Result<Option<Vec<Point>>, SearchError> {
        let start_id = self.state.pool.acquire(start)?;
        {
            let h = self.heuristic(&start, &goal);
            let node = &mut self.state.pool[start_id];
            node.h = h;
            node.f = h;
        }
        self.state.push_open(CellKey::from_cell(&start), start_id);

        let mut expanded = 0;
        while let Some(entry) = self.state.open_queue.pop() {
            let (cell, g) = {
                let node = &self.state.pool[entry.node];
                if node.closed || entry.f > node.f {
                    continue;
                }
                (node.cell, node.g)
            };
            let key = CellKey::from_cell(&cell);
            self.state.open.swap_remove(&key);
            self.state.closed.insert(key, cell);
            self.state.pool[entry.node].closed = true;
            expanded += 1;

            if cell == goal {
                let path = self.state.reconstruct(entry.node);
                self.last_stats = self.state.stats(expanded);
                debug!(
                    "Found path of {} cells from {} to {} (cost {}, {} expanded)",
                    path.len(),
                    start,
                    goal,
                    g,
                    expanded
                );
                self.report_success(&path);
                return Ok(Some(path));
            }

            for (neighbour, step) in self.successors(&cell) {
                let neighbour_key = CellKey::from_cell(&neighbour);
                if self.state.closed.contains_key(&neighbour_key) {
                    continue;
                }
                let tentative_g = g + step;
                match self.state.open.get(&neighbour_key).copied() {
                    Some(id) => {
                        let node = &mut self.state.pool[id];
                        // Relax on strictly lower g; h is fixed per cell so this equals comparing f.
                        if tentative_g < node.g {
                            node.g = tentative_g;
                            node.f = tentative_g + node.h;
                            node.parent = Some(entry.node);
                            self.state.push_open(neighbour_key, id);
                        }
                    }
                    None => {
                        let h = self.heuristic(&neighbour, &goal);
                        let id = self.state.pool.acquire(neighbour)?;
                        let node = &mut self.state.pool[id];
                        node.g = tentative_g;
                        node.h = h;
                        node.f = tentative_g + h;
                        node.parent = Some(entry.node);
                        self.state.push_open(neighbour_key, id);
                    }
                }
            }
        }

        self.last_stats = self.state.stats(expanded);
        debug!(
            "No path from {} to {} ({} cells closed)",
            start,
            goal,
            self.state.closed.len()
        );
        if self.observer.enabled() {
            let closed: Vec<Point> = self.state.closed.values().copied().collect();
            self.observer.on_closed_set(&closed);
        }
        Ok(None)
    }

    fn report_success(&mut self, path: &[Point]) {
        if !self.observer.enabled() {
            return;
        }
        let closed: Vec<Point> = self.state.closed.values().copied().collect();
        self.observer.on_closed_set(&closed);
        let open: Vec<Point> = self
            .state
            .open
            .values()
            .map(|&id| self.state.pool[id].cell)
            .collect();
        self.observer.on_open_set(&open);
        self.observer.on_path(path);
    }

    /// Smooths `path` in place against this engine's oracle. See [PathSmoother].
    pub fn smooth(&self, path: &mut Vec<Point>, unit_radius: f32) {
        PathSmoother::with_unit_radius(&self.oracle, unit_radius).smooth(path);
    }

    /// Convenience for [find_path](Self::find_path) followed by [smooth](Self::smooth).
    pub fn find_smoothed_path(
        &mut self,
        start: Point,
        goal: Point,
        unit_radius: f32,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        let mut path = match self.find_path(start, goal)? {
            Some(path) => path,
            None => return Ok(None),
        };
        self.smooth(&mut path, unit_radius);
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_COORD_MAX;
    use crate::{path_cost, BlockGrid};
    use grid_util::grid::ValueGrid;

    #[derive(Default)]
    struct Recorder {
        starts: usize,
        closed: Vec<Point>,
        open: Vec<Point>,
        path: Vec<Point>,
    }

    impl SearchObserver for Recorder {
        fn on_search_start(&mut self) {
            self.starts += 1;
        }
        fn on_closed_set(&mut self, cells: &[Point]) {
            self.closed = cells.to_vec();
        }
        fn on_open_set(&mut self, cells: &[Point]) {
            self.open = cells.to_vec();
        }
        fn on_path(&mut self, cells: &[Point]) {
            self.path = cells.to_vec();
        }
    }

    fn engine(block_grid: BlockGrid, diagonal: bool) -> AStar<BlockGrid> {
        AStar::new(block_grid, SearchConfig::with_diagonal(diagonal))
    }

    fn assert_connected(path: &[Point], diagonal: bool) {
        for w in path.windows(2) {
            let (dx, dy) = ((w[1].x - w[0].x).abs(), (w[1].y - w[0].y).abs());
            assert!(dx <= 1 && dy <= 1 && dx + dy > 0);
            if !diagonal {
                assert_eq!(dx + dy, 1);
            }
        }
    }

    /// 5x5 open grid, orthogonal movement, along the bottom row.
    #[test]
    fn straight_line_orthogonal() {
        let mut astar = engine(BlockGrid::new(5, 5, false), false);
        let path = astar
            .find_path(Point::new(0, 0), Point::new(4, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path_cost(&path), 40);
        assert_eq!(path[0], Point::new(0, 0));
        assert_eq!(path[4], Point::new(4, 0));
        assert_connected(&path, false);
    }

    /// A single wall cell in the way forces a detour of two diagonals and two straights.
    #[test]
    fn detour_around_single_block() {
        let mut block_grid = BlockGrid::new(5, 5, false);
        block_grid.set(2, 0, true);
        let mut astar = engine(block_grid, true);
        let path = astar
            .find_path(Point::new(0, 0), Point::new(4, 0))
            .unwrap()
            .unwrap();
        assert!(!path.contains(&Point::new(2, 0)));
        assert_eq!(path_cost(&path), 2 * STRAIGHT_COST + 2 * SLANT_COST);
        assert_connected(&path, true);
    }

    #[test]
    fn same_cell_is_no_path() {
        let mut astar = engine(BlockGrid::new(3, 3, false), true);
        assert_eq!(astar.find_path(Point::new(1, 1), Point::new(1, 1)), Ok(None));
    }

    #[test]
    fn blocked_endpoints_are_no_path() {
        let mut block_grid = BlockGrid::new(3, 3, false);
        block_grid.set(2, 2, true);
        let mut astar = engine(block_grid, true);
        assert_eq!(astar.find_path(Point::new(0, 0), Point::new(2, 2)), Ok(None));
        assert_eq!(astar.find_path(Point::new(2, 2), Point::new(0, 0)), Ok(None));
        assert_eq!(astar.find_path(Point::new(0, 0), Point::new(-1, 0)), Ok(None));
        assert_eq!(astar.last_stats(), SearchStats::default());
    }

    #[test]
    fn enclosed_start_is_no_path() {
        // |.....|
        // |.###.|
        // |.#S#.|
        // |.###.|
        // |.....|
        let block_grid = BlockGrid::from_ascii(
            "
            .....
            .###.
            .#.#.
            .###.
            .....
            ",
        );
        let mut astar = engine(block_grid, false);
        assert_eq!(astar.find_path(Point::new(2, 2), Point::new(0, 0)), Ok(None));
        assert_eq!(astar.last_stats().expanded, 1);
    }

    /// The diagonal between two blocked shoulders must not be taken.
    #[test]
    fn no_corner_cutting() {
        //  __
        // |.#|
        // |#.|
        //  __
        let block_grid = BlockGrid::from_ascii(".#\n#.");
        let mut astar = engine(block_grid, true);
        assert_eq!(astar.find_path(Point::new(0, 0), Point::new(1, 1)), Ok(None));
    }

    /// One blocked shoulder is enough to forbid the diagonal.
    #[test]
    fn single_shoulder_blocks_diagonal() {
        let block_grid = BlockGrid::from_ascii("..\n#.");
        let mut astar = engine(block_grid, true);
        let path = astar
            .find_path(Point::new(0, 0), Point::new(1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(
            path,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]
        );
    }

    #[test]
    fn diagonal_switch() {
        let mut astar = engine(BlockGrid::new(4, 4, false), true);
        let path = astar
            .find_path(Point::new(0, 0), Point::new(3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path_cost(&path), 3 * SLANT_COST);

        let mut astar = engine(BlockGrid::new(4, 4, false), false);
        let path = astar
            .find_path(Point::new(0, 0), Point::new(3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path_cost(&path), 6 * STRAIGHT_COST);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let block_grid = BlockGrid::from_ascii(
            "
            ..........
            .####.....
            ....#..#..
            ..#.#..#..
            ..#....#..
            ",
        );
        let mut astar = engine(block_grid, true);
        let first = astar.find_path(Point::new(0, 4), Point::new(9, 0)).unwrap();
        assert!(first.is_some());
        for _ in 0..5 {
            assert_eq!(
                astar.find_path(Point::new(0, 4), Point::new(9, 0)).unwrap(),
                first
            );
        }
    }

    #[test]
    fn state_is_released_between_searches() {
        let mut astar = engine(BlockGrid::new(8, 8, false), true);
        astar
            .find_path(Point::new(0, 0), Point::new(7, 7))
            .unwrap()
            .unwrap();
        assert!(astar.state.open.is_empty());
        assert!(astar.state.closed.is_empty());
        assert!(astar.state.open_queue.is_empty());
        assert_eq!(astar.state.pool.in_use(), 0);
        assert_eq!(astar.state.pool.generation(), 1);
    }

    #[test]
    fn pool_cap_aborts_search() {
        let config = SearchConfig::with_diagonal(false).with_pool_max_size(5);
        let mut astar = AStar::new(BlockGrid::new(10, 10, false), config);
        assert_eq!(
            astar.find_path(Point::new(0, 0), Point::new(9, 9)),
            Err(SearchError::PoolExhausted { capacity: 5 })
        );
        assert_eq!(astar.state.pool.in_use(), 0);
        assert!(astar.state.open.is_empty());
        // A short search still fits and the engine is usable afterwards.
        let path = astar
            .find_path(Point::new(0, 0), Point::new(1, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn closure_oracle() {
        // Unbounded plane with a wall at x == 3 for y < 5.
        let wall = |x: i32, y: i32| x == 3 && y < 5;
        let mut astar = AStar::new(wall, SearchConfig::with_diagonal(false));
        let path = astar
            .find_path(Point::new(0, 0), Point::new(6, 0))
            .unwrap()
            .unwrap();
        assert!(path.iter().all(|p| !wall(p.x, p.y)));
        assert_eq!(path_cost(&path), (6 + 2 * 5) * STRAIGHT_COST);
    }

    /// An unbounded oracle never leads the search past the largest supported coordinate.
    #[test]
    fn key_range_edge_is_a_wall() {
        let edge = KEY_COORD_MAX;
        let wall = move |x: i32, y: i32| x == edge - 1 && (1..=4).contains(&y);
        for diagonal in [false, true] {
            let mut astar = AStar::new(wall, SearchConfig::with_diagonal(diagonal));
            let path = astar
                .find_path(Point::new(edge, 0), Point::new(edge, 5))
                .unwrap()
                .unwrap();
            assert!(path.iter().all(|p| CellKey::supports(p.x, p.y)));
            assert!(path.iter().all(|p| !wall(p.x, p.y)));
            assert_eq!(path_cost(&path), 5 * STRAIGHT_COST);

            let path = astar
                .find_path(Point::new(edge - 2, 2), Point::new(edge, 2))
                .unwrap()
                .unwrap();
            assert!(path.iter().all(|p| p.x <= edge));
        }
    }

    #[test]
    fn observer_sees_search() {
        let block_grid = BlockGrid::from_ascii(
            "
            .....
            ..#..
            ..#..
            .....
            ",
        );
        let mut astar = AStar::with_observer(block_grid, SearchConfig::default(), Recorder::default());
        let path = astar
            .find_path(Point::new(0, 1), Point::new(4, 1))
            .unwrap()
            .unwrap();
        let recorder = astar.observer();
        assert_eq!(recorder.starts, 1);
        assert_eq!(recorder.path, path);
        assert!(recorder.closed.contains(&Point::new(0, 1)));
        assert!(recorder.closed.contains(&Point::new(4, 1)));
        for p in &recorder.open {
            assert!(!recorder.closed.contains(p));
        }
        assert_eq!(recorder.closed.len(), astar.last_stats().closed);
        assert_eq!(recorder.open.len(), astar.last_stats().open);

        // Precondition failures never reach the observer.
        astar.find_path(Point::new(2, 1), Point::new(0, 0)).unwrap();
        assert_eq!(astar.observer().starts, 1);
    }

    #[test]
    fn observer_does_not_change_result() {
        let block_grid = BlockGrid::from_ascii(
            "
            ......
            .##.#.
            ...#..
            .#....
            ",
        );
        let mut plain = AStar::new(block_grid.clone(), SearchConfig::with_diagonal(true));
        let mut observed = AStar::with_observer(
            block_grid,
            SearchConfig::with_diagonal(true),
            Recorder::default(),
        );
        let a = plain.find_path(Point::new(0, 0), Point::new(5, 3)).unwrap();
        let b = observed.find_path(Point::new(0, 0), Point::new(5, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn find_smoothed_path_keeps_ends() {
        let mut astar = engine(BlockGrid::new(6, 6, false), true);
        let path = astar
            .find_smoothed_path(Point::new(0, 0), Point::new(5, 2), 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(path, vec![Point::new(0, 0), Point::new(5, 2)]);
    }

    #[test]
    fn lowest_score_ordering() {
        let mut pool = NodePool::new(1, usize::MAX);
        let id = pool.acquire(Point::new(0, 0)).unwrap();
        let e = |f, h, seq| OpenEntry { f, h, seq, node: id };
        assert_eq!(LowestScore.compare(&e(10, 5, 0), &e(11, 0, 0)), Ordering::Less);
        assert_eq!(LowestScore.compare(&e(10, 5, 0), &e(10, 4, 9)), Ordering::Greater);
        assert_eq!(LowestScore.compare(&e(10, 4, 1), &e(10, 4, 2)), Ordering::Less);
    }
}
