//! # grid_astar
//!
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on integer grids whose
//! obstacles are described by a [BlockedOracle], which can be a closure over any world
//! representation or the bundled [BlockGrid]. Movement is 4- or 8-connected with integer step
//! costs of [STRAIGHT_COST] and [SLANT_COST]; diagonal moves never cut blocked corners.
//!
//! Found paths can be post-processed by a [PathSmoother], which removes waypoints wherever a
//! straight segment touches no blocked cell. Line-of-sight is computed with exact rational
//! arithmetic ([Fraction]), so segments passing exactly through a grid corner are handled
//! correctly.
//!
//! Search state (the open and closed sets and a [NodePool] of search nodes) is owned by the
//! [AStar] engine and reused between queries.
pub mod astar;
pub mod block_grid;
pub mod config;
pub mod error;
pub mod fraction;
pub mod key;
pub mod observer;
pub mod oracle;
pub mod pool;
pub mod pqueue;
pub mod smoothing;

use itertools::Itertools;

pub use crate::astar::{AStar, LowestScore, OpenEntry, SearchStats};
pub use crate::block_grid::BlockGrid;
pub use crate::config::SearchConfig;
pub use crate::error::SearchError;
pub use crate::fraction::Fraction;
pub use crate::key::CellKey;
pub use crate::observer::{NoopObserver, SearchObserver};
pub use crate::oracle::BlockedOracle;
pub use crate::pool::{NodeId, NodePool, SearchNode};
pub use crate::pqueue::{Comparator, NaturalOrder, PriorityQueue};
pub use crate::smoothing::{remove_collinear, supercover, PathSmoother, MAX_UNIT_RADIUS};
pub use grid_util::point::Point;

/// A grid cell; `x` grows to the right and `y` downward.
pub type Cell = Point;

/// Cost of an orthogonal step.
pub const STRAIGHT_COST: i32 = 10;
/// Cost of a diagonal step, roughly `10 * sqrt(2)`.
pub const SLANT_COST: i32 = 14;

/// Manhattan distance scaled by [STRAIGHT_COST].
pub fn manhattan_cost(a: &Point, b: &Point) -> i32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) * STRAIGHT_COST
}

/// Cost of the cheapest 8-connected walk between two cells on an empty grid.
pub fn octile_cost(a: &Point, b: &Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    SLANT_COST * lo + STRAIGHT_COST * (hi - lo)
}

/// Total cost of a path. Consecutive cells that are neighbours cost one step; longer segments,
/// as left by smoothing, are charged their [octile_cost].
pub fn path_cost(path: &[Point]) -> i32 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| octile_cost(a, b))
        .sum()
}
