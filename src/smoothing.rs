//! String-pulling for grid paths.
//!
//! A path is first reduced to its turning points, then waypoints are dropped wherever a straight
//! segment between two earlier and later waypoints touches no blocked cell. Cells are unit
//! squares `[x, x + 1) x [y, y + 1)` and segments run between cell centers. Every grid-line
//! crossing is computed with [Fraction], so a segment through a lattice vertex is always
//! detected as such and all four cells meeting there are tested.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use itertools::Itertools;
use log::trace;

use crate::fraction::Fraction;
use crate::oracle::BlockedOracle;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Radii are quantized to this many steps per cell.
const RADIUS_RESOLUTION: i64 = 1000;
/// Largest accepted unit radius in cells. Larger radii are clamped to it.
pub const MAX_UNIT_RADIUS: i64 = 256;

/// Removes waypoints from paths on the grid of a [BlockedOracle].
///
/// With no unit radius a segment is walkable when none of the cells it touches is blocked. With
/// a unit radius `r > 0` every cell whose center lies within `r` of the segment must be free
/// as well. Distances are measured to cell centers, not cell edges: a unit of radius `0.9`
/// passes a wall whose cell centers are a full cell away even though the wall's edge is only
/// half a cell away.
#[derive(Clone, Copy, Debug)]
pub struct PathSmoother<'a, O: ?Sized> {
    oracle: &'a O,
    unit_radius: Option<Fraction>,
}

impl<'a, O: BlockedOracle + ?Sized> PathSmoother<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        PathSmoother {
            oracle,
            unit_radius: None,
        }
    }

    /// `unit_radius` is measured in cells from the segment to cell centers, quantized to a
    /// thousandth of a cell and clamped to [MAX_UNIT_RADIUS]. Zero, negative or NaN radii select
    /// the exact-touch test.
    pub fn with_unit_radius(oracle: &'a O, unit_radius: f32) -> Self {
        let scaled = (unit_radius as f64 * RADIUS_RESOLUTION as f64).round();
        let unit_radius = (scaled > 0.0).then(|| {
            let scaled = scaled.min((MAX_UNIT_RADIUS * RADIUS_RESOLUTION) as f64);
            Fraction::new(scaled as i64, RADIUS_RESOLUTION)
        });
        PathSmoother {
            oracle,
            unit_radius,
        }
    }

    pub fn unit_radius(&self) -> Option<Fraction> {
        self.unit_radius
    }

    /// Simplifies `path` in place. The result is a subsequence of the input with the same
    /// endpoints, and smoothing it again leaves it unchanged.
    pub fn smooth(&self, path: &mut Vec<Point>) {
        if path.len() <= 2 {
            return;
        }
        let input_len = path.len();
        loop {
            let before = path.len();
            remove_collinear(path);
            self.pull_strings(path);
            if path.len() == before {
                break;
            }
        }
        trace!("Smoothed path from {} to {} waypoints", input_len, path.len());
    }

    /// Copying variant of [smooth](Self::smooth).
    pub fn smoothed(&self, path: &[Point]) -> Vec<Point> {
        let mut out = path.to_vec();
        self.smooth(&mut out);
        out
    }

    /// Checks whether the straight segment between the centers of `a` and `b` is clear.
    pub fn walkable(&self, a: Point, b: Point) -> bool {
        self.checked_cells(a, b)
            .iter()
            .all(|p| !self.oracle.is_blocked(p.x, p.y))
    }

    /// Every cell [walkable](Self::walkable) consults for the segment from `a` to `b`.
    pub fn cells_checked(&self, a: Point, b: Point) -> Vec<Point> {
        self.checked_cells(a, b).into_iter().collect()
    }

    fn checked_cells(&self, a: Point, b: Point) -> FxIndexSet<Point> {
        let mut cells = FxIndexSet::default();
        supercover_into(a, b, &mut cells);
        if let Some(radius) = self.unit_radius {
            clearance_into(a, b, radius, &mut cells);
        }
        cells
    }

    /// For each waypoint from the back, jumps to the earliest waypoint it can see and drops
    /// everything in between.
    fn pull_strings(&self, path: &mut Vec<Point>) {
        let mut i = path.len() - 1;
        while i >= 2 {
            match (0..i - 1).find(|&j| self.walkable(path[j], path[i])) {
                Some(j) => {
                    path.drain(j + 1..i);
                    i = j;
                }
                None => i -= 1,
            }
        }
    }
}

/// Step direction reduced to its primitive vector, so `(2, 4)` and `(1, 2)` compare equal.
fn direction(from: &Point, to: &Point) -> (i32, i32) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let mut a = dx.abs();
    let mut b = dy.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    if a == 0 {
        (0, 0)
    } else {
        (dx / a, dy / a)
    }
}

/// Drops every interior waypoint whose incoming and outgoing directions are equal, along with
/// repeated waypoints. Afterwards no three consecutive waypoints lie on one line in the same
/// direction.
pub fn remove_collinear(path: &mut Vec<Point>) {
    if path.len() <= 2 {
        return;
    }
    let mut kept: Vec<Point> = Vec::with_capacity(path.len());
    kept.push(path[0]);
    for (cur, next) in path.iter().skip(1).tuple_windows() {
        let prev = kept[kept.len() - 1];
        if prev == *cur || cur == next || direction(&prev, cur) == direction(cur, next) {
            continue;
        }
        kept.push(*cur);
    }
    kept.push(path[path.len() - 1]);
    *path = kept;
}

/// All cells touched by the segment between the centers of `a` and `b`, endpoints included.
/// Where the segment passes exactly through a grid corner, all four cells sharing that corner
/// are reported.
pub fn supercover(a: Point, b: Point) -> Vec<Point> {
    let mut cells = FxIndexSet::default();
    supercover_into(a, b, &mut cells);
    cells.into_iter().collect()
}

fn insert_corner(cells: &mut FxIndexSet<Point>, x: i32, y: i32) {
    cells.insert(Point::new(x - 1, y - 1));
    cells.insert(Point::new(x, y - 1));
    cells.insert(Point::new(x - 1, y));
    cells.insert(Point::new(x, y));
}

fn supercover_into(a: Point, b: Point, cells: &mut FxIndexSet<Point>) {
    cells.insert(a);
    cells.insert(b);
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));

    if a.x == b.x {
        for y in min_y..=max_y {
            cells.insert(Point::new(a.x, y));
        }
        return;
    }
    if a.y == b.y {
        for x in min_x..=max_x {
            cells.insert(Point::new(x, a.y));
        }
        return;
    }

    // y = k * x + intercept through both centers.
    let half = Fraction::new(1, 2);
    let k = Fraction::new((b.y - a.y) as i64, (b.x - a.x) as i64);
    let intercept = (Fraction::from(a.y) + half) - k * (Fraction::from(a.x) + half);

    // Grid lines strictly between the two centers: x = min_x + 1 ..= max_x is the left edge of
    // each column after the first, and likewise for rows.
    for gx in (min_x + 1)..=max_x {
        let y = k * Fraction::from(gx) + intercept;
        let row = y.floor() as i32;
        if y.is_integer() {
            insert_corner(cells, gx, row);
        } else {
            cells.insert(Point::new(gx - 1, row));
            cells.insert(Point::new(gx, row));
        }
    }
    for gy in (min_y + 1)..=max_y {
        let x = (Fraction::from(gy) - intercept) / k;
        let col = x.floor() as i32;
        if x.is_integer() {
            insert_corner(cells, col, gy);
        } else {
            cells.insert(Point::new(col, gy - 1));
            cells.insert(Point::new(col, gy));
        }
    }
}

/// Adds every cell whose center is within `radius` of the segment between the centers of `a`
/// and `b`. Works in doubled coordinates so that centers are integers and compares squared
/// distances, which keeps the test exact.
fn clearance_into(a: Point, b: Point, radius: Fraction, cells: &mut FxIndexSet<Point>) {
    let reach = -((-radius).floor()) as i32;
    let (px, py) = (2 * a.x as i64 + 1, 2 * a.y as i64 + 1);
    let (qx, qy) = (2 * b.x as i64 + 1, 2 * b.y as i64 + 1);
    let (dx, dy) = (qx - px, qy - py);
    let len2 = (dx * dx + dy * dy) as i128;
    // (2r)^2 as numer / denom.
    let limit_numer = 4 * radius.numer() as i128 * radius.numer() as i128;
    let limit_denom = radius.denom() as i128 * radius.denom() as i128;

    for y in (a.y.min(b.y) - reach)..=(a.y.max(b.y) + reach) {
        for x in (a.x.min(b.x) - reach)..=(a.x.max(b.x) + reach) {
            let (cx, cy) = (2 * x as i64 + 1, 2 * y as i64 + 1);
            let (wx, wy) = (cx - px, cy - py);
            let along = (wx * dx + wy * dy) as i128;
            // Squared doubled distance as dist_numer / dist_denom.
            let (dist_numer, dist_denom) = if len2 == 0 || along <= 0 {
                ((wx * wx + wy * wy) as i128, 1)
            } else if along >= len2 {
                let (ux, uy) = (cx - qx, cy - qy);
                ((ux * ux + uy * uy) as i128, 1)
            } else {
                let cross = (dx * wy - dy * wx) as i128;
                (cross * cross, len2)
            };
            if dist_numer * limit_denom <= limit_numer * dist_denom {
                cells.insert(Point::new(x, y));
            }
        }
    }
}
