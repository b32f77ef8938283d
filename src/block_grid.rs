use crate::oracle::BlockedOracle;
use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;

/// A bounded occupancy grid that can serve as a [BlockedOracle]. Cells hold `true` when
/// blocked; everything outside the grid reports as blocked.
#[derive(Clone, Debug)]
pub struct BlockGrid {
    pub grid: BoolGrid,
}

impl Default for BlockGrid {
    fn default() -> BlockGrid {
        BlockGrid {
            grid: BoolGrid::default(),
        }
    }
}

impl BlockGrid {
    /// Builds a grid from rows of `#` (blocked) and any other character (free). The first line
    /// is `y = 0`; lines shorter than the longest one are padded with free cells.
    pub fn from_ascii(map: &str) -> BlockGrid {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut block_grid = BlockGrid::new(width, rows.len(), false);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                block_grid.set(x as i32, y as i32, c == '#');
            }
        }
        block_grid
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.index_in_bounds(x, y)
    }

    /// Number of blocked cells inside the grid.
    pub fn blocked_count(&self) -> usize {
        (0..self.grid.height as i32)
            .flat_map(|y| (0..self.grid.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.grid.get(x, y))
            .count()
    }

    /// Renders the grid with the given cells marked `*`, start `S` and end `G`.
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut out = String::new();
        for y in 0..self.grid.height as i32 {
            for x in 0..self.grid.width as i32 {
                let p = Point::new(x, y);
                let c = if path.first() == Some(&p) {
                    'S'
                } else if path.last() == Some(&p) {
                    'G'
                } else if path.contains(&p) {
                    '*'
                } else if self.grid.get(x, y) {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl BlockedOracle for BlockGrid {
    #[inline]
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.in_bounds(x, y) || self.grid.get(x, y)
    }
}

impl fmt::Display for BlockGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.height as i32 {
            let row = (0..self.grid.width as i32)
                .map(|x| if self.grid.get(x, y) { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl ValueGrid<bool> for BlockGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        BlockGrid {
            grid: BoolGrid::new(width, height, default_value),
        }
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        self.grid.set(x, y, blocked);
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}
