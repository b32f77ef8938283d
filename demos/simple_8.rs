use grid_astar::{AStar, BlockGrid, SearchConfig};
use grid_util::point::Point;

// In this example a path is found on a 5x4 grid with shape
//  _____
// |S  # |
// | # # |
// | #   |
// |   #E|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have an 8-neighborhood, but diagonal steps may not cut past an obstacle.

fn main() {
    let block_grid = BlockGrid::from_ascii(
        "
        ...#.
        .#.#.
        .#...
        ...#.
        ",
    );
    let start = Point::new(0, 0);
    let end = Point::new(4, 3);
    let mut astar = AStar::new(block_grid, SearchConfig::with_diagonal(true));
    match astar.find_path(start, end) {
        Ok(Some(path)) => {
            println!("{}", astar.oracle().render_path(&path));
            println!("Cost: {}", grid_astar::path_cost(&path));
            println!("Stats: {:?}", astar.last_stats());
        }
        Ok(None) => println!("No path from {} to {}", start, end),
        Err(e) => println!("Search failed: {}", e),
    }
}
