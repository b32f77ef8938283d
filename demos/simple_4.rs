use grid_astar::{AStar, SearchConfig};
use grid_util::grid::ValueGrid;
use grid_util::point::Point;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let mut block_grid = grid_astar::BlockGrid::new(3, 3, false);
    block_grid.set(1, 1, true);
    println!("{}", block_grid);
    let start = Point::new(0, 0);
    let end = Point::new(2, 2);
    let mut astar = AStar::new(block_grid, SearchConfig::default());
    let path = astar.find_path(start, end).unwrap().unwrap();
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
