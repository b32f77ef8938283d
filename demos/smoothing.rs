use grid_astar::{AStar, BlockGrid, PathSmoother, SearchConfig};
use grid_util::point::Point;

// A path around a single wall segment is found and then reduced to the waypoints needed
// to walk it in straight lines:
//  ________
// |S       |
// |        |
// |   #    |
// |   #    |
// |   #   E|
//  ________
//
// With a unit radius the smoother also keeps clear of cells whose center lies within that
// distance of a segment.

fn main() {
    let block_grid = BlockGrid::from_ascii(
        "
        ........
        ........
        ...#....
        ...#....
        ...#....
        ",
    );
    let start = Point::new(0, 0);
    let end = Point::new(7, 4);
    let mut astar = AStar::new(block_grid, SearchConfig::with_diagonal(true));
    let path = astar.find_path(start, end).unwrap().unwrap();
    println!("Grid path ({} cells):", path.len());
    println!("{}", astar.oracle().render_path(&path));

    for radius in [0.0, 0.5, 1.0] {
        let smoothed = PathSmoother::with_unit_radius(astar.oracle(), radius).smoothed(&path);
        println!("Unit radius {}: {:?}", radius, smoothed);
    }
}
