//! Small hand-built mazes shared by the solver tests.

use maze_core::{Dir, MazeGrid, Point};

/// 4x4, fully walled except a straight corridor from the start up the west
/// column to the goal at (0,3).
pub(crate) fn corridor() -> MazeGrid {
    let mut maze = MazeGrid::new(4, 4);
    maze.toggle_wall(Point::new(0, 1), Dir::North);
    maze.toggle_wall(Point::new(0, 2), Dir::North);
    maze.toggle_goal(Point::new(0, 3));
    maze
}

pub(crate) fn corridor_path() -> Vec<Point> {
    (0..4).map(|y| Point::new(0, y)).collect()
}

/// No interior walls apart from the start shape; goal in the north-east
/// corner.
pub(crate) fn open_field(w: i32, h: i32) -> MazeGrid {
    let mut maze = MazeGrid::new(w, h);
    maze.clear_interior();
    maze.toggle_goal(Point::new(w - 1, h - 1));
    maze
}

/// 5x5 open field whose goal at (4,4) is sealed on every side.
pub(crate) fn ring() -> MazeGrid {
    let mut maze = open_field(5, 5);
    let g = Point::new(4, 4);
    maze.toggle_wall(g, Dir::West);
    maze.toggle_wall(g, Dir::South);
    maze
}

/// 3x3 open field with the start on the top row, where it has no open side.
pub(crate) fn boxed() -> MazeGrid {
    let mut maze = MazeGrid::new(3, 3);
    maze.clear_interior();
    maze.set_start(Point::new(1, 2));
    maze.toggle_goal(Point::new(1, 0));
    maze
}
