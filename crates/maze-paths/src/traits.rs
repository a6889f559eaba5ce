use maze_core::{MazeGrid, Point};

use crate::distance::manhattan;

/// Minimal pathfinding interface: neighbour enumeration.
pub trait Pather {
    /// Append traversable neighbours of `p` into `buf` in N, E, S, W order.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// Pather with an admissible heuristic.
pub trait AstarPather: WeightedPather {
    /// Estimate of the distance from `from` to `to`. Must never overestimate.
    fn estimate(&self, from: Point, to: Point) -> i32;
}

impl Pather for MazeGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(self.open_sides(p).map(|d| p.step(d)));
    }
}

impl WeightedPather for MazeGrid {
    #[inline]
    fn cost(&self, _from: Point, _to: Point) -> i32 {
        1
    }
}

impl AstarPather for MazeGrid {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::Dir;

    #[test]
    fn neighbors_follow_open_sides() {
        let mut maze = MazeGrid::new(3, 3);
        let c = Point::new(1, 1);
        maze.toggle_wall(c, Dir::East);
        maze.toggle_wall(c, Dir::West);
        let mut buf = Vec::new();
        maze.neighbors(c, &mut buf);
        assert_eq!(buf, vec![Point::new(2, 1), Point::new(0, 1)]);
    }
}
