use maze_core::{MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::distance::nearest_goal;
use crate::search::Core;
use crate::step::{SolveEvent, Status, Step, Stepper};
use crate::traits::Pather;

/// Heuristic-only walk: from the current cell, step into the unvisited
/// neighbour closest (Manhattan) to a goal, ties in N, E, S, W order.
///
/// There is no backtracking. A cell with no unvisited neighbour ends the
/// walk with `no_path` even when a route exists elsewhere. The weight field
/// is the heuristic value of every cell.
pub struct GreedyWalk {
    core: Core,
    visited: Vec<bool>,
    trail: Vec<Point>,
    nbuf: Vec<Point>,
    started: bool,
}

impl GreedyWalk {
    pub fn new(maze: &MazeGrid) -> Self {
        let mut core = Core::new(maze, Algorithm::Manhattan);
        let goals = core.maze.goal_list();
        for i in 0..core.maze.len() {
            let h = nearest_goal(&core.maze, core.point(i), &goals);
            core.weights.set(i, h);
        }
        let len = core.maze.len();
        Self {
            core,
            visited: vec![false; len],
            trail: Vec::new(),
            nbuf: Vec::with_capacity(4),
            started: false,
        }
    }
}

impl Stepper for GreedyWalk {
    fn advance(&mut self) -> Step {
        if let Some(done) = self.core.done() {
            return done;
        }
        let core = &mut self.core;
        if !self.started {
            self.started = true;
            let start = core.maze.start();
            let Some(si) = core.idx(start) else {
                return core.no_path();
            };
            self.visited[si] = true;
            self.trail.push(start);
            let val = core.weights.get(si);
            return core.emit(SolveEvent::Start { at: start, val });
        }
        let Some(&here) = self.trail.last() else {
            return core.no_path();
        };
        if core.maze.is_goal(here) {
            let path = std::mem::take(&mut self.trail);
            return core.found(path);
        }

        self.nbuf.clear();
        core.maze.neighbors(here, &mut self.nbuf);
        let mut best: Option<(usize, i32)> = None;
        for &np in self.nbuf.iter() {
            let Some(ni) = core.idx(np) else {
                continue;
            };
            if self.visited[ni] {
                continue;
            }
            let h = core.weights.get(ni);
            if best.is_none_or(|(_, bh)| h < bh) {
                best = Some((ni, h));
            }
        }

        let Some((ni, h)) = best else {
            log::debug!("greedy walk cornered at {here}");
            let trail = std::mem::take(&mut self.trail);
            return core.finish(Status::NoPath, Vec::new(), trail);
        };
        self.visited[ni] = true;
        let next = core.point(ni);
        self.trail.push(next);
        core.emit(SolveEvent::Visit { at: next, val: h })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Manhattan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::step::{SolveConfig, solve};
    use maze_core::Dir;

    #[test]
    fn corridor_path() {
        let out = solve(&fixtures::corridor(), Algorithm::Manhattan, &SolveConfig::default());
        assert_eq!(out.status, Status::Found);
        assert_eq!(out.path, fixtures::corridor_path());
    }

    #[test]
    fn heat_map_covers_every_cell() {
        let maze = fixtures::corridor();
        let out = solve(&maze, Algorithm::Manhattan, &SolveConfig::default());
        assert_eq!(out.weights.reached_count(), maze.len());
        assert_eq!(out.weights.get(maze.index(Point::new(3, 0)).unwrap()), 6);
    }

    #[test]
    fn can_walk_into_a_trap() {
        // Goal at (2,1). From (0,1) the walk prefers (1,1), a dead end,
        // over the real route around the northern row.
        let mut maze = MazeGrid::new(3, 3);
        maze.toggle_wall(Point::new(0, 1), Dir::North);
        maze.toggle_wall(Point::new(0, 2), Dir::East);
        maze.toggle_wall(Point::new(1, 2), Dir::East);
        maze.toggle_wall(Point::new(2, 2), Dir::South);
        maze.toggle_wall(Point::new(0, 1), Dir::East);
        maze.toggle_goal(Point::new(2, 1));

        let bfs = solve(&maze, Algorithm::Bfs, &SolveConfig::default());
        assert!(bfs.is_found());

        let out = solve(&maze, Algorithm::Manhattan, &SolveConfig::default());
        assert_eq!(out.status, Status::NoPath);
        assert!(out.path.is_empty());
        assert_eq!(out.trail.last(), Some(&Point::new(1, 1)));
    }

    #[test]
    fn unreachable_goal() {
        let out = solve(&fixtures::ring(), Algorithm::Manhattan, &SolveConfig::default());
        assert_eq!(out.status, Status::NoPath);
    }
}
