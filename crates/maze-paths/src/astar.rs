use maze_core::{MazeGrid, Point, UNREACHABLE, WeightField};

use crate::algorithm::Algorithm;
use crate::distance::nearest_goal;
use crate::queue::OpenQueue;
use crate::search::Core;
use crate::step::{SolveEvent, Step, Stepper};
use crate::traits::{Pather, WeightedPather};

/// A* ordered by `f = g + h`, with `h` the Manhattan distance to the nearest
/// goal. Equal `f` values pop in insertion order.
///
/// Weights hold the `f` value of every cell pushed so far.
pub struct AstarSearch {
    core: Core,
    goals: Vec<Point>,
    g: Vec<i32>,
    open: OpenQueue,
    closed: Vec<bool>,
    nbuf: Vec<Point>,
    started: bool,
    reached: Option<usize>,
}

impl AstarSearch {
    pub fn new(maze: &MazeGrid) -> Self {
        let core = Core::new(maze, Algorithm::AStar);
        let len = core.maze.len();
        Self {
            goals: core.maze.goal_list(),
            core,
            g: vec![UNREACHABLE; len],
            open: OpenQueue::new(),
            closed: vec![false; len],
            nbuf: Vec::with_capacity(4),
            started: false,
            reached: None,
        }
    }

    fn h(&self, p: Point) -> i32 {
        nearest_goal(&self.core.maze, p, &self.goals)
    }

    fn pop_live(&mut self) -> Option<(usize, i32)> {
        while let Some((ci, f)) = self.open.pop() {
            if self.closed[ci] || f > self.core.weights.get(ci) {
                continue;
            }
            return Some((ci, f));
        }
        None
    }
}

impl Stepper for AstarSearch {
    fn advance(&mut self) -> Step {
        if let Some(done) = self.core.done() {
            return done;
        }
        if !self.started {
            self.started = true;
            let start = self.core.maze.start();
            let Some(si) = self.core.idx(start) else {
                return self.core.no_path();
            };
            let f = self.h(start);
            self.g[si] = 0;
            self.core.weights.set(si, f);
            self.open.push(si, f);
            return self.core.emit(SolveEvent::Start { at: start, val: f });
        }
        if let Some(gi) = self.reached {
            let path = self.core.trace(gi);
            return self.core.found(path);
        }
        let Some((ci, f)) = self.pop_live() else {
            return self.core.no_path();
        };
        self.closed[ci] = true;
        let cp = self.core.point(ci);
        if self.core.maze.is_goal(cp) {
            self.reached = Some(ci);
            return self.core.emit(SolveEvent::Searching { at: cp, val: f });
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        self.core.maze.neighbors(cp, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = self.core.idx(np) else {
                continue;
            };
            if self.closed[ni] {
                continue;
            }
            let tentative_g = self.g[ci] + self.core.maze.cost(cp, np);
            if tentative_g >= self.g[ni] {
                continue;
            }
            let nf = tentative_g + self.h(np);
            self.g[ni] = tentative_g;
            self.core.weights.set(ni, nf);
            self.core.parent[ni] = ci;
            self.open.push(ni, nf);
        }
        self.nbuf = nbuf;

        self.core.emit(SolveEvent::Searching { at: cp, val: f })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }
}
