use maze_core::{MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::queue::OpenQueue;
use crate::search::Core;
use crate::step::{SolveEvent, Step, Stepper};
use crate::traits::{Pather, WeightedPather};

/// Uniform-cost relaxation ordered by accumulated distance.
///
/// Edge costs come from [`WeightedPather::cost`], so the search stays correct
/// if costs ever become non-uniform. Each `advance` settles one cell.
pub struct DijkstraSearch {
    core: Core,
    open: OpenQueue,
    closed: Vec<bool>,
    nbuf: Vec<Point>,
    started: bool,
    reached: Option<usize>,
}

impl DijkstraSearch {
    pub fn new(maze: &MazeGrid) -> Self {
        let core = Core::new(maze, Algorithm::Dijkstra);
        let len = core.maze.len();
        Self {
            core,
            open: OpenQueue::new(),
            closed: vec![false; len],
            nbuf: Vec::with_capacity(4),
            started: false,
            reached: None,
        }
    }

    /// Next entry that is neither settled nor superseded by a cheaper push.
    fn pop_live(&mut self) -> Option<(usize, i32)> {
        while let Some((ci, d)) = self.open.pop() {
            if self.closed[ci] || d > self.core.weights.get(ci) {
                continue;
            }
            return Some((ci, d));
        }
        None
    }
}

impl Stepper for DijkstraSearch {
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
            self.core.weights.set(si, 0);
            self.open.push(si, 0);
            return self.core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        if let Some(gi) = self.reached {
            let path = self.core.trace(gi);
            return self.core.found(path);
        }
        let Some((ci, dist)) = self.pop_live() else {
            return self.core.no_path();
        };
        self.closed[ci] = true;
        let core = &mut self.core;
        let cp = core.point(ci);
        if core.maze.is_goal(cp) {
            self.reached = Some(ci);
        } else {
            self.nbuf.clear();
            core.maze.neighbors(cp, &mut self.nbuf);
            for &np in self.nbuf.iter() {
                let Some(ni) = core.idx(np) else {
                    continue;
                };
                if self.closed[ni] {
                    continue;
                }
                let nd = dist + core.maze.cost(cp, np);
                if nd >= core.weights.get(ni) {
                    continue;
                }
                core.weights.set(ni, nd);
                core.parent[ni] = ci;
                self.open.push(ni, nd);
            }
        }
        core.emit(SolveEvent::Searching { at: cp, val: dist })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
    }
}
