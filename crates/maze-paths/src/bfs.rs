use std::collections::VecDeque;

use maze_core::{MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::search::Core;
use crate::step::{SolveEvent, Step, Stepper};
use crate::traits::Pather;

/// Level-order search outward from the start.
///
/// The first goal dequeued ends the search; its parent chain is a shortest
/// path. Weights are hop distances from the start. Serves both `bfs` and
/// `flood_start`.
pub struct BfsSearch {
    core: Core,
    queue: VecDeque<usize>,
    nbuf: Vec<Point>,
    started: bool,
    reached: Option<usize>,
}

impl BfsSearch {
    pub fn new(maze: &MazeGrid, algorithm: Algorithm) -> Self {
        Self {
            core: Core::new(maze, algorithm),
            queue: VecDeque::new(),
            nbuf: Vec::with_capacity(4),
            started: false,
            reached: None,
        }
    }
}

impl Stepper for BfsSearch {
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
            core.weights.set(si, 0);
            self.queue.push_back(si);
            return core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        if let Some(gi) = self.reached {
            let path = core.trace(gi);
            return core.found(path);
        }
        let Some(ci) = self.queue.pop_front() else {
            return core.no_path();
        };
        let cp = core.point(ci);
        let dist = core.weights.get(ci);
        if core.maze.is_goal(cp) {
            self.reached = Some(ci);
        } else {
            self.nbuf.clear();
            core.maze.neighbors(cp, &mut self.nbuf);
            for &np in self.nbuf.iter() {
                let Some(ni) = core.idx(np) else {
                    continue;
                };
                if core.weights.reached(ni).is_some() {
                    continue;
                }
                core.weights.set(ni, dist + 1);
                core.parent[ni] = ci;
                self.queue.push_back(ni);
            }
        }
        core.emit(SolveEvent::Searching { at: cp, val: dist })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        self.core.algorithm
    }
}
