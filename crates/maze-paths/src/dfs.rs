use std::collections::VecDeque;

use maze_core::{MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::search::Core;
use crate::step::{SolveEvent, Status, Step, Stepper};
use crate::traits::Pather;

/// Push neighbours in reverse so the northern one is explored first.
fn push_order(nbuf: &mut [Point]) {
    nbuf.reverse();
}

/// Stack-based depth-first search.
///
/// A cell is marked on pop; stale duplicates on the stack are skipped. The
/// weight of a cell is its visit order.
pub struct DfsSearch {
    core: Core,
    stack: Vec<usize>,
    nbuf: Vec<Point>,
    order: i32,
    started: bool,
    reached: Option<usize>,
}

impl DfsSearch {
    pub fn new(maze: &MazeGrid) -> Self {
        Self {
            core: Core::new(maze, Algorithm::Dfs),
            stack: Vec::new(),
            nbuf: Vec::with_capacity(4),
            order: 0,
            started: false,
            reached: None,
        }
    }

    fn pop_unvisited(&mut self) -> Option<usize> {
        while let Some(ci) = self.stack.pop() {
            if self.core.weights.reached(ci).is_none() {
                return Some(ci);
            }
        }
        None
    }
}

impl Stepper for DfsSearch {
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
            self.stack.push(si);
            return self.core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        if let Some(gi) = self.reached {
            let path = self.core.trace(gi);
            return self.core.found(path);
        }
        let Some(ci) = self.pop_unvisited() else {
            return self.core.no_path();
        };
        let core = &mut self.core;
        let cp = core.point(ci);
        let val = self.order;
        self.order += 1;
        core.weights.set(ci, val);
        if core.maze.is_goal(cp) {
            self.reached = Some(ci);
        } else {
            self.nbuf.clear();
            core.maze.neighbors(cp, &mut self.nbuf);
            push_order(&mut self.nbuf);
            for &np in self.nbuf.iter() {
                let Some(ni) = core.idx(np) else {
                    continue;
                };
                if core.weights.reached(ni).is_some() {
                    continue;
                }
                core.parent[ni] = ci;
                self.stack.push(ni);
            }
        }
        core.emit(SolveEvent::Visit { at: cp, val })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Dfs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// First visit: explore outgoing edges.
    Enter,
    /// All children explored: announce the retreat.
    Leave,
}

/// Depth-first search that never descends into a known dead end.
///
/// Before a discovered neighbour is pushed, it is checked for exactly three
/// walls. A dead end that is not a goal is marked seen and reported as a
/// `backtrack` right away instead of being visited. Every visited cell is
/// pushed back with a [`Phase::Leave`] marker that emits its own `backtrack`
/// once its subtree is done.
pub struct PeekingDfs {
    core: Core,
    stack: Vec<(usize, Phase)>,
    seen: Vec<bool>,
    pruned: VecDeque<SolveEvent>,
    nbuf: Vec<Point>,
    order: i32,
    started: bool,
    reached: Option<usize>,
}

impl PeekingDfs {
    pub fn new(maze: &MazeGrid) -> Self {
        let core = Core::new(maze, Algorithm::DfsPeek);
        let len = core.maze.len();
        Self {
            core,
            stack: Vec::new(),
            seen: vec![false; len],
            pruned: VecDeque::new(),
            nbuf: Vec::with_capacity(4),
            order: 0,
            started: false,
            reached: None,
        }
    }

    fn enter(&mut self, ci: usize) -> Step {
        let core = &mut self.core;
        let cp = core.point(ci);
        if cp == core.maze.start() && core.maze.open_sides(cp).next().is_none() {
            return core.finish(Status::Stuck, Vec::new(), vec![cp]);
        }
        let val = self.order;
        self.order += 1;
        core.weights.set(ci, val);
        if core.maze.is_goal(cp) {
            self.reached = Some(ci);
            return core.emit(SolveEvent::Visit { at: cp, val });
        }

        self.stack.push((ci, Phase::Leave));
        self.nbuf.clear();
        core.maze.neighbors(cp, &mut self.nbuf);
        push_order(&mut self.nbuf);
        for &np in self.nbuf.iter() {
            let Some(ni) = core.idx(np) else {
                continue;
            };
            if self.seen[ni] {
                continue;
            }
            self.seen[ni] = true;
            core.parent[ni] = ci;
            if core.maze.walls_at(np).is_dead_end() && !core.maze.is_goal(np) {
                self.pruned.push_back(SolveEvent::Backtrack { at: np });
            } else {
                self.stack.push((ni, Phase::Enter));
            }
        }
        core.emit(SolveEvent::Visit { at: cp, val })
    }
}

impl Stepper for PeekingDfs {
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
            self.seen[si] = true;
            self.stack.push((si, Phase::Enter));
            return self.core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        if let Some(ev) = self.pruned.pop_front() {
            return self.core.emit(ev);
        }
        if let Some(gi) = self.reached {
            let path = self.core.trace(gi);
            return self.core.found(path);
        }
        match self.stack.pop() {
            Some((ci, Phase::Enter)) => self.enter(ci),
            Some((ci, Phase::Leave)) => {
                let at = self.core.point(ci);
                self.core.emit(SolveEvent::Backtrack { at })
            }
            None => self.core.no_path(),
        }
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::DfsPeek
    }
}
