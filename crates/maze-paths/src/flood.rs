use std::collections::VecDeque;

use maze_core::{Dir, MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::search::Core;
use crate::step::{SolveEvent, Step, Stepper};
use crate::traits::Pather;

/// Multi-source breadth-first distance field.
///
/// Each step has cost 1. Cells not reachable from any source stay
/// unreached. Sources outside the grid are ignored.
pub fn distance_map<P: Pather>(pather: &P, maze: &MazeGrid, sources: &[Point]) -> WeightField {
    let mut field = WeightField::new(maze.len());
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &src in sources {
        let Some(si) = maze.index(src) else {
            continue;
        };
        if field.reached(si).is_some() {
            continue;
        }
        field.set(si, 0);
        queue.push_back(si);
    }

    let mut nbuf = Vec::with_capacity(4);
    while let Some(ci) = queue.pop_front() {
        let current = field.get(ci);
        let Some(cp) = maze.coord(ci) else {
            continue;
        };
        nbuf.clear();
        pather.neighbors(cp, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = maze.index(np) else {
                continue;
            };
            if field.reached(ni).is_some() {
                continue;
            }
            field.set(ni, current + 1);
            queue.push_back(ni);
        }
    }
    field
}

/// Distance from every cell to its nearest goal.
pub fn goal_distances(maze: &MazeGrid) -> WeightField {
    distance_map(maze, maze, &maze.goal_list())
}

/// First neighbour of `p`, trying `order`, that is traversable and strictly
/// closer to a goal according to `field`.
pub fn descend(maze: &MazeGrid, field: &WeightField, p: Point, order: &[Dir]) -> Option<Point> {
    let here = field.reached(maze.index(p)?)?;
    order.iter().find_map(|&d| {
        if !maze.can_move(p, d) {
            return None;
        }
        let n = p.step(d);
        let nd = field.reached(maze.index(n)?)?;
        (nd < here).then_some(n)
    })
}

enum Phase {
    Fill,
    Descend,
}

/// Flood fill seeded from every goal at once, followed by steepest descent
/// from the start.
///
/// The fill phase emits `searching` per dequeued cell with its distance to
/// the nearest goal; the descent emits `path_node` per cell of the route.
pub struct GoalFlood {
    core: Core,
    queue: VecDeque<usize>,
    nbuf: Vec<Point>,
    phase: Phase,
    started: bool,
    path: Vec<Point>,
}

impl GoalFlood {
    pub fn new(maze: &MazeGrid) -> Self {
        Self {
            core: Core::new(maze, Algorithm::Flood),
            queue: VecDeque::new(),
            nbuf: Vec::with_capacity(4),
            phase: Phase::Fill,
            started: false,
            path: Vec::new(),
        }
    }

    fn fill(&mut self) -> Step {
        let core = &mut self.core;
        let Some(ci) = self.queue.pop_front() else {
            let start = core.maze.start();
            if core.idx(start).and_then(|si| core.weights.reached(si)).is_none() {
                return core.no_path();
            }
            self.phase = Phase::Descend;
            self.path.push(start);
            return core.emit(SolveEvent::PathNode { at: start });
        };
        let cp = core.point(ci);
        let dist = core.weights.get(ci);
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
            self.queue.push_back(ni);
        }
        core.emit(SolveEvent::Searching { at: cp, val: dist })
    }

    fn trace_down(&mut self) -> Step {
        let core = &mut self.core;
        let Some(&here) = self.path.last() else {
            return core.no_path();
        };
        if core.maze.is_goal(here) {
            let path = std::mem::take(&mut self.path);
            return core.found(path);
        }
        match descend(&core.maze, &core.weights, here, &Dir::ALL) {
            Some(next) => {
                self.path.push(next);
                core.emit(SolveEvent::PathNode { at: next })
            }
            None => core.no_path(),
        }
    }
}

impl Stepper for GoalFlood {
    fn advance(&mut self) -> Step {
        if let Some(done) = self.core.done() {
            return done;
        }
        if !self.started {
            self.started = true;
            let core = &mut self.core;
            for g in core.maze.goal_list() {
                let Some(gi) = core.idx(g) else {
                    continue;
                };
                core.weights.set(gi, 0);
                self.queue.push_back(gi);
            }
            let start = core.maze.start();
            return core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        match self.phase {
            Phase::Fill => self.fill(),
            Phase::Descend => self.trace_down(),
        }
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Flood
    }
}
