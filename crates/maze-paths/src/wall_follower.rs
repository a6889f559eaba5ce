use maze_core::{Dir, MazeGrid, Point, WeightField};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::search::Core;
use crate::step::{SolveEvent, Status, Step, Stepper};

/// Which wall the follower keeps a hand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Directions to try relative to `facing`: hugging side, forward, far
    /// side, reverse.
    pub fn priorities(self, facing: Dir) -> [Dir; 4] {
        match self {
            Hand::Left => [
                facing.turn_left(),
                facing,
                facing.turn_right(),
                facing.opposite(),
            ],
            Hand::Right => [
                facing.turn_right(),
                facing,
                facing.turn_left(),
                facing.opposite(),
            ],
        }
    }
}

/// Local maze walker with no global search state.
///
/// Starts facing north. Each `advance` moves one cell. The walk is the
/// returned path when a goal is entered; it may revisit cells.
pub struct WallFollower {
    core: Core,
    hand: Hand,
    facing: Dir,
    walk: Vec<Point>,
    moves: usize,
    budget: usize,
    started: bool,
}

impl WallFollower {
    pub fn new(maze: &MazeGrid, hand: Hand) -> Self {
        let algorithm = match hand {
            Hand::Left => Algorithm::LeftHand,
            Hand::Right => Algorithm::RightHand,
        };
        let core = Core::new(maze, algorithm);
        let budget = 4 * core.maze.len();
        Self {
            core,
            hand,
            facing: Dir::North,
            walk: Vec::new(),
            moves: 0,
            budget,
            started: false,
        }
    }
}

impl Stepper for WallFollower {
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
            self.walk.push(start);
            return core.emit(SolveEvent::Start { at: start, val: 0 });
        }
        let Some(&here) = self.walk.last() else {
            return core.no_path();
        };
        if core.maze.is_goal(here) {
            let path = std::mem::take(&mut self.walk);
            return core.found(path);
        }
        if self.moves >= self.budget {
            log::warn!("{}: gave up after {} moves", core.algorithm, self.moves);
            let trail = std::mem::take(&mut self.walk);
            return core.finish(Status::BudgetExceeded, Vec::new(), trail);
        }
        let next_dir = self
            .hand
            .priorities(self.facing)
            .into_iter()
            .find(|&d| core.maze.can_move(here, d));
        let Some(dir) = next_dir else {
            let trail = std::mem::take(&mut self.walk);
            return core.finish(Status::Stuck, Vec::new(), trail);
        };

        self.facing = dir;
        self.moves += 1;
        let next = here.step(dir);
        let val = self.moves as i32;
        if let Some(ni) = core.idx(next) {
            if core.weights.reached(ni).is_none() {
                core.weights.set(ni, val);
            }
        }
        self.walk.push(next);
        core.emit(SolveEvent::Visit { at: next, val })
    }

    fn weights(&self) -> &WeightField {
        &self.core.weights
    }

    fn algorithm(&self) -> Algorithm {
        self.core.algorithm
    }
}
