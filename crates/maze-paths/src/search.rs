//! State shared by every stepper: the private maze snapshot, the weight
//! field, parent pointers and the sticky outcome.

use maze_core::{MazeGrid, Point, WeightField};

use crate::algorithm::Algorithm;
use crate::step::{Outcome, SolveEvent, Status, Step};

/// Parent pointer of a cell with no predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

pub(crate) struct Core {
    pub(crate) maze: MazeGrid,
    pub(crate) weights: WeightField,
    pub(crate) parent: Vec<usize>,
    pub(crate) algorithm: Algorithm,
    /// Events emitted so far.
    pub(crate) steps: usize,
    outcome: Option<Outcome>,
}

impl Core {
    pub(crate) fn new(maze: &MazeGrid, algorithm: Algorithm) -> Self {
        let mut maze = maze.clone();
        maze.clear_solution();
        let len = maze.len();
        Self {
            maze,
            weights: WeightField::new(len),
            parent: vec![NO_PARENT; len],
            algorithm,
            steps: 0,
            outcome: None,
        }
    }

    /// The stored outcome, if the solve already finished.
    pub(crate) fn done(&self) -> Option<Step> {
        self.outcome.clone().map(Step::Done)
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.maze.index(p)
    }

    /// Coordinate of a flat index produced by this grid.
    #[inline]
    pub(crate) fn point(&self, i: usize) -> Point {
        self.maze.coord(i).unwrap_or(Point::ZERO)
    }

    pub(crate) fn emit(&mut self, ev: SolveEvent) -> Step {
        self.steps += 1;
        Step::Continue(ev)
    }

    pub(crate) fn finish(&mut self, status: Status, path: Vec<Point>, trail: Vec<Point>) -> Step {
        let outcome = Outcome {
            algorithm: self.algorithm,
            status,
            path,
            trail,
            weights: self.weights.clone(),
            steps: self.steps,
        };
        self.outcome = Some(outcome.clone());
        Step::Done(outcome)
    }

    pub(crate) fn found(&mut self, path: Vec<Point>) -> Step {
        self.finish(Status::Found, path, Vec::new())
    }

    pub(crate) fn no_path(&mut self) -> Step {
        self.finish(Status::NoPath, Vec::new(), Vec::new())
    }

    /// Walk parent pointers from `end` back to the root, then reverse.
    pub(crate) fn trace(&self, end: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut ci = end;
        while ci != NO_PARENT && path.len() <= self.parent.len() {
            path.push(self.point(ci));
            ci = self.parent[ci];
        }
        path.reverse();
        path
    }
}
