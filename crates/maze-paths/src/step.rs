//! Step-wise execution: events, outcomes and the [`Stepper`] trait.
//!
//! Every algorithm is a state machine advanced one unit of work at a time.
//! [`solve`] simply drains one under an iteration cap, so the synchronous
//! and step-wise forms always agree. Dropping a stepper cancels it.

use maze_core::{MazeGrid, Point, WeightField};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// A single observable unit of work, as consumed by an animator.
///
/// Serializes as `{"type": "visit", "x": 3, "y": 1, "val": 4}` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolveEvent {
    /// Search begins at the start cell.
    Start {
        #[serde(flatten)]
        at: Point,
        val: i32,
    },
    /// A cell was dequeued by a breadth- or priority-ordered search.
    Searching {
        #[serde(flatten)]
        at: Point,
        val: i32,
    },
    /// A cell was stepped into by a depth-first or walking search.
    Visit {
        #[serde(flatten)]
        at: Point,
        val: i32,
    },
    /// A cell or branch was abandoned.
    Backtrack {
        #[serde(flatten)]
        at: Point,
    },
    /// One cell of a path being traced after the search phase.
    PathNode {
        #[serde(flatten)]
        at: Point,
    },
    Found { path: Vec<Point> },
    NoPath,
    Stuck { path: Vec<Point> },
}

impl SolveEvent {
    /// Cell the event refers to, if any.
    pub fn at(&self) -> Option<Point> {
        match self {
            Self::Start { at, .. }
            | Self::Searching { at, .. }
            | Self::Visit { at, .. }
            | Self::Backtrack { at }
            | Self::PathNode { at } => Some(*at),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Found { .. } | Self::NoPath | Self::Stuck { .. })
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// A goal was reached; `path` runs from start to that goal.
    Found,
    /// The reachable space was exhausted without meeting a goal.
    NoPath,
    /// A walker had no open direction at its current cell.
    Stuck,
    /// An iteration cap ran out; the weight field holds partial results.
    BudgetExceeded,
}

/// Result of a finished solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub algorithm: Algorithm,
    pub status: Status,
    /// Start-to-goal path; empty unless `status` is [`Status::Found`].
    pub path: Vec<Point>,
    /// Cells walked by a wall follower or greedy walker that did not arrive.
    pub trail: Vec<Point>,
    pub weights: WeightField,
    /// Number of events emitted before the terminal one.
    pub steps: usize,
}

impl Outcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        self.status == Status::Found
    }

    /// The terminal event announcing this outcome on an event stream.
    ///
    /// Budget exhaustion has no event of its own and reads as `no_path`.
    pub fn terminal_event(&self) -> SolveEvent {
        match self.status {
            Status::Found => SolveEvent::Found {
                path: self.path.clone(),
            },
            Status::Stuck => SolveEvent::Stuck {
                path: self.trail.clone(),
            },
            Status::NoPath | Status::BudgetExceeded => SolveEvent::NoPath,
        }
    }
}

/// What one call to [`Stepper::advance`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue(SolveEvent),
    Done(Outcome),
}

/// A solve in progress.
///
/// Each `advance` performs exactly one unit of work. Once `Done` has been
/// returned, further calls return the same outcome again.
pub trait Stepper {
    fn advance(&mut self) -> Step;

    /// The weight field as filled so far.
    fn weights(&self) -> &WeightField;

    fn algorithm(&self) -> Algorithm;
}

/// Tuning for synchronous solves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveConfig {
    /// Hard cap on `advance` calls. `None` uses [`SolveConfig::default_cap`].
    pub max_steps: Option<usize>,
}

impl SolveConfig {
    /// A cap that comfortably exceeds the event count of every algorithm on a
    /// well-formed grid: `8 * width * height + 16`.
    pub fn default_cap(maze: &MazeGrid) -> usize {
        8 * maze.len() + 16
    }

    pub fn step_cap(&self, maze: &MazeGrid) -> usize {
        self.max_steps.unwrap_or_else(|| Self::default_cap(maze))
    }
}

/// Iterator over the full event stream of a solve, ending with its terminal
/// event.
pub struct Events {
    stepper: Box<dyn Stepper + Send>,
    remaining: usize,
    emitted: usize,
    outcome: Option<Outcome>,
}

impl Events {
    pub fn new(maze: &MazeGrid, algorithm: Algorithm, config: &SolveConfig) -> Self {
        Self {
            stepper: algorithm.stepper(maze),
            remaining: config.step_cap(maze),
            emitted: 0,
            outcome: None,
        }
    }

    /// The outcome, once the terminal event has been yielded.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Drain the rest of the stream and return the outcome.
    pub fn finish(mut self) -> Outcome {
        while self.next().is_some() {}
        match self.outcome {
            Some(o) => o,
            None => self.exhausted(),
        }
    }

    fn exhausted(&self) -> Outcome {
        let algorithm = self.stepper.algorithm();
        log::warn!("{algorithm}: step budget exhausted, returning partial weights");
        Outcome {
            algorithm,
            status: Status::BudgetExceeded,
            path: Vec::new(),
            trail: Vec::new(),
            weights: self.stepper.weights().clone(),
            steps: self.emitted,
        }
    }
}

impl Iterator for Events {
    type Item = SolveEvent;

    fn next(&mut self) -> Option<SolveEvent> {
        if self.outcome.is_some() {
            return None;
        }
        if self.remaining == 0 {
            let outcome = self.exhausted();
            let ev = outcome.terminal_event();
            self.outcome = Some(outcome);
            return Some(ev);
        }
        self.remaining -= 1;
        match self.stepper.advance() {
            Step::Continue(ev) => {
                self.emitted += 1;
                Some(ev)
            }
            Step::Done(outcome) => {
                let ev = outcome.terminal_event();
                self.outcome = Some(outcome);
                Some(ev)
            }
        }
    }
}

/// Run `algorithm` on a private snapshot of `maze` to completion.
pub fn solve(maze: &MazeGrid, algorithm: Algorithm, config: &SolveConfig) -> Outcome {
    let outcome = Events::new(maze, algorithm, config).finish();
    log::debug!(
        "{algorithm}: {:?} after {} steps, path length {}",
        outcome.status,
        outcome.steps,
        outcome.path.len()
    );
    outcome
}

/// Event stream for `algorithm` with the default cap.
pub fn events(maze: &MazeGrid, algorithm: Algorithm) -> Events {
    Events::new(maze, algorithm, &SolveConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use maze_core::Dir;

    #[test]
    fn event_json_shape() {
        let ev = SolveEvent::Visit {
            at: Point::new(3, 1),
            val: 4,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v, serde_json::json!({"type": "visit", "x": 3, "y": 1, "val": 4}));

        let v = serde_json::to_value(SolveEvent::NoPath).unwrap();
        assert_eq!(v, serde_json::json!({"type": "no_path"}));

        let v = serde_json::to_value(SolveEvent::PathNode { at: Point::ZERO }).unwrap();
        assert_eq!(v["type"], "path_node");
    }

    #[test]
    fn stream_ends_with_single_terminal_event() {
        let maze = fixtures::corridor();
        for algo in Algorithm::ALL {
            let evs: Vec<SolveEvent> = events(&maze, algo).collect();
            let terminal: Vec<_> = evs.iter().filter(|e| e.is_terminal()).collect();
            assert_eq!(terminal.len(), 1, "{algo}");
            assert!(evs.last().unwrap().is_terminal(), "{algo}");
            assert!(matches!(evs[0], SolveEvent::Start { .. }), "{algo}");
        }
    }

    #[test]
    fn sync_and_stepwise_agree() {
        for maze in [fixtures::corridor(), fixtures::open_field(5, 4), fixtures::ring()] {
            for algo in Algorithm::ALL {
                let sync = solve(&maze, algo, &SolveConfig::default());
                let mut stepper = algo.stepper(&maze);
                let stepped = loop {
                    if let Step::Done(o) = stepper.advance() {
                        break o;
                    }
                };
                assert_eq!(sync.status, stepped.status, "{algo}");
                assert_eq!(sync.path, stepped.path, "{algo}");
            }
        }
    }

    #[test]
    fn done_is_sticky() {
        let maze = fixtures::corridor();
        let mut stepper = Algorithm::Bfs.stepper(&maze);
        let first = loop {
            if let Step::Done(o) = stepper.advance() {
                break o;
            }
        };
        assert_eq!(stepper.advance(), Step::Done(first));
    }

    #[test]
    fn tiny_cap_reports_budget_with_partial_weights() {
        let maze = fixtures::open_field(6, 6);
        let cfg = SolveConfig { max_steps: Some(5) };
        let out = solve(&maze, Algorithm::Bfs, &cfg);
        assert_eq!(out.status, Status::BudgetExceeded);
        assert!(out.path.is_empty());
        assert!(out.weights.reached_count() > 0);
        assert_eq!(out.terminal_event(), SolveEvent::NoPath);
    }

    #[test]
    fn solve_uses_a_snapshot() {
        let mut maze = fixtures::corridor();
        let mut stepper = Algorithm::Bfs.stepper(&maze);
        stepper.advance();
        // Seal the corridor on the live grid mid-solve.
        maze.toggle_wall(Point::new(0, 1), Dir::North);
        let out = loop {
            if let Step::Done(o) = stepper.advance() {
                break o;
            }
        };
        assert!(out.is_found());
    }
}
