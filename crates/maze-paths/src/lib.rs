//! **maze-paths**: solvers for wall-bitmask mazes.
//!
//! Every algorithm is a step-wise state machine behind the [`Stepper`]
//! trait; [`solve`] drains one to completion under an iteration cap and
//! [`events`] exposes the same run as an iterator of [`SolveEvent`]s for
//! animation.
//!
//! - **BFS** and start-seeded **flood fill** ([`BfsSearch`])
//! - goal-seeded **flood fill** with steepest descent ([`GoalFlood`])
//! - **Dijkstra** ([`DijkstraSearch`]) and **A\*** ([`AstarSearch`])
//! - **greedy Manhattan** walk ([`GreedyWalk`])
//! - plain and dead-end-pruning **DFS** ([`DfsSearch`], [`PeekingDfs`])
//! - left- and right-hand **wall followers** ([`WallFollower`])
//!
//! Solvers take a private snapshot of the maze, so edits to the live grid
//! never affect a run in progress.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | BFS, flood fill, DFS, greedy walk |
//! | [`WeightedPather`] : [`Pather`] | Dijkstra |
//! | [`AstarPather`] : [`WeightedPather`] | A*, greedy heuristic |

mod algorithm;
mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod distance;
mod flood;
mod greedy;
mod queue;
mod search;
mod step;
mod traits;
mod wall_follower;

#[cfg(test)]
mod fixtures;

pub use algorithm::{Algorithm, ParseAlgorithmError};
pub use astar::AstarSearch;
pub use bfs::BfsSearch;
pub use dfs::{DfsSearch, PeekingDfs};
pub use dijkstra::DijkstraSearch;
pub use distance::{manhattan, nearest_goal};
pub use flood::{GoalFlood, descend, distance_map, goal_distances};
pub use greedy::GreedyWalk;
pub use step::{Events, Outcome, SolveConfig, SolveEvent, Status, Step, Stepper, events, solve};
pub use traits::{AstarPather, Pather, WeightedPather};
pub use wall_follower::{Hand, WallFollower};
