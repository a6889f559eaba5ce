//! Algorithm selection by name.

use std::fmt;
use std::str::FromStr;

use maze_core::MazeGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bfs::BfsSearch;
use crate::dfs::{DfsSearch, PeekingDfs};
use crate::dijkstra::DijkstraSearch;
use crate::astar::AstarSearch;
use crate::flood::GoalFlood;
use crate::greedy::GreedyWalk;
use crate::step::Stepper;
use crate::wall_follower::{Hand, WallFollower};

/// Every solver the engine offers. Names match the offload `algoType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "bfs")]
    Bfs,
    /// Goal-seeded flood fill with steepest-descent reconstruction.
    #[serde(rename = "flood")]
    Flood,
    /// Start-seeded flood fill with parent-pointer reconstruction.
    #[serde(rename = "flood_start")]
    FloodStart,
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "astar")]
    AStar,
    /// Greedy walk ordered by Manhattan distance only.
    #[serde(rename = "manhattan")]
    Manhattan,
    #[serde(rename = "dfs")]
    Dfs,
    /// Depth-first search that peeks at dead ends before descending.
    #[serde(rename = "dfs_peek")]
    DfsPeek,
    #[serde(rename = "left")]
    LeftHand,
    #[serde(rename = "right")]
    RightHand,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Bfs,
        Algorithm::Flood,
        Algorithm::FloodStart,
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::Manhattan,
        Algorithm::Dfs,
        Algorithm::DfsPeek,
        Algorithm::LeftHand,
        Algorithm::RightHand,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Flood => "flood",
            Algorithm::FloodStart => "flood_start",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
            Algorithm::Manhattan => "manhattan",
            Algorithm::Dfs => "dfs",
            Algorithm::DfsPeek => "dfs_peek",
            Algorithm::LeftHand => "left",
            Algorithm::RightHand => "right",
        }
    }

    /// Whether the returned path is guaranteed to be a shortest one.
    pub const fn is_optimal(self) -> bool {
        matches!(
            self,
            Algorithm::Bfs
                | Algorithm::Flood
                | Algorithm::FloodStart
                | Algorithm::Dijkstra
                | Algorithm::AStar
        )
    }

    /// Start a step-wise solve on a private copy of `maze`.
    pub fn stepper(self, maze: &MazeGrid) -> Box<dyn Stepper + Send> {
        match self {
            Algorithm::Bfs | Algorithm::FloodStart => Box::new(BfsSearch::new(maze, self)),
            Algorithm::Flood => Box::new(GoalFlood::new(maze)),
            Algorithm::Dijkstra => Box::new(DijkstraSearch::new(maze)),
            Algorithm::AStar => Box::new(AstarSearch::new(maze)),
            Algorithm::Manhattan => Box::new(GreedyWalk::new(maze)),
            Algorithm::Dfs => Box::new(DfsSearch::new(maze)),
            Algorithm::DfsPeek => Box::new(PeekingDfs::new(maze)),
            Algorithm::LeftHand => Box::new(WallFollower::new(maze, Hand::Left)),
            Algorithm::RightHand => Box::new(WallFollower::new(maze, Hand::Right)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An algorithm name that no solver answers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown algorithm: {0}")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}
