//! **maze-gen**: randomized maze carving.
//!
//! [`MazeGen`] carves a [`MazeGrid`](maze_core::MazeGrid) with a randomized
//! recursive backtracker and can then knock through some dead ends to
//! create loops. Any [`rand::Rng`] works; tests use a seeded `StdRng`.

mod generator;

pub use generator::{GenConfig, MazeGen};
