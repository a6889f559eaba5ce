//! **maze-core**: the wall-bitmask maze model.
//!
//! This crate provides the data model shared by the solver, generator and
//! analysis crates: geometry primitives, the per-cell wall nibble, the
//! [`MazeGrid`] with its start/goal structural rules, the per-cell
//! [`WeightField`] produced by solves, and the persisted JSON format.

pub mod geom;
pub mod grid;
pub mod persist;
pub mod walls;

pub use geom::{Dir, Point};
pub use grid::{MazeGrid, WallEditor};
pub use persist::{LegacyWalls, LoadError, MAX_DIMENSION, MazeFile};
pub use walls::{UNREACHABLE, Walls, WeightField};
