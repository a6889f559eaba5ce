//! **maze-route**: what to do with a path once you have one.
//!
//! - [`analyze_path`]: steps, turns and the longest straight run
//! - [`classify_direction`] / [`classify_in`]: which side of the goals a
//!   path runs on
//! - [`multi_route`] / [`multi_route_all`]: shortest routes forced to leave
//!   the start in a given direction
//! - [`secondary_path`]: the best detour found by blocking cells of the
//!   best path one at a time
//!
//! The [`offload`] module defines the request/response messages used to run
//! a solve on a maze snapshot elsewhere, and a worker thread that answers
//! them.

mod analysis;
pub mod offload;
mod secondary;

pub use analysis::{
    PathStats, Route, analyze_path, classify_direction, classify_in, multi_route,
    multi_route_all, route_priority,
};
pub use offload::{SolveRequest, SolveResponse, SolveWorker, handle_request};
pub use secondary::{AnalyzeConfig, secondary_path};
