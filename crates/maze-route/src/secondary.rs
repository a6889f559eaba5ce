use maze_core::{MazeGrid, Point};
use maze_paths::{Algorithm, SolveConfig, solve};

/// Tuning for route analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeConfig {
    /// How many interior cells of the best path are tried as blockers.
    pub max_blocked_cells: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            max_blocked_cells: 100,
        }
    }
}

/// Best detour around `best`.
///
/// Each interior cell of `best` (up to `config.max_blocked_cells`) is walled
/// off in turn on a private copy of `maze` and `algorithm` is re-run. The
/// shortest path found this way that is at least as long as `best` is
/// returned; empty when `best` has fewer than three cells or no such detour
/// exists. `maze` itself is never modified.
pub fn secondary_path(
    maze: &MazeGrid,
    best: &[Point],
    algorithm: Algorithm,
    config: &AnalyzeConfig,
) -> Vec<Point> {
    if best.len() < 3 {
        return Vec::new();
    }
    let mut scratch = maze.clone();
    let solve_cfg = SolveConfig::default();
    let mut candidates: Vec<Vec<Point>> = Vec::new();

    for &p in best[1..best.len() - 1].iter().take(config.max_blocked_cells) {
        let out = scratch.with_cell_blocked(p, |blocked| solve(blocked, algorithm, &solve_cfg));
        if out.is_found() {
            candidates.push(out.path);
        }
    }

    log::debug!(
        "{algorithm}: {} detour candidates around a {}-cell path",
        candidates.len(),
        best.len()
    );
    candidates.sort_by_key(Vec::len);
    candidates
        .into_iter()
        .find(|c| c.len() >= best.len())
        .unwrap_or_default()
}
