//! Route statistics, directional labels and multi-route reconstruction.

use maze_core::{Dir, MazeGrid, Point, WeightField};
use maze_paths::descend;
use serde::Serialize;

/// Shape of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStats {
    /// Number of moves: `path.len() - 1`.
    pub steps: usize,
    /// Places where a move changes direction from the one before.
    pub turns: usize,
    /// Cells in the longest straight run, its first cell included.
    pub max_straight: usize,
}

/// Count steps, turns and the longest straight run of `path`.
///
/// Paths shorter than two cells have all-zero stats.
pub fn analyze_path(path: &[Point]) -> PathStats {
    if path.len() < 2 {
        return PathStats::default();
    }
    let mut turns = 0;
    let mut longest = 0;
    let mut run = 0;
    let mut last: Option<Point> = None;
    for w in path.windows(2) {
        let delta = w[1] - w[0];
        match last {
            Some(prev) if prev != delta => {
                turns += 1;
                longest = longest.max(run);
                run = 1;
            }
            _ => run += 1,
        }
        last = Some(delta);
    }
    longest = longest.max(run);
    PathStats {
        steps: path.len() - 1,
        turns,
        max_straight: longest + 1,
    }
}

fn centroid(points: &[Point]) -> (f64, f64) {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
    (sx as f64 / n, sy as f64 / n)
}

fn classify_around(path: &[Point], reference: (f64, f64)) -> Dir {
    let (px, py) = centroid(path);
    let dx = px - reference.0;
    let dy = py - reference.1;
    if dx.abs() > dy.abs() {
        if dx > 0.0 { Dir::East } else { Dir::West }
    } else if dy > 0.0 {
        Dir::North
    } else {
        Dir::South
    }
}

/// Which side of the goals a path mostly runs on.
///
/// Compares the path centroid with the goal centroid along the dominant
/// axis; ties go to the vertical axis. `None` if either list is empty.
pub fn classify_direction(path: &[Point], goals: &[Point]) -> Option<Dir> {
    if path.is_empty() || goals.is_empty() {
        return None;
    }
    Some(classify_around(path, centroid(goals)))
}

/// Like [`classify_direction`] against the maze's goals, falling back to
/// the grid centre when there are none. An empty path reads as north.
pub fn classify_in(maze: &MazeGrid, path: &[Point]) -> Dir {
    if path.is_empty() {
        return Dir::North;
    }
    let goals = maze.goal_list();
    let reference = if goals.is_empty() {
        (
            (maze.width() - 1) as f64 / 2.0,
            (maze.height() - 1) as f64 / 2.0,
        )
    } else {
        centroid(&goals)
    };
    classify_around(path, reference)
}

/// Direction preference used after the forced first step of a route that
/// leaves the start going `dir`.
pub fn route_priority(dir: Dir) -> [Dir; 4] {
    match dir {
        Dir::North => [Dir::North, Dir::East, Dir::West, Dir::South],
        Dir::East => [Dir::East, Dir::South, Dir::North, Dir::West],
        Dir::South => [Dir::South, Dir::West, Dir::East, Dir::North],
        Dir::West => [Dir::West, Dir::North, Dir::South, Dir::East],
    }
}

/// Shortest route that leaves the start going `dir`, walking down a
/// distance-to-goal `field` (see [`maze_paths::goal_distances`]).
///
/// Empty when the start is unreached in `field`, when `dir` is not a
/// downhill move from the start, or when the walk fails to end on a cell at
/// distance 0.
pub fn multi_route(maze: &MazeGrid, field: &WeightField, dir: Dir) -> Vec<Point> {
    let start = maze.start();
    let Some(si) = maze.index(start) else {
        return Vec::new();
    };
    if field.reached(si).is_none() {
        return Vec::new();
    }

    let mut path = vec![start];
    let mut here = start;
    let priority = route_priority(dir);
    while field.reached(maze.index(here).unwrap_or(usize::MAX)) != Some(0) {
        let order: &[Dir] = if path.len() == 1 { &[dir] } else { &priority };
        let Some(next) = descend(maze, field, here, order) else {
            return Vec::new();
        };
        here = next;
        path.push(here);
        if path.len() > maze.len() {
            return Vec::new();
        }
    }
    path
}

/// One entry of a multi-route comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Direction of the forced first step.
    pub departs: Dir,
    /// Side of the goals the route mostly runs on.
    pub side: Dir,
    pub stats: PathStats,
    pub path: Vec<Point>,
}

/// Routes departing north, east, west and south, in that order, skipping
/// directions that yield nothing.
pub fn multi_route_all(maze: &MazeGrid, field: &WeightField) -> Vec<Route> {
    [Dir::North, Dir::East, Dir::West, Dir::South]
        .into_iter()
        .filter_map(|departs| {
            let path = multi_route(maze, field, departs);
            if path.is_empty() {
                return None;
            }
            Some(Route {
                departs,
                side: classify_in(maze, &path),
                stats: analyze_path(&path),
                path,
            })
        })
        .collect()
}
