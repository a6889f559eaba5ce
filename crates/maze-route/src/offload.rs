//! Request/response contract for running a solve somewhere else, plus an
//! in-process worker thread that speaks it.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use maze_core::{MazeFile, MazeGrid, Point, WeightField};
use maze_paths::{Algorithm, SolveConfig, Status, solve};
use serde::{Deserialize, Serialize};

use crate::secondary::{AnalyzeConfig, secondary_path};

/// A solve to run on a by-value snapshot of a maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    /// Algorithm name, e.g. `"astar"` or `"left"`.
    pub algo_type: String,
    pub maze_snapshot: MazeFile,
}

impl SolveRequest {
    pub fn new(algorithm: Algorithm, maze: &MazeGrid) -> Self {
        Self {
            algo_type: algorithm.as_str().to_string(),
            maze_snapshot: maze.to_file(),
        }
    }
}

/// Result of one [`SolveRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub path: Vec<Point>,
    pub secondary_path: Vec<Point>,
    pub weight_field: WeightField,
    pub elapsed_ms: f64,
    /// `None` when the request was rejected.
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    fn rejected(error: String, started: Instant) -> Self {
        Self {
            path: Vec::new(),
            secondary_path: Vec::new(),
            weight_field: WeightField::default(),
            elapsed_ms: elapsed_ms(started),
            status: None,
            error: Some(error),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Algorithms whose responses carry a secondary path.
pub fn wants_secondary(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::Flood | Algorithm::AStar | Algorithm::Dijkstra | Algorithm::Manhattan
    )
}

/// Validate the snapshot, solve it, and look for a detour when the
/// algorithm supports one.
///
/// Failures never panic: an unknown algorithm or a bad snapshot comes back
/// as the `error` field.
pub fn handle_request(req: &SolveRequest) -> SolveResponse {
    let started = Instant::now();
    let algorithm: Algorithm = match req.algo_type.parse() {
        Ok(a) => a,
        Err(e) => {
            log::warn!("rejecting solve request: {e}");
            return SolveResponse::rejected(e.to_string(), started);
        }
    };
    let maze = match MazeGrid::from_file(&req.maze_snapshot) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("rejecting solve request: {e}");
            return SolveResponse::rejected(e.to_string(), started);
        }
    };

    let outcome = solve(&maze, algorithm, &SolveConfig::default());
    let secondary = if outcome.is_found() && wants_secondary(algorithm) {
        secondary_path(&maze, &outcome.path, algorithm, &AnalyzeConfig::default())
    } else {
        Vec::new()
    };

    SolveResponse {
        path: outcome.path,
        secondary_path: secondary,
        weight_field: outcome.weights,
        elapsed_ms: elapsed_ms(started),
        status: Some(outcome.status),
        error: None,
    }
}

/// JSON in, JSON out form of [`handle_request`].
pub fn handle_json(request: &str) -> Result<String, serde_json::Error> {
    let req: SolveRequest = serde_json::from_str(request)?;
    serde_json::to_string(&handle_request(&req))
}

struct Job {
    id: u64,
    request: SolveRequest,
}

/// A background thread that answers [`SolveRequest`]s in submission order.
///
/// Every submitted request gets exactly one response tagged with its id.
/// Dropping the worker closes its queue and joins the thread.
pub struct SolveWorker {
    jobs: Option<Sender<Job>>,
    results: Receiver<(u64, SolveResponse)>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
}

impl SolveWorker {
    pub fn spawn() -> io::Result<Self> {
        let (job_tx, job_rx): (Sender<Job>, Receiver<Job>) = mpsc::channel();
        let (res_tx, res_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("maze-solver".into())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    log::debug!("solve job {} ({})", job.id, job.request.algo_type);
                    let response = handle_request(&job.request);
                    if res_tx.send((job.id, response)).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            jobs: Some(job_tx),
            results: res_rx,
            handle: Some(handle),
            next_id: 0,
        })
    }

    /// Queue a request. Returns its id, or `None` if the worker is gone.
    pub fn submit(&mut self, request: SolveRequest) -> Option<u64> {
        let id = self.next_id;
        self.jobs.as_ref()?.send(Job { id, request }).ok()?;
        self.next_id += 1;
        Some(id)
    }

    /// Block until the next response arrives.
    pub fn recv(&self) -> Option<(u64, SolveResponse)> {
        self.results.recv().ok()
    }

    /// A response if one is ready.
    pub fn try_recv(&self) -> Option<(u64, SolveResponse)> {
        self.results.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<(u64, SolveResponse)> {
        match self.results.recv_timeout(timeout) {
            Ok(r) => Some(r),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for SolveWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("solver thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::Dir;

    fn corridor() -> MazeGrid {
        let mut maze = MazeGrid::new(4, 4);
        maze.toggle_wall(Point::new(0, 1), Dir::North);
        maze.toggle_wall(Point::new(0, 2), Dir::North);
        maze.toggle_goal(Point::new(0, 3));
        maze
    }

    #[test]
    fn wire_names_are_camel_case() {
        let req = SolveRequest::new(Algorithm::Bfs, &corridor());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["algoType"], "bfs");
        assert_eq!(v["mazeSnapshot"]["width"], 4);

        let resp = handle_request(&req);
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("secondaryPath").is_some());
        assert!(v.get("weightField").is_some());
        assert!(v.get("elapsedMs").is_some());
        assert!(v.get("error").is_none());
        assert_eq!(v["status"], "found");
        assert_eq!(v["path"][3], serde_json::json!({"x": 0, "y": 3}));
    }

    #[test]
    fn unknown_algorithm_is_an_error_field() {
        let mut req = SolveRequest::new(Algorithm::Bfs, &corridor());
        req.algo_type = "teleport".into();
        let resp = handle_request(&req);
        assert_eq!(resp.status, None);
        assert!(resp.path.is_empty());
        assert!(resp.error.unwrap().contains("teleport"));
    }

    #[test]
    fn bad_snapshot_is_an_error_field() {
        let mut req = SolveRequest::new(Algorithm::Bfs, &corridor());
        req.maze_snapshot.width = None;
        let resp = handle_request(&req);
        assert!(resp.error.unwrap().contains("width"));
    }

    #[test]
    fn secondary_only_for_some_algorithms() {
        assert!(wants_secondary(Algorithm::Flood));
        assert!(wants_secondary(Algorithm::Manhattan));
        assert!(!wants_secondary(Algorithm::Bfs));
        assert!(!wants_secondary(Algorithm::LeftHand));
        // Single corridor: nothing to detour through.
        let resp = handle_request(&SolveRequest::new(Algorithm::AStar, &corridor()));
        assert_eq!(resp.path.len(), 4);
        assert!(resp.secondary_path.is_empty());
    }

    #[test]
    fn json_entry_point() {
        let req = SolveRequest::new(Algorithm::Dfs, &corridor());
        let out = handle_json(&serde_json::to_string(&req).unwrap()).unwrap();
        let resp: SolveResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(resp.status, Some(Status::Found));
        assert!(handle_json("{").is_err());
    }

    #[test]
    fn worker_answers_every_request() {
        let mut worker = SolveWorker::spawn().unwrap();
        let maze = corridor();
        let ids: Vec<u64> = [Algorithm::Bfs, Algorithm::RightHand, Algorithm::Flood]
            .into_iter()
            .map(|a| worker.submit(SolveRequest::new(a, &maze)).unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let (id, resp) = worker.recv_timeout(Duration::from_secs(10)).unwrap();
            assert_eq!(resp.path.len(), 4);
            seen.push(id);
        }
        seen.sort();
        assert_eq!(seen, ids);
        assert!(worker.try_recv().is_none());
    }
}
