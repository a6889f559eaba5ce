use maze_core::{Dir, MazeGrid, Point, Walls};
use maze_gen::{GenConfig, MazeGen};
use maze_paths::{Algorithm, SolveConfig, SolveEvent, Status, events, goal_distances, solve};
use maze_route::{AnalyzeConfig, analyze_path, multi_route_all, secondary_path};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn generated(w: i32, h: i32, seed: u64, cfg: &GenConfig) -> MazeGrid {
    let mut maze = MazeGrid::new(w, h);
    maze.toggle_goal(Point::new(w - 1, h - 1));
    MazeGen::with_rng(StdRng::seed_from_u64(seed)).generate(&mut maze, cfg);
    maze
}

fn assert_valid_path(maze: &MazeGrid, path: &[Point]) {
    assert_eq!(path.first(), Some(&maze.start()));
    assert!(path.last().is_some_and(|&p| maze.is_goal(p)));
    for w in path.windows(2) {
        let d = w[0].dir_to(w[1]).expect("adjacent cells");
        assert!(maze.can_move(w[0], d), "{} -> {}", w[0], w[1]);
    }
}

#[test]
fn optimal_solvers_agree_on_generated_mazes() {
    let cfg = SolveConfig::default();
    for seed in 0..8 {
        for gen_cfg in [GenConfig::default(), GenConfig::with_loops()] {
            let maze = generated(11, 9, seed, &gen_cfg);
            let bfs = solve(&maze, Algorithm::Bfs, &cfg);
            assert!(bfs.is_found(), "seed {seed}");
            for algo in Algorithm::ALL.into_iter().filter(|a| a.is_optimal()) {
                let out = solve(&maze, algo, &cfg);
                assert_eq!(out.status, Status::Found, "{algo} seed {seed}");
                assert_eq!(out.path.len(), bfs.path.len(), "{algo} seed {seed}");
                assert_valid_path(&maze, &out.path);
            }
        }
    }
}

#[test]
fn every_solver_returns_a_valid_walk() {
    let cfg = SolveConfig::default();
    for seed in 0..5 {
        let maze = generated(8, 8, seed, &GenConfig::default());
        for algo in Algorithm::ALL {
            let out = solve(&maze, algo, &cfg);
            if out.is_found() {
                assert_valid_path(&maze, &out.path);
            } else {
                assert!(out.path.is_empty(), "{algo}");
            }
        }
        // A perfect maze is always solved by wall following and DFS.
        for algo in [Algorithm::LeftHand, Algorithm::RightHand, Algorithm::Dfs, Algorithm::DfsPeek] {
            assert!(solve(&maze, algo, &cfg).is_found(), "{algo} seed {seed}");
        }
    }
}

#[test]
fn straight_corridor_example() {
    let mut maze = MazeGrid::new(4, 4);
    maze.toggle_wall(Point::new(0, 1), Dir::North);
    maze.toggle_wall(Point::new(0, 2), Dir::North);
    maze.toggle_goal(Point::new(0, 3));
    let expected: Vec<Point> = (0..4).map(|y| Point::new(0, y)).collect();
    for algo in [Algorithm::Bfs, Algorithm::AStar, Algorithm::Dijkstra] {
        let out = solve(&maze, algo, &SolveConfig::default());
        assert_eq!(out.path, expected, "{algo}");
        let stats = analyze_path(&out.path);
        assert_eq!(stats.steps, 3);
        assert_eq!(stats.turns, 0);
    }
}

#[test]
fn sealed_goal_example() {
    // Start boxed in on the top row; the goal is walled off in its own
    // corner and nothing leads to it.
    let mut maze = MazeGrid::new(4, 4);
    maze.set_start(Point::new(1, 3));
    maze.toggle_goal(Point::new(3, 0));
    for (x, y) in [(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)] {
        maze.toggle_wall(Point::new(x, y), Dir::East);
    }
    assert_eq!(maze.walls_at(Point::new(3, 0)), Walls::FULL);

    let cfg = SolveConfig::default();
    for algo in Algorithm::ALL {
        let out = solve(&maze, algo, &cfg);
        assert!(out.path.is_empty(), "{algo}");
        let terminal = events(&maze, algo).last();
        match algo {
            Algorithm::LeftHand | Algorithm::RightHand | Algorithm::DfsPeek => {
                assert_eq!(out.status, Status::Stuck, "{algo}");
                assert!(out.steps < 5, "{algo}");
                assert!(matches!(terminal, Some(SolveEvent::Stuck { .. })), "{algo}");
            }
            _ => {
                assert_eq!(out.status, Status::NoPath, "{algo}");
                assert_eq!(terminal, Some(SolveEvent::NoPath), "{algo}");
            }
        }
    }
}

#[test]
fn loop_injection_example() {
    let cfg = GenConfig {
        loop_probability: 1.0,
        ..GenConfig::default()
    };
    let maze = generated(10, 10, 42, &cfg);
    let start = maze.start();
    assert!(
        maze.cells()
            .filter(|&p| p != start && !maze.is_goal(p))
            .any(|p| maze.open_sides(p).count() > 2)
    );
}

#[test]
fn single_route_has_no_secondary_path() {
    let maze = generated(9, 7, 3, &GenConfig::default());
    for algo in [Algorithm::Flood, Algorithm::AStar, Algorithm::Dijkstra] {
        let best = solve(&maze, algo, &SolveConfig::default()).path;
        assert!(!best.is_empty());
        let alt = secondary_path(&maze, &best, algo, &AnalyzeConfig::default());
        assert!(alt.is_empty(), "{algo}");
    }
}

#[test]
fn loops_give_secondary_paths() {
    let cfg = GenConfig {
        loop_probability: 1.0,
        ..GenConfig::default()
    };
    let found = (0..6).any(|seed| {
        let maze = generated(9, 9, seed, &cfg);
        let best = solve(&maze, Algorithm::AStar, &SolveConfig::default()).path;
        let alt = secondary_path(&maze, &best, Algorithm::AStar, &AnalyzeConfig::default());
        if alt.is_empty() {
            return false;
        }
        assert!(alt.len() >= best.len());
        assert_ne!(alt, best);
        true
    });
    assert!(found);
}

#[test]
fn multi_route_matches_shortest_length() {
    let maze = generated(10, 8, 5, &GenConfig::with_loops());
    let best = solve(&maze, Algorithm::Bfs, &SolveConfig::default()).path;
    let field = goal_distances(&maze);
    let routes = multi_route_all(&maze, &field);
    assert!(!routes.is_empty());
    for r in &routes {
        assert_eq!(r.path.len(), best.len());
        assert_valid_path(&maze, &r.path);
    }
}
