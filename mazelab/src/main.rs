use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use maze_core::{MAX_DIMENSION, MazeGrid, Point};
use maze_gen::{GenConfig, MazeGen};
use maze_paths::{Algorithm, Events, SolveConfig, goal_distances, solve};
use maze_route::{
    AnalyzeConfig, SolveRequest, analyze_path, classify_in, handle_request, multi_route_all,
    secondary_path,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Carve a new maze and write it as JSON.
    Generate(GenerateArgs),

    /// Solve a maze and print the offload response as JSON.
    Solve {
        maze: PathBuf,

        #[arg(short, long, default_value = "astar")]
        algo: Algorithm,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the step-wise event stream, one JSON object per line.
    Animate {
        maze: PathBuf,

        #[arg(short, long, default_value = "bfs")]
        algo: Algorithm,

        /// Iteration cap; defaults to one proportional to the maze area.
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Draw a maze with its solution, route statistics and alternatives.
    Show {
        maze: PathBuf,

        #[arg(short, long, default_value = "flood")]
        algo: Algorithm,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Ignored with `--from`.
    #[arg(short = 'W', long, default_value = "16")]
    width: i32,

    /// Ignored with `--from`.
    #[arg(short = 'H', long, default_value = "16")]
    height: i32,

    /// Probability of knocking through each dead end.
    #[arg(long, default_value = "0")]
    loops: f64,

    /// Grow around the passages already carved in this maze file.
    #[arg(long)]
    from: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Start cell as `x,y`.
    #[arg(long)]
    start: Option<Point>,

    /// Goal cell as `x,y`; may be repeated. Defaults to the far corner.
    #[arg(long = "goal")]
    goals: Vec<Point>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_maze(path: &Path) -> Result<MazeGrid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    MazeGrid::from_json(&text).with_context(|| format!("Failed to load maze from {}", path.display()))
}

fn write_out(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{text}")?;
            Ok(())
        }
    }
}

fn carve<R: Rng>(rng: R, maze: &mut MazeGrid, cfg: &GenConfig) -> usize {
    MazeGen::with_rng(rng).generate(maze, cfg)
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let GenerateArgs {
        width,
        height,
        loops,
        seed,
        start,
        ..
    } = *args;
    let from = args.from.as_deref();
    let limit = 1..=MAX_DIMENSION;
    anyhow::ensure!(
        limit.contains(&i64::from(width)) && limit.contains(&i64::from(height)),
        "Invalid dimensions: {width}x{height} (each side must be 1..={MAX_DIMENSION})"
    );
    anyhow::ensure!((0.0..=1.0).contains(&loops), "--loops must be within 0..=1, got {loops}");

    let mut maze = match from {
        Some(path) => read_maze(path)?,
        None => MazeGrid::new(width, height),
    };
    if let Some(s) = start {
        anyhow::ensure!(maze.set_start(s), "Start {s} is outside the maze");
    }
    if args.goals.is_empty() && maze.goal_count() == 0 {
        maze.toggle_goal(Point::new(maze.width() - 1, maze.height() - 1));
    }
    for &g in &args.goals {
        if !maze.is_goal(g) {
            anyhow::ensure!(maze.toggle_goal(g), "Goal {g} is outside the maze or on the start");
        }
    }

    let cfg = GenConfig {
        keep_existing: from.is_some(),
        loop_probability: loops,
    };
    let carved = match seed {
        Some(seed) => carve(StdRng::seed_from_u64(seed), &mut maze, &cfg),
        None => carve(rand::rng(), &mut maze, &cfg),
    };
    info!(
        "Generated {}x{} maze ({carved} passages)",
        maze.width(),
        maze.height()
    );

    let json = maze.to_file().to_json_pretty()?;
    write_out(args.output.as_deref(), &json)
}

fn solve_cmd(path: &Path, algo: Algorithm, pretty: bool) -> Result<()> {
    let maze = read_maze(path)?;
    let resp = handle_request(&SolveRequest::new(algo, &maze));
    if let Some(err) = &resp.error {
        anyhow::bail!("Solve rejected: {err}");
    }
    info!(
        "{algo}: {:?}, path {} cells, detour {} cells, {:.2} ms",
        resp.status,
        resp.path.len(),
        resp.secondary_path.len(),
        resp.elapsed_ms
    );
    let json = if pretty {
        serde_json::to_string_pretty(&resp)?
    } else {
        serde_json::to_string(&resp)?
    };
    write_out(None, &json)
}

fn animate(path: &Path, algo: Algorithm, max_steps: Option<usize>) -> Result<()> {
    let maze = read_maze(path)?;
    let cfg = SolveConfig { max_steps };
    let mut out = BufWriter::new(io::stdout().lock());
    let mut stream = Events::new(&maze, algo, &cfg);
    for ev in stream.by_ref() {
        serde_json::to_writer(&mut out, &ev)?;
        writeln!(out)?;
    }
    out.flush()?;
    if let Some(outcome) = stream.outcome() {
        info!("{algo}: {:?} after {} steps", outcome.status, outcome.steps);
    }
    Ok(())
}

fn show(path: &Path, algo: Algorithm) -> Result<()> {
    let maze = read_maze(path)?;
    let outcome = solve(&maze, algo, &SolveConfig::default());
    let detour = if outcome.is_found() {
        secondary_path(&maze, &outcome.path, algo, &AnalyzeConfig::default())
    } else {
        Vec::new()
    };

    let mut out = io::stdout().lock();
    write!(out, "{}", maze.to_ascii(&outcome.path))?;
    writeln!(out, "{algo}: {:?}", outcome.status)?;
    if outcome.is_found() {
        let stats = analyze_path(&outcome.path);
        writeln!(
            out,
            "  best: {} steps, {} turns, longest straight {} ({})",
            stats.steps,
            stats.turns,
            stats.max_straight,
            classify_in(&maze, &outcome.path)
        )?;
    }
    if !detour.is_empty() {
        let stats = analyze_path(&detour);
        writeln!(out, "  detour: {} steps, {} turns", stats.steps, stats.turns)?;
    }

    let field = goal_distances(&maze);
    for route in multi_route_all(&maze, &field) {
        writeln!(
            out,
            "  leaving {}: {} steps, {} turns, runs {}",
            route.departs, route.stats.steps, route.stats.turns, route.side
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Generate(opts) => generate(&opts),
        Command::Solve { maze, algo, pretty } => solve_cmd(&maze, algo, pretty),
        Command::Animate {
            maze,
            algo,
            max_steps,
        } => animate(&maze, algo, max_steps),
        Command::Show { maze, algo } => show(&maze, algo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let args = Args::try_parse_from([
            "mazelab", "generate", "-W", "8", "-H", "6", "--seed", "3", "--goal", "7,5", "--goal",
            "6,5",
        ])
        .unwrap();
        let Command::Generate(opts) = args.command else {
            panic!("expected generate");
        };
        assert_eq!((opts.width, opts.height), (8, 6));
        assert_eq!(opts.seed, Some(3));
        assert_eq!(opts.goals, vec![Point::new(7, 5), Point::new(6, 5)]);
    }

    #[test]
    fn oversized_generate_is_rejected() {
        let args = Args::try_parse_from(["mazelab", "generate", "-W", "50000", "-H", "50000"]).unwrap();
        let Command::Generate(opts) = args.command else {
            panic!("expected generate");
        };
        let err = generate(&opts).unwrap_err();
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn unknown_algorithm_is_a_parse_error() {
        assert!(Args::try_parse_from(["mazelab", "solve", "m.json", "--algo", "teleport"]).is_err());
    }
}
