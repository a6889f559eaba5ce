use maze_core::{Dir, MazeGrid, Point, WallEditor, Walls};
use rand::Rng;
use rand::seq::SliceRandom;

/// Settings for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenConfig {
    /// Keep already carved regions and grow the maze around them.
    pub keep_existing: bool,
    /// Chance, in `0.0..=1.0`, that a dead end is knocked through afterwards.
    pub loop_probability: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            keep_existing: false,
            loop_probability: 0.0,
        }
    }
}

impl GenConfig {
    /// Fresh carving with half of the dead ends opened up.
    pub fn with_loops() -> Self {
        Self {
            loop_probability: 0.5,
            ..Self::default()
        }
    }
}

/// Maze generator driven by a caller-supplied random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Carve `maze`, optionally inject loops, then re-apply the start and
    /// goal rules.
    ///
    /// Returns the number of passages carved, loops included.
    pub fn generate(&mut self, maze: &mut MazeGrid, cfg: &GenConfig) -> usize {
        let carved = maze.edit_walls(|ed| {
            let mut carved = self.backtrack(ed, cfg.keep_existing);
            if cfg.loop_probability > 0.0 {
                carved += self.open_dead_ends(ed, cfg.loop_probability);
            }
            carved
        });
        log::debug!(
            "generated {}x{} maze: {carved} passages carved",
            maze.width(),
            maze.height()
        );
        carved
    }

    /// Carve without loop injection; the rules are re-applied afterwards.
    pub fn carve(&mut self, maze: &mut MazeGrid, keep_existing: bool) -> usize {
        maze.edit_walls(|ed| self.backtrack(ed, keep_existing))
    }

    /// Open one extra side of each dead end (the start excluded) with
    /// probability `p`, picking among its walled in-range sides at random.
    ///
    /// Dead ends are collected before any wall is removed. Returns the
    /// number of walls removed.
    pub fn inject_loops(&mut self, maze: &mut MazeGrid, p: f64) -> usize {
        maze.edit_walls(|ed| self.open_dead_ends(ed, p))
    }

    /// Randomized recursive backtracker.
    ///
    /// Fresh carving walls every cell and grows from the start. With
    /// `keep_existing`, every partly open cell seeds the frontier (in random
    /// order) and only fully walled cells are carved into; cells that were
    /// completely open are walled up again first. The start only ever
    /// carves north, when it has a northern neighbour.
    fn backtrack(&mut self, maze: &mut WallEditor<'_>, keep_existing: bool) -> usize {
        let mut visited = vec![false; maze.len()];
        let mut stack: Vec<Point> = Vec::new();

        if keep_existing {
            let cells: Vec<Point> = maze.cells().collect();
            for &p in &cells {
                if maze.walls_at(p) == Walls::OPEN {
                    for d in Dir::ALL {
                        maze.set_wall(p, d, true);
                    }
                }
            }
            stack.extend(cells.into_iter().filter(|&p| maze.walls_at(p) != Walls::FULL));
            stack.shuffle(&mut self.rng);
        } else {
            maze.fill_walls();
        }
        if stack.is_empty() {
            stack.push(maze.start());
        }
        for &p in &stack {
            if let Some(i) = maze.index(p) {
                visited[i] = true;
            }
        }

        let start = maze.start();
        let mut carved = 0usize;
        let mut dirs = Dir::ALL;
        while let Some(&cur) = stack.last() {
            let candidates: &[Dir] = if cur == start && maze.contains(cur.step(Dir::North)) {
                &[Dir::North]
            } else {
                dirs.shuffle(&mut self.rng);
                &dirs
            };

            let next = candidates.iter().copied().find_map(|d| {
                let n = cur.step(d);
                let ni = maze.index(n)?;
                (!visited[ni] && maze.walls_at(n) == Walls::FULL).then_some((d, n, ni))
            });
            match next {
                Some((d, n, ni)) => {
                    maze.set_wall(cur, d, false);
                    visited[ni] = true;
                    stack.push(n);
                    carved += 1;
                }
                None => {
                    stack.pop();
                }
            }
        }
        carved
    }

    fn open_dead_ends(&mut self, maze: &mut WallEditor<'_>, p: f64) -> usize {
        let start = maze.start();
        let dead_ends: Vec<Point> = maze
            .cells()
            .filter(|&c| c != start && maze.walls_at(c).is_dead_end())
            .collect();

        let mut opened = 0usize;
        for c in dead_ends {
            let r: f64 = self.rng.random();
            if r >= p {
                continue;
            }
            let sides: Vec<Dir> = Dir::ALL
                .into_iter()
                .filter(|&d| maze.is_wall(c, d) && maze.contains(c.step(d)))
                .collect();
            if sides.is_empty() {
                continue;
            }
            let d = sides[self.rng.random_range(0..sides.len())];
            maze.set_wall(c, d, false);
            opened += 1;
        }
        log::debug!("loop injection opened {opened} dead ends");
        opened
    }
}
