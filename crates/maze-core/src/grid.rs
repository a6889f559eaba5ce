//! The wall-bitmask maze grid.
//!
//! [`MazeGrid`] stores one [`Walls`] nibble per cell in a flat buffer whose
//! first row is the **northern** edge of the maze: `index(x, y) =
//! (height - 1 - y) * width + x`. Every mutation keeps wall bits symmetric
//! between neighbours and re-applies the start and goal rules.

use std::collections::BTreeSet;

use std::ops::Deref;

use crate::geom::{Dir, Point};
use crate::persist::MAX_DIMENSION;
use crate::walls::{Walls, WeightField};

/// A rectangular maze with per-cell walls, one start cell and a goal set.
///
/// Solver output (weight field, primary and secondary path) is kept as
/// transient state and cleared by every edit.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: i32,
    height: i32,
    walls: Vec<Walls>,
    start: Point,
    goals: BTreeSet<Point>,
    weight_field: Option<WeightField>,
    primary_path: Vec<Point>,
    secondary_path: Vec<Point>,
}

impl MazeGrid {
    /// Create a fully walled maze with the start at the south-west corner.
    ///
    /// Each dimension is clamped to `1..=MAX_DIMENSION`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_DIMENSION as i32);
        let height = height.clamp(1, MAX_DIMENSION as i32);
        let mut grid = Self {
            width,
            height,
            walls: vec![Walls::FULL; (width * height) as usize],
            start: Point::ZERO,
            goals: BTreeSet::new(),
            weight_field: None,
            primary_path: Vec::new(),
            secondary_path: Vec::new(),
        };
        grid.enforce_start_rule();
        grid
    }

    /// Full reset to a fully walled maze of the new size.
    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Self::new(width, height);
    }

    /// Assemble a grid from already-validated parts, then apply both rules.
    pub(crate) fn from_parts(
        width: i32,
        height: i32,
        walls: Vec<Walls>,
        start: Point,
        goals: BTreeSet<Point>,
    ) -> Self {
        let mut grid = Self {
            width,
            height,
            walls,
            start,
            goals,
            weight_field: None,
            primary_path: Vec::new(),
            secondary_path: Vec::new(),
        };
        grid.enforce_rules();
        grid
    }

    // -----------------------------------------------------------------------
    // Dimensions and coordinate mapping
    // -----------------------------------------------------------------------

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Flat index of a cell, `None` if out of range.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(((self.height - 1 - p.y) * self.width + p.x) as usize)
    }

    /// Cell at a flat index, `None` if out of range.
    #[inline]
    pub fn coord(&self, idx: usize) -> Option<Point> {
        if idx >= self.walls.len() {
            return None;
        }
        let w = self.width as usize;
        let x = (idx % w) as i32;
        let y = self.height - 1 - (idx / w) as i32;
        Some(Point::new(x, y))
    }

    /// Every cell in flat-index order (north row first).
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.walls.len()).filter_map(|i| self.coord(i))
    }

    // -----------------------------------------------------------------------
    // Wall queries
    // -----------------------------------------------------------------------

    /// Raw wall nibbles in flat-index order.
    pub fn walls(&self) -> &[Walls] {
        &self.walls
    }

    /// Walls of a cell; out-of-range cells are solid.
    #[inline]
    pub fn walls_at(&self, p: Point) -> Walls {
        match self.index(p) {
            Some(i) => self.walls[i],
            None => Walls::FULL,
        }
    }

    /// Whether `p` has a wall on side `dir`. The outside is solid.
    #[inline]
    pub fn is_wall(&self, p: Point, dir: Dir) -> bool {
        self.walls_at(p).contains(dir)
    }

    /// Whether a single step from `p` in `dir` is traversable: both cells in
    /// range and neither the wall bit nor its mirror set.
    #[inline]
    pub fn can_move(&self, p: Point, dir: Dir) -> bool {
        let n = p.step(dir);
        self.contains(p)
            && self.contains(n)
            && !self.is_wall(p, dir)
            && !self.is_wall(n, dir.opposite())
    }

    /// Traversable sides of `p`, in N, E, S, W order.
    pub fn open_sides(&self, p: Point) -> impl Iterator<Item = Dir> + '_ {
        Dir::ALL.into_iter().filter(move |&d| self.can_move(p, d))
    }

    // -----------------------------------------------------------------------
    // Start and goals
    // -----------------------------------------------------------------------

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Goals in (y, x) order.
    pub fn goals(&self) -> impl Iterator<Item = Point> + '_ {
        self.goals.iter().copied()
    }

    pub fn goal_list(&self) -> Vec<Point> {
        self.goals.iter().copied().collect()
    }

    #[inline]
    pub fn is_goal(&self, p: Point) -> bool {
        self.goals.contains(&p)
    }

    #[inline]
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Flip the wall on side `dir` of `p` and its mirror on the neighbour.
    ///
    /// No-op when `p` is out of range. The start and goal rules are
    /// re-applied afterwards, so walls that belong to those shapes snap back.
    pub fn toggle_wall(&mut self, p: Point, dir: Dir) {
        let Some(i) = self.index(p) else {
            return;
        };
        self.walls[i] = self.walls[i].toggled(dir);
        if let Some(ni) = self.index(p.step(dir)) {
            self.walls[ni] = self.walls[ni].toggled(dir.opposite());
        }
        self.enforce_rules();
        self.clear_solution();
    }

    /// Set or clear the wall on side `dir` of `p`, mirrored on the neighbour.
    ///
    /// Rules are not re-applied; outside this module it is only reachable
    /// through [`WallEditor`].
    pub(crate) fn set_wall(&mut self, p: Point, dir: Dir, present: bool) {
        let Some(i) = self.index(p) else {
            return;
        };
        let apply = |w: Walls, d: Dir| if present { w.with(d) } else { w.without(d) };
        self.walls[i] = apply(self.walls[i], dir);
        if let Some(ni) = self.index(p.step(dir)) {
            self.walls[ni] = apply(self.walls[ni], dir.opposite());
        }
    }

    /// Remove every interior wall, keeping the outer boundary, then re-apply
    /// the start and goal rules.
    pub fn clear_interior(&mut self) {
        let cells: Vec<Point> = self.cells().collect();
        for p in cells {
            let w = Dir::ALL
                .into_iter()
                .filter(|&d| self.contains(p.step(d)))
                .fold(Walls::FULL, Walls::without);
            if let Some(i) = self.index(p) {
                self.walls[i] = w;
            }
        }
        self.enforce_rules();
        self.clear_solution();
    }

    /// Run a batch of raw wall edits, then re-apply both rules.
    ///
    /// The editor keeps walls symmetric but skips the rules between edits,
    /// so intermediate states may break the start and goal shapes.
    pub fn edit_walls<T>(&mut self, f: impl FnOnce(&mut WallEditor<'_>) -> T) -> T {
        let out = f(&mut WallEditor { grid: self });
        self.enforce_rules();
        self.clear_solution();
        out
    }

    /// Wall `p` in on all four sides (and the mirrored neighbour bits), run
    /// `f` on the blocked grid, then restore every touched nibble exactly.
    ///
    /// Transient solution state is left as it was.
    pub fn with_cell_blocked<T>(&mut self, p: Point, f: impl FnOnce(&MazeGrid) -> T) -> T {
        let touched: Vec<(usize, Walls)> = std::iter::once(p)
            .chain(p.neighbors_4().into_iter().map(|(_, n)| n))
            .filter_map(|c| self.index(c))
            .map(|i| (i, self.walls[i]))
            .collect();
        if let Some(i) = self.index(p) {
            self.walls[i] = Walls::FULL;
            for d in Dir::ALL {
                if let Some(ni) = self.index(p.step(d)) {
                    self.walls[ni] = self.walls[ni].with(d.opposite());
                }
            }
        }
        let out = f(self);
        for (i, w) in touched {
            self.walls[i] = w;
        }
        out
    }

    /// Move the start cell. A goal at `p` is removed first.
    ///
    /// Returns `false` (and changes nothing) when `p` is out of range.
    pub fn set_start(&mut self, p: Point) -> bool {
        if !self.contains(p) {
            return false;
        }
        self.start = p;
        self.goals.remove(&p);
        self.enforce_start_rule();
        self.clear_solution();
        true
    }

    /// Add or remove a goal cell.
    ///
    /// Rejected (returns `false`) for the start cell or an out-of-range cell.
    pub fn toggle_goal(&mut self, p: Point) -> bool {
        if p == self.start || !self.contains(p) {
            return false;
        }
        if !self.goals.remove(&p) {
            self.goals.insert(p);
        }
        self.enforce_goal_rule();
        self.clear_solution();
        true
    }

    // -----------------------------------------------------------------------
    // Structural rules
    // -----------------------------------------------------------------------

    /// Re-apply both the start rule and the goal rule.
    pub fn enforce_rules(&mut self) {
        self.enforce_start_rule();
        self.enforce_goal_rule();
    }

    /// The start cell is open to the north only; its other neighbours get
    /// the wall facing the start.
    pub fn enforce_start_rule(&mut self) {
        let s = self.start;
        let Some(si) = self.index(s) else {
            return;
        };
        self.walls[si] = Walls::FULL.without(Dir::North);
        for (dir, n) in s.neighbors_4() {
            let Some(ni) = self.index(n) else {
                continue;
            };
            let facing = dir.opposite();
            self.walls[ni] = if dir == Dir::North {
                self.walls[ni].without(facing)
            } else {
                self.walls[ni].with(facing)
            };
        }
    }

    /// Adjacent goal cells share no walls.
    pub fn enforce_goal_rule(&mut self) {
        let goals: Vec<Point> = self.goals.iter().copied().collect();
        for g in goals {
            for dir in [Dir::North, Dir::East] {
                let n = g.step(dir);
                if !self.goals.contains(&n) {
                    continue;
                }
                if let (Some(gi), Some(ni)) = (self.index(g), self.index(n)) {
                    self.walls[gi] = self.walls[gi].without(dir);
                    self.walls[ni] = self.walls[ni].without(dir.opposite());
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transient solve state
    // -----------------------------------------------------------------------

    /// Weight field from the last solve, if any.
    pub fn weight_field(&self) -> Option<&WeightField> {
        self.weight_field.as_ref()
    }

    pub fn primary_path(&self) -> &[Point] {
        &self.primary_path
    }

    pub fn secondary_path(&self) -> &[Point] {
        &self.secondary_path
    }

    /// Store the result of a solve for later display or analysis.
    pub fn set_solution(
        &mut self,
        primary: Vec<Point>,
        secondary: Vec<Point>,
        weights: WeightField,
    ) {
        self.primary_path = primary;
        self.secondary_path = secondary;
        self.weight_field = Some(weights);
    }

    pub fn clear_solution(&mut self) {
        self.weight_field = None;
        self.primary_path.clear();
        self.secondary_path.clear();
    }

    // -----------------------------------------------------------------------
    // Text rendering
    // -----------------------------------------------------------------------

    /// ASCII drawing with `S` for the start, `G` for goals and `*` for cells
    /// in `marks`. North is at the top.
    pub fn to_ascii(&self, marks: &[Point]) -> String {
        let marked: BTreeSet<Point> = marks.iter().copied().collect();
        let mut out = String::new();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push('+');
                let wall = self.is_wall(Point::new(x, y), Dir::North);
                out.push_str(if wall { "---" } else { "   " });
            }
            out.push_str("+\n");
            for x in 0..self.width {
                let p = Point::new(x, y);
                out.push(if self.is_wall(p, Dir::West) { '|' } else { ' ' });
                out.push_str(if p == self.start {
                    " S "
                } else if self.is_goal(p) {
                    " G "
                } else if marked.contains(&p) {
                    " * "
                } else {
                    "   "
                });
            }
            let east = self.is_wall(Point::new(self.width - 1, y), Dir::East);
            out.push(if east { '|' } else { ' ' });
            out.push('\n');
        }
        for x in 0..self.width {
            out.push('+');
            let wall = self.is_wall(Point::new(x, 0), Dir::South);
            out.push_str(if wall { "---" } else { "   " });
        }
        out.push_str("+\n");
        out
    }
}

/// Raw wall access for bulk carving, handed out by
/// [`MazeGrid::edit_walls`]. Reads go through to the grid.
pub struct WallEditor<'a> {
    grid: &'a mut MazeGrid,
}

impl WallEditor<'_> {
    /// Set or clear one wall and its mirror on the neighbour.
    pub fn set_wall(&mut self, p: Point, dir: Dir, present: bool) {
        self.grid.set_wall(p, dir, present);
    }

    /// Wall every cell.
    pub fn fill_walls(&mut self) {
        self.grid.walls.fill(Walls::FULL);
    }
}

impl Deref for WallEditor<'_> {
    type Target = MazeGrid;

    fn deref(&self) -> &MazeGrid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric(g: &MazeGrid) {
        for p in g.cells() {
            for (dir, n) in p.neighbors_4() {
                if g.contains(n) {
                    assert_eq!(
                        g.is_wall(p, dir),
                        g.is_wall(n, dir.opposite()),
                        "asymmetric wall between {p} and {n}"
                    );
                }
            }
        }
    }

    fn assert_start_canonical(g: &MazeGrid) {
        let s = g.start();
        assert_eq!(g.walls_at(s), Walls::FULL.without(Dir::North));
        for (dir, n) in s.neighbors_4() {
            if g.contains(n) {
                assert_eq!(g.is_wall(n, dir.opposite()), dir != Dir::North);
            }
        }
    }

    #[test]
    fn index_coord_bijection() {
        let g = MazeGrid::new(5, 3);
        for i in 0..g.len() {
            let p = g.coord(i).unwrap();
            assert_eq!(g.index(p), Some(i));
        }
        // North row is stored first.
        assert_eq!(g.index(Point::new(0, 2)), Some(0));
        assert_eq!(g.index(Point::new(4, 0)), Some(14));
        assert_eq!(g.index(Point::new(5, 0)), None);
        assert_eq!(g.index(Point::new(0, -1)), None);
        assert_eq!(g.coord(15), None);
    }

    #[test]
    fn outside_is_solid() {
        let g = MazeGrid::new(2, 2);
        for d in Dir::ALL {
            assert!(g.is_wall(Point::new(-1, 0), d));
            assert!(g.is_wall(Point::new(0, 2), d));
        }
    }

    #[test]
    fn new_grid_has_canonical_start() {
        let g = MazeGrid::new(4, 4);
        assert_start_canonical(&g);
        assert_symmetric(&g);
        assert!(g.can_move(Point::ZERO, Dir::North));
        assert_eq!(g.open_sides(Point::ZERO).collect::<Vec<_>>(), vec![Dir::North]);
    }

    #[test]
    fn toggle_wall_keeps_symmetry() {
        let mut g = MazeGrid::new(4, 4);
        g.toggle_wall(Point::new(2, 2), Dir::East);
        g.toggle_wall(Point::new(1, 1), Dir::South);
        g.toggle_wall(Point::new(3, 3), Dir::North); // border: only own bit
        assert!(!g.is_wall(Point::new(2, 2), Dir::East));
        assert!(!g.is_wall(Point::new(3, 2), Dir::West));
        assert!(!g.is_wall(Point::new(1, 0), Dir::North));
        assert!(!g.can_move(Point::new(3, 3), Dir::North));
        assert_symmetric(&g);
    }

    #[test]
    fn toggle_wall_out_of_range_is_noop() {
        let mut g = MazeGrid::new(3, 3);
        let before = g.walls().to_vec();
        g.toggle_wall(Point::new(9, 9), Dir::North);
        assert_eq!(g.walls(), &before[..]);
    }

    #[test]
    fn start_walls_snap_back_after_toggle() {
        let mut g = MazeGrid::new(4, 4);
        g.set_start(Point::new(1, 1));
        g.toggle_wall(Point::new(1, 1), Dir::East);
        g.toggle_wall(Point::new(1, 1), Dir::North);
        assert_start_canonical(&g);
        assert_symmetric(&g);
    }

    #[test]
    fn set_start_reshapes_neighbours() {
        let mut g = MazeGrid::new(4, 4);
        // Open everything around (2, 2) first.
        for d in Dir::ALL {
            g.set_wall(Point::new(2, 2), d, false);
        }
        assert!(g.set_start(Point::new(2, 2)));
        assert_start_canonical(&g);
        assert_symmetric(&g);
        assert!(!g.set_start(Point::new(4, 0)));
        assert_eq!(g.start(), Point::new(2, 2));
    }

    #[test]
    fn set_start_on_goal_removes_goal() {
        let mut g = MazeGrid::new(4, 4);
        assert!(g.toggle_goal(Point::new(3, 3)));
        assert!(g.is_goal(Point::new(3, 3)));
        g.set_start(Point::new(3, 3));
        assert!(!g.is_goal(Point::new(3, 3)));
        assert_eq!(g.goal_count(), 0);
    }

    #[test]
    fn goal_on_start_is_rejected() {
        let mut g = MazeGrid::new(4, 4);
        assert!(!g.toggle_goal(Point::ZERO));
        assert_eq!(g.goal_count(), 0);
        assert!(!g.toggle_goal(Point::new(-1, 0)));
    }

    #[test]
    fn toggle_goal_twice_removes() {
        let mut g = MazeGrid::new(4, 4);
        g.toggle_goal(Point::new(2, 3));
        g.toggle_goal(Point::new(2, 3));
        assert!(!g.is_goal(Point::new(2, 3)));
    }

    #[test]
    fn adjacent_goals_form_open_room() {
        let mut g = MazeGrid::new(6, 6);
        for p in [
            Point::new(2, 2),
            Point::new(3, 2),
            Point::new(2, 3),
            Point::new(3, 3),
        ] {
            g.toggle_goal(p);
        }
        assert!(g.can_move(Point::new(2, 2), Dir::East));
        assert!(g.can_move(Point::new(2, 2), Dir::North));
        assert!(g.can_move(Point::new(3, 3), Dir::West));
        assert!(g.can_move(Point::new(3, 3), Dir::South));
        // The room is still closed to the outside.
        assert!(g.is_wall(Point::new(2, 2), Dir::West));
        assert!(g.is_wall(Point::new(3, 3), Dir::North));
        assert_symmetric(&g);
    }

    #[test]
    fn goal_walls_snap_back_after_toggle() {
        let mut g = MazeGrid::new(4, 4);
        g.toggle_goal(Point::new(2, 3));
        g.toggle_goal(Point::new(3, 3));
        g.toggle_wall(Point::new(2, 3), Dir::East);
        assert!(g.can_move(Point::new(2, 3), Dir::East));
    }

    #[test]
    fn edits_clear_solution() {
        let mut g = MazeGrid::new(3, 3);
        g.set_solution(vec![Point::ZERO], vec![], WeightField::new(9));
        assert!(g.weight_field().is_some());
        g.toggle_wall(Point::new(1, 1), Dir::North);
        assert!(g.weight_field().is_none());
        assert!(g.primary_path().is_empty());

        g.set_solution(vec![Point::ZERO], vec![Point::ZERO], WeightField::new(9));
        g.toggle_goal(Point::new(2, 2));
        assert!(g.secondary_path().is_empty());
    }

    #[test]
    fn resize_is_full_reset() {
        let mut g = MazeGrid::new(3, 3);
        g.toggle_goal(Point::new(2, 2));
        g.set_start(Point::new(1, 0));
        g.resize(5, 2);
        assert_eq!((g.width(), g.height(), g.len()), (5, 2, 10));
        assert_eq!(g.start(), Point::ZERO);
        assert_eq!(g.goal_count(), 0);
        assert_start_canonical(&g);
    }

    #[test]
    fn ascii_marks_start_and_goal() {
        let mut g = MazeGrid::new(2, 2);
        g.toggle_goal(Point::new(1, 1));
        let art = g.to_ascii(&[]);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "+---+---+");
        assert!(lines[1].contains('G'));
        assert!(lines[3].contains('S'));
        // Start is open to the north, so the middle border is broken above it.
        assert!(lines[2].starts_with("+   +"));
    }

    #[test]
    fn oversized_dimensions_are_clamped() {
        let g = MazeGrid::new(50_000, 2);
        assert_eq!(g.width(), MAX_DIMENSION as i32);
        assert_eq!(g.len(), 2 * MAX_DIMENSION as usize);
        assert_eq!(MazeGrid::new(-3, 0).len(), 1);
    }

    #[test]
    fn clear_interior_keeps_border_and_rules() {
        let mut g = MazeGrid::new(4, 3);
        g.toggle_goal(Point::new(2, 1));
        g.toggle_goal(Point::new(3, 1));
        g.clear_interior();
        assert_symmetric(&g);
        assert_start_canonical(&g);
        assert!(g.can_move(Point::new(2, 1), Dir::East));
        assert!(g.can_move(Point::new(1, 1), Dir::North));
        for x in 0..4 {
            assert!(g.is_wall(Point::new(x, 2), Dir::North));
            assert!(g.is_wall(Point::new(x, 0), Dir::South));
        }
        assert!(g.is_wall(Point::new(3, 1), Dir::East));
    }

    #[test]
    fn wall_edits_settle_into_a_valid_grid() {
        let mut g = MazeGrid::new(4, 4);
        g.edit_walls(|ed| {
            ed.set_wall(Point::ZERO, Dir::East, false);
            ed.set_wall(Point::new(2, 2), Dir::East, false);
            assert!(!ed.is_wall(Point::ZERO, Dir::East));
        });
        assert_start_canonical(&g);
        assert_symmetric(&g);
        assert!(g.can_move(Point::new(2, 2), Dir::East));

        let back = MazeGrid::from_json(&g.to_file().to_json().unwrap()).unwrap();
        assert_eq!(back.walls(), g.walls());
    }

    #[test]
    fn fill_inside_an_edit_keeps_the_start_shape() {
        let mut g = MazeGrid::new(3, 3);
        g.clear_interior();
        g.edit_walls(|ed| ed.fill_walls());
        assert_start_canonical(&g);
        assert_eq!(g.walls_at(Point::new(2, 2)), Walls::FULL);
    }

    #[test]
    fn blocked_cell_is_restored_exactly() {
        let mut g = MazeGrid::new(3, 3);
        g.clear_interior();
        let before = g.walls().to_vec();
        let c = Point::new(1, 1);
        let open = g.with_cell_blocked(c, |blocked| {
            assert_eq!(blocked.walls_at(c), Walls::FULL);
            assert!(blocked.is_wall(Point::new(1, 2), Dir::South));
            assert!(blocked.is_wall(Point::new(0, 1), Dir::East));
            assert_symmetric(blocked);
            blocked.open_sides(Point::new(2, 1)).count()
        });
        assert_eq!(open, 2);
        assert_eq!(g.walls(), &before[..]);
    }

    #[test]
    fn blocking_outside_the_grid_changes_nothing() {
        let mut g = MazeGrid::new(2, 2);
        let before = g.walls().to_vec();
        g.with_cell_blocked(Point::new(5, 5), |blocked| {
            assert_eq!(blocked.walls(), &before[..]);
        });
        assert_eq!(g.walls(), &before[..]);
    }
}
