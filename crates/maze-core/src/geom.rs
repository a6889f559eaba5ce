//! Geometry primitives: [`Point`] and [`Dir`].
//!
//! Maze coordinates are Cartesian: X grows east, Y grows **north**. The
//! flat storage order is handled by [`MazeGrid`](crate::MazeGrid), not here.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer cell coordinate. X grows east, Y grows north.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0), the south-west corner.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The adjacent point one step in `dir`.
    #[inline]
    pub fn step(self, dir: Dir) -> Self {
        self + dir.delta()
    }

    /// The four cardinal neighbours in N, E, S, W order.
    #[inline]
    pub fn neighbors_4(self) -> [(Dir, Point); 4] {
        Dir::ALL.map(|d| (d, self.step(d)))
    }

    /// Direction of the unit step from `self` to `to`, if they are adjacent.
    pub fn dir_to(self, to: Point) -> Option<Dir> {
        let d = to - self;
        Dir::ALL.into_iter().find(|dir| dir.delta() == d)
    }

    /// Key form used by the persisted goal list: `"x,y"`.
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses the `"x,y"` key form.
impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
        let x = x.trim().parse().map_err(|_| format!("bad x in {s:?}"))?;
        let y = y.trim().parse().map_err(|_| format!("bad y in {s:?}"))?;
        Ok(Self::new(x, y))
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Dir
// ---------------------------------------------------------------------------

/// A cardinal direction. The discriminant is the index used for rotation
/// arithmetic (N=0, E=1, S=2, W=3).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Dir {
    /// All directions in N, E, S, W order.
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    /// Wall bit for this side: N=1, E=2, S=4, W=8.
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Unit step in this direction (north is +y).
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Dir::North => Point::new(0, 1),
            Dir::East => Point::new(1, 0),
            Dir::South => Point::new(0, -1),
            Dir::West => Point::new(-1, 0),
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, taken modulo 4.
    #[inline]
    pub const fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Quarter turn counter-clockwise (North -> West).
    #[inline]
    pub const fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Quarter turn clockwise (North -> East).
    #[inline]
    pub const fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Single-letter label (`n`, `e`, `s`, `w`).
    pub const fn letter(self) -> char {
        match self {
            Dir::North => 'n',
            Dir::East => 'e',
            Dir::South => 's',
            Dir::West => 'w',
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dir::North => "north",
            Dir::East => "east",
            Dir::South => "south",
            Dir::West => "west",
        };
        f.write_str(s)
    }
}

impl FromStr for Dir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Dir::North),
            "e" | "east" => Ok(Dir::East),
            "s" | "south" => Ok(Dir::South),
            "w" | "west" => Ok(Dir::West),
            _ => Err(format!("unknown direction {s:?}")),
        }
    }
}
