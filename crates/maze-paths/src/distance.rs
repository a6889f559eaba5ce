use maze_core::Point;

use crate::traits::AstarPather;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Smallest estimate from `p` to any of `goals`; 0 when there are none.
pub fn nearest_goal<P: AstarPather>(pather: &P, p: Point, goals: &[Point]) -> i32 {
    goals
        .iter()
        .map(|&g| pather.estimate(p, g))
        .min()
        .unwrap_or(0)
}
