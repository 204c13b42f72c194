use pathviz_core::Point;

/// Manhattan (L1) distance between two grid positions.
///
/// Never overestimates on a 4-connected board with unit step cost, which is
/// what makes it a valid A* heuristic there.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
