use std::collections::VecDeque;

use pathviz_core::Point;

use crate::astar::UNREACHABLE;
use crate::board::Board;

/// Unit-cost breadth-first distances from one source, following the
/// board's neighbour lists.
///
/// Serves as a brute-force reference for shortest-path lengths.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    rows: i32,
    dist: Vec<i32>,
}

impl DistanceMap {
    /// Flood the board from `source`. Neighbour lists should be current.
    pub fn from_board(board: &Board, source: Point) -> Self {
        let mut dist = vec![UNREACHABLE; board.len()];
        let mut queue: VecDeque<usize> = VecDeque::new();

        if let Some(si) = board.idx(source) {
            dist[si] = 0;
            queue.push_back(si);
        }

        while let Some(ci) = queue.pop_front() {
            let next = dist[ci] + 1;
            let Some(cell) = board.cell(board.point(ci)) else {
                continue;
            };
            for &np in cell.neighbors() {
                let Some(ni) = board.idx(np) else {
                    continue;
                };
                if dist[ni] != UNREACHABLE {
                    continue;
                }
                dist[ni] = next;
                queue.push_back(ni);
            }
        }

        Self {
            rows: board.rows(),
            dist,
        }
    }

    /// Distance to `p`, or [`UNREACHABLE`] if `p` was not reached or lies
    /// outside the board.
    pub fn at(&self, p: Point) -> i32 {
        if p.x < 0 || p.y < 0 || p.x >= self.rows || p.y >= self.rows {
            return UNREACHABLE;
        }
        self.dist[p.y as usize * self.rows as usize + p.x as usize]
    }

    /// Number of positions reached, the source included.
    pub fn reached(&self) -> usize {
        self.dist.iter().filter(|&&d| d != UNREACHABLE).count()
    }
}
