//! Step-wise A* search over a square board, built for visualization.
//!
//! A [`Board`] holds `rows × rows` [`Cell`]s, each with a [`CellState`] and
//! a cached list of walkable neighbours. A [`Search`] runs A* between the
//! board's start and end cells, writing `Open`, `Closed` and `Path`
//! overlays onto the board as it goes, so a renderer can show every
//! expansion.
//!
//! Movement is 4-directional with unit cost and the heuristic is
//! [`manhattan`] distance. Frontier ties on `f` are broken by insertion
//! order, so a given layout always produces the same search.
//!
//! ```
//! use pathviz_core::Point;
//! use pathviz_search::{find_path, Board};
//!
//! let mut board = Board::new(5, 100).unwrap();
//! board.set_start(Point::at(0, 0)).unwrap();
//! board.set_end(Point::at(4, 4)).unwrap();
//! let outcome = find_path(&mut board).unwrap();
//! assert_eq!(outcome.steps(), Some(8));
//! ```

mod astar;
mod bfs;
mod board;
mod cell;
mod distance;
mod error;
mod frontier;
mod render;

pub use astar::{find_path, Outcome, Search, Step, UNREACHABLE};
pub use bfs::DistanceMap;
pub use board::Board;
pub use cell::{Cell, CellState};
pub use distance::manhattan;
pub use error::{BoardError, SearchError};
pub use render::{NoRender, Render};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use pathviz_core::Point;

    #[test]
    fn cell_state_round_trip() {
        let json = serde_json::to_string(&CellState::Obstacle).unwrap();
        assert_eq!(json, "\"Obstacle\"");
        let back: CellState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellState::Obstacle);
    }

    #[test]
    fn cell_keeps_neighbors() {
        let mut board = Board::new(3, 3).unwrap();
        board.recompute_all_neighbors();
        let cell = board.cell(Point::at(1, 1)).unwrap().clone();
        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
        assert_eq!(back.neighbors().len(), 4);
    }
}
