use pathviz_core::Point;
use thiserror::Error;

/// Errors raised while building or editing a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A board needs at least one row.
    #[error("board must have at least one row, got {rows}")]
    Empty { rows: i32 },

    /// `pixel_width / rows` rounded down to zero.
    #[error("pixel width {pixel_width} is too small for {rows} rows")]
    CellTooSmall { rows: i32, pixel_width: i32 },

    #[error("cell at row {}, col {} is outside the board", .pos.y, .pos.x)]
    OutOfBounds { pos: Point },
}

/// Precondition violations detected before a search starts, plus
/// cancellation of a running search.
///
/// Not finding a path is not an error; see [`Outcome::NotFound`](crate::Outcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no end cell has been placed")]
    MissingEnd,

    #[error("endpoint at row {}, col {} is outside the board", .pos.y, .pos.x)]
    OutOfBounds { pos: Point },

    /// An endpoint sits on an obstacle.
    #[error("endpoint at row {}, col {} is an obstacle", .pos.y, .pos.x)]
    Blocked { pos: Point },

    /// Obstacles changed since neighbour lists were last recomputed.
    #[error("neighbour lists are stale; recompute them before searching")]
    StaleNeighbors,

    #[error("search was cancelled")]
    Cancelled,
}
