//! Colours for each [`CellState`] and for the footer.

use pathviz_core::Color;
use pathviz_search::CellState;

pub const EMPTY: Color = Color::from_rgb(255, 255, 255);
pub const START: Color = Color::from_rgb(255, 165, 0);
pub const END: Color = Color::from_rgb(64, 224, 208);
// Pure black is `Color::DEFAULT`, which would reset to the terminal's own
// background.
pub const OBSTACLE: Color = Color::from_rgb(10, 10, 10);
pub const OPEN: Color = Color::from_rgb(0, 255, 0);
pub const CLOSED: Color = Color::from_rgb(255, 0, 0);
pub const PATH: Color = Color::from_rgb(128, 0, 128);

pub const FOOTER_FG: Color = Color::from_rgb(200, 200, 200);
pub const FOOTER_BG: Color = Color::from_rgb(30, 30, 50);
pub const ERROR_FG: Color = Color::from_rgb(255, 110, 110);

/// Background colour a cell in `state` is painted with.
pub const fn state_color(state: CellState) -> Color {
    match state {
        CellState::Empty => EMPTY,
        CellState::Start => START,
        CellState::End => END,
        CellState::Obstacle => OBSTACLE,
        CellState::Open => OPEN,
        CellState::Closed => CLOSED,
        CellState::Path => PATH,
    }
}
