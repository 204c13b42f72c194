use crate::board::Board;

/// Redraw hook invoked by [`Search::run`](crate::Search::run) after every
/// state change.
///
/// Implementations get read-only access to the board and must return
/// before the search continues. Any `FnMut(&Board)` closure is a `Render`.
pub trait Render {
    fn render(&mut self, board: &Board);
}

impl<F: FnMut(&Board)> Render for F {
    #[inline]
    fn render(&mut self, board: &Board) {
        self(board)
    }
}

/// A renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRender;

impl Render for NoRender {
    #[inline]
    fn render(&mut self, _board: &Board) {}
}
