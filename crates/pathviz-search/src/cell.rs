use pathviz_core::Point;

/// Order in which [`Cell::compute_neighbors`] scans adjacent positions:
/// up, down, left, right. Search tie-breaking depends on it.
const DIRS: [Point; 4] = [
    Point::new(0, -1),
    Point::new(0, 1),
    Point::new(-1, 0),
    Point::new(1, 0),
];

/// What a cell currently represents.
///
/// `Start`, `End` and `Obstacle` are placed by the user; `Open`, `Closed`
/// and `Path` are overlays written by a running search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Obstacle,
    /// Discovered and waiting in the frontier.
    Open,
    /// Expanded.
    Closed,
    /// On the reconstructed path.
    Path,
}

impl CellState {
    /// Whether this is a search overlay that [`Board::clear_search`]
    /// removes.
    ///
    /// [`Board::clear_search`]: crate::Board::clear_search
    #[inline]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::Open | Self::Closed | Self::Path)
    }
}

/// One square of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    row: i32,
    col: i32,
    state: CellState,
    neighbors: Vec<Point>,
}

impl Cell {
    /// An empty cell with no neighbours computed yet.
    pub fn new(row: i32, col: i32) -> Self {
        Self {
            row,
            col,
            state: CellState::Empty,
            neighbors: Vec::with_capacity(4),
        }
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.col
    }

    /// `(row, col)` of this cell.
    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.row, self.col)
    }

    /// Position as a [`Point`] (`x` = column, `y` = row).
    #[inline]
    pub fn pos(&self) -> Point {
        Point::at(self.row, self.col)
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Walkable neighbours as of the last [`compute_neighbors`](Cell::compute_neighbors).
    #[inline]
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    // --- queries ---

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }

    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.state == CellState::Obstacle
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == CellState::Closed
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.state == CellState::Path
    }

    // --- mutations ---

    #[inline]
    pub fn make_open(&mut self) {
        self.state = CellState::Open;
    }

    #[inline]
    pub fn make_closed(&mut self) {
        self.state = CellState::Closed;
    }

    #[inline]
    pub fn make_obstacle(&mut self) {
        self.state = CellState::Obstacle;
    }

    #[inline]
    pub fn make_start(&mut self) {
        self.state = CellState::Start;
    }

    #[inline]
    pub fn make_end(&mut self) {
        self.state = CellState::End;
    }

    #[inline]
    pub fn make_path(&mut self) {
        self.state = CellState::Path;
    }

    /// Back to `Empty`. Neighbour lists are left alone.
    #[inline]
    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }

    #[inline]
    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    /// Rebuild the neighbour list for a `rows × rows` board.
    ///
    /// Scans up, down, left, right and keeps every in-bounds position for
    /// which `walkable` returns `true`. Only this cell is modified.
    pub fn compute_neighbors(&mut self, rows: i32, walkable: impl Fn(Point) -> bool) {
        self.neighbors.clear();
        let here = self.pos();
        for d in DIRS {
            let n = here + d;
            let in_bounds = n.x >= 0 && n.y >= 0 && n.x < rows && n.y < rows;
            if in_bounds && walkable(n) {
                self.neighbors.push(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_in_up_down_left_right_order() {
        let mut c = Cell::new(1, 1);
        c.compute_neighbors(3, |_| true);
        assert_eq!(
            c.neighbors(),
            &[Point::at(0, 1), Point::at(2, 1), Point::at(1, 0), Point::at(1, 2)]
        );
    }

    #[test]
    fn corner_cell_has_two_neighbors() {
        let mut c = Cell::new(0, 0);
        c.compute_neighbors(3, |_| true);
        assert_eq!(c.neighbors(), &[Point::at(1, 0), Point::at(0, 1)]);
    }

    #[test]
    fn unwalkable_positions_are_skipped() {
        let mut c = Cell::new(1, 1);
        c.compute_neighbors(3, |p| p != Point::at(2, 1));
        assert!(!c.neighbors().contains(&Point::at(2, 1)));
        assert_eq!(c.neighbors().len(), 3);
    }

    #[test]
    fn recompute_replaces_previous_list() {
        let mut c = Cell::new(1, 1);
        c.compute_neighbors(3, |_| true);
        c.compute_neighbors(3, |_| true);
        assert_eq!(c.neighbors().len(), 4);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut c = Cell::new(0, 0);
        c.reset();
        assert!(c.is_empty());
        c.reset();
        assert_eq!(c.state(), CellState::Empty);
    }

    #[test]
    fn state_mutators() {
        let mut c = Cell::new(2, 3);
        assert_eq!(c.position(), (2, 3));
        c.make_obstacle();
        assert!(c.is_obstacle());
        c.make_open();
        assert!(c.is_open() && c.state().is_overlay());
        c.make_closed();
        assert!(c.is_closed());
        c.make_path();
        assert!(c.is_path());
        c.make_start();
        assert!(c.is_start() && !c.state().is_overlay());
        c.make_end();
        assert!(c.is_end());
    }
}
