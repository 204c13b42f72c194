use pathviz_core::{Point, Range};
use rand::Rng;

use crate::cell::{Cell, CellState};
use crate::error::BoardError;

/// A square grid of [`Cell`]s plus the user's endpoint choices.
///
/// Neighbour lists are only rebuilt by [`recompute_all_neighbors`]; edits
/// that change which cells are obstacles mark them stale until then.
///
/// [`recompute_all_neighbors`]: Board::recompute_all_neighbors
#[derive(Clone, Debug)]
pub struct Board {
    rows: i32,
    cell_width: i32,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    stale: bool,
}

impl Board {
    /// Build a `rows × rows` board for a square canvas `pixel_width` wide.
    pub fn new(rows: i32, pixel_width: i32) -> Result<Self, BoardError> {
        if rows <= 0 {
            return Err(BoardError::Empty { rows });
        }
        let cell_width = pixel_width / rows;
        if cell_width <= 0 {
            return Err(BoardError::CellTooSmall { rows, pixel_width });
        }
        Ok(Self {
            rows,
            cell_width,
            cells: Self::fresh_cells(rows),
            start: None,
            end: None,
            stale: true,
        })
    }

    fn fresh_cells(rows: i32) -> Vec<Cell> {
        Range::new(0, 0, rows, rows)
            .iter()
            .map(|p| Cell::new(p.y, p.x))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Side length of one cell in pixels.
    #[inline]
    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    /// Side length of the drawn board in pixels.
    #[inline]
    pub fn pixel_width(&self) -> i32 {
        self.rows * self.cell_width
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.rows, self.rows)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Flat row-major index of `p`.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| p.y as usize * self.rows as usize + p.x as usize)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let rows = self.rows as usize;
        Point::new((idx % rows) as i32, (idx / rows) as i32)
    }

    /// Map a pixel coordinate to the cell under it.
    ///
    /// Returns `None` for negative coordinates and for anything past the
    /// last row or column.
    pub fn cell_at(&self, pixel: Point) -> Option<Point> {
        if pixel.x < 0 || pixel.y < 0 {
            return None;
        }
        let p = Point::at(pixel.y / self.cell_width, pixel.x / self.cell_width);
        self.contains(p).then_some(p)
    }

    /// Top-left pixel of the cell at `p`.
    #[inline]
    pub fn cell_origin(&self, p: Point) -> Point {
        Point::new(p.x * self.cell_width, p.y * self.cell_width)
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Mutable access to one cell.
    ///
    /// Changes made through this handle bypass endpoint and staleness
    /// bookkeeping; prefer the editing methods below for user edits.
    pub fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        self.idx(p).map(|i| &mut self.cells[i])
    }

    /// State at `p`, or `None` outside the board.
    #[inline]
    pub fn state(&self, p: Point) -> Option<CellState> {
        self.cell(p).map(Cell::state)
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Whether obstacles changed since the last neighbour recompute.
    #[inline]
    pub fn neighbors_stale(&self) -> bool {
        self.stale
    }

    // -----------------------------------------------------------------------
    // Neighbours
    // -----------------------------------------------------------------------

    /// Rebuild every cell's neighbour list, in row-major order, from the
    /// current obstacle layout.
    pub fn recompute_all_neighbors(&mut self) {
        let blocked: Vec<bool> = self.cells.iter().map(Cell::is_obstacle).collect();
        let rows = self.rows;
        let width = rows as usize;
        for cell in &mut self.cells {
            cell.compute_neighbors(rows, |p| !blocked[p.y as usize * width + p.x as usize]);
        }
        self.stale = false;
        log::debug!("recomputed neighbours for {} cells", self.cells.len());
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Write `state` at index `i`, keeping the staleness flag honest.
    fn write(&mut self, i: usize, state: CellState) {
        let cell = &mut self.cells[i];
        if cell.is_obstacle() != (state == CellState::Obstacle) {
            self.stale = true;
        }
        cell.set_state(state);
    }

    /// Forget `p` as an endpoint if it is one.
    fn release_endpoint(&mut self, p: Point) {
        if self.start == Some(p) {
            self.start = None;
        }
        if self.end == Some(p) {
            self.end = None;
        }
    }

    /// Primary-button paint at `p`.
    ///
    /// Places the start if there is none, otherwise the end if there is
    /// none, otherwise an obstacle. Endpoints themselves are never painted
    /// over. Returns the new state, or `None` if nothing changed.
    pub fn paint(&mut self, p: Point) -> Option<CellState> {
        let i = self.idx(p)?;
        let state = if self.start.is_none() && self.end != Some(p) {
            self.start = Some(p);
            CellState::Start
        } else if self.end.is_none() && self.start != Some(p) {
            self.end = Some(p);
            CellState::End
        } else if self.start != Some(p) && self.end != Some(p) {
            CellState::Obstacle
        } else {
            return None;
        };
        if self.cells[i].state() == state {
            return None;
        }
        self.write(i, state);
        Some(state)
    }

    /// Secondary-button erase at `p`: back to `Empty`, dropping the
    /// endpoint if `p` was one. Returns `false` outside the board.
    pub fn erase(&mut self, p: Point) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        self.release_endpoint(p);
        self.write(i, CellState::Empty);
        true
    }

    /// Place the start at `p`, moving it if one already exists.
    pub fn set_start(&mut self, p: Point) -> Result<(), BoardError> {
        let i = self.idx(p).ok_or(BoardError::OutOfBounds { pos: p })?;
        if let Some(old) = self.start.filter(|&old| old != p) {
            self.erase(old);
        }
        self.release_endpoint(p);
        self.start = Some(p);
        self.write(i, CellState::Start);
        Ok(())
    }

    /// Place the end at `p`, moving it if one already exists.
    pub fn set_end(&mut self, p: Point) -> Result<(), BoardError> {
        let i = self.idx(p).ok_or(BoardError::OutOfBounds { pos: p })?;
        if let Some(old) = self.end.filter(|&old| old != p) {
            self.erase(old);
        }
        self.release_endpoint(p);
        self.end = Some(p);
        self.write(i, CellState::End);
        Ok(())
    }

    /// Turn `p` into an obstacle, dropping the endpoint if `p` was one.
    pub fn set_obstacle(&mut self, p: Point) -> Result<(), BoardError> {
        let i = self.idx(p).ok_or(BoardError::OutOfBounds { pos: p })?;
        self.release_endpoint(p);
        self.write(i, CellState::Obstacle);
        Ok(())
    }

    /// Remove every `Open`, `Closed` and `Path` overlay, keeping the
    /// endpoints and obstacles. Returns the number of cells cleared.
    pub fn clear_search(&mut self) -> usize {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if cell.state().is_overlay() {
                cell.reset();
                cleared += 1;
            }
        }
        cleared
    }

    /// Rebuild every cell from scratch and forget both endpoints.
    pub fn reset(&mut self) {
        self.cells = Self::fresh_cells(self.rows);
        self.start = None;
        self.end = None;
        self.stale = true;
    }

    /// Turn each `Empty` cell into an obstacle with probability `density`
    /// (clamped to `[0, 1]`). Returns the number of obstacles added.
    pub fn scatter_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) -> usize {
        let density = density.clamp(0.0, 1.0);
        let mut added = 0;
        for i in 0..self.cells.len() {
            if self.cells[i].is_empty() && rng.random_bool(density) {
                self.write(i, CellState::Obstacle);
                added += 1;
            }
        }
        added
    }
}
