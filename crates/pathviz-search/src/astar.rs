use pathviz_core::{Context, Point};

use crate::board::Board;
use crate::distance::manhattan;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::render::{NoRender, Render};

/// Sentinel score for cells the search has not reached.
pub const UNREACHABLE: i32 = i32::MAX;

const NO_PARENT: usize = usize::MAX;

/// Result of a finished search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `path` runs from start to end, both included. It is empty when
    /// start and end are the same cell, since there is nothing to walk.
    Found { path: Vec<Point> },
    /// The frontier ran dry before the end was reached.
    NotFound,
}

impl Outcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn path(&self) -> Option<&[Point]> {
        match self {
            Self::Found { path } => Some(path),
            Self::NotFound => None,
        }
    }

    /// Number of steps on the path, if one was found.
    pub fn steps(&self) -> Option<usize> {
        self.path().map(|p| p.len().saturating_sub(1))
    }
}

/// What one call to [`Search::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// `cell` was taken off the frontier and its neighbours relaxed;
    /// `enqueued` of them joined the frontier.
    Expanded { cell: Point, enqueued: usize },
    /// One cell of the reconstructed path was marked.
    Traced(Point),
    /// The search is over. Further calls keep returning this.
    Finished(Outcome),
}

enum Phase {
    Searching,
    /// Marking `pending[next..]`, which lists the path's interior from the
    /// end side back towards the start.
    Tracing {
        pending: Vec<Point>,
        next: usize,
        path: Vec<Point>,
    },
    Done(Outcome),
}

/// One A* run over a [`Board`].
///
/// The search owns all of its bookkeeping; the board only carries the
/// visible state. Drive it with [`step`](Search::step) for frame-by-frame
/// animation or [`run`](Search::run) to completion.
pub struct Search {
    start: Point,
    end: Point,
    start_idx: usize,
    end_idx: usize,
    rows: i32,
    g: Vec<i32>,
    f: Vec<i32>,
    parent: Vec<usize>,
    members: Vec<bool>,
    open: Frontier,
    nbuf: Vec<Point>,
    /// Expanded on the previous step, closed at the start of this one so a
    /// renderer sees it before it changes colour.
    to_close: Option<usize>,
    expanded: usize,
    phase: Phase,
}

impl Search {
    /// Prepare a search between the board's start and end cells.
    pub fn new(board: &Board) -> Result<Self, SearchError> {
        let start = board.start().ok_or(SearchError::MissingStart)?;
        let end = board.end().ok_or(SearchError::MissingEnd)?;
        Self::between(board, start, end)
    }

    /// Prepare a search between explicit endpoints.
    ///
    /// Both must be on the board and not obstacles, and neighbour lists
    /// must be current. `start == end` is allowed and finishes at once with
    /// an empty path.
    pub fn between(board: &Board, start: Point, end: Point) -> Result<Self, SearchError> {
        let start_idx = board.idx(start).ok_or(SearchError::OutOfBounds { pos: start })?;
        let end_idx = board.idx(end).ok_or(SearchError::OutOfBounds { pos: end })?;
        for p in [start, end] {
            if board.cell(p).is_some_and(|c| c.is_obstacle()) {
                return Err(SearchError::Blocked { pos: p });
            }
        }
        if board.neighbors_stale() {
            return Err(SearchError::StaleNeighbors);
        }

        let len = board.len();
        let mut search = Self {
            start,
            end,
            start_idx,
            end_idx,
            rows: board.rows(),
            g: vec![UNREACHABLE; len],
            f: vec![UNREACHABLE; len],
            parent: vec![NO_PARENT; len],
            members: vec![false; len],
            open: Frontier::new(),
            nbuf: Vec::with_capacity(4),
            to_close: None,
            expanded: 0,
            phase: Phase::Searching,
        };

        if start_idx == end_idx {
            search.phase = Phase::Done(Outcome::Found { path: Vec::new() });
            return Ok(search);
        }

        search.g[start_idx] = 0;
        search.f[start_idx] = manhattan(start, end);
        search.open.push(search.f[start_idx], start_idx);
        search.members[start_idx] = true;
        log::debug!("search from {start} to {end}, h = {}", search.f[start_idx]);
        Ok(search)
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Number of cells expanded so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// The outcome, once finished.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Done(o) => Some(o),
            _ => None,
        }
    }

    fn idx(&self, p: Point) -> Option<usize> {
        let inside = p.x >= 0 && p.y >= 0 && p.x < self.rows && p.y < self.rows;
        inside.then(|| p.y as usize * self.rows as usize + p.x as usize)
    }

    fn point(&self, idx: usize) -> Point {
        let rows = self.rows as usize;
        Point::new((idx % rows) as i32, (idx / rows) as i32)
    }

    /// Best known cost from the start to `p`, or [`UNREACHABLE`].
    pub fn g_score(&self, p: Point) -> i32 {
        self.idx(p).map_or(UNREACHABLE, |i| self.g[i])
    }

    /// `g + h` for `p`, or [`UNREACHABLE`].
    pub fn f_score(&self, p: Point) -> i32 {
        self.idx(p).map_or(UNREACHABLE, |i| self.f[i])
    }

    /// The cell `p` was reached from on its best known path.
    pub fn came_from(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        (self.parent[i] != NO_PARENT).then(|| self.point(self.parent[i]))
    }

    /// Advance by one unit of work.
    ///
    /// `board` must be the board this search was created for.
    pub fn step(&mut self, board: &mut Board) -> Step {
        debug_assert_eq!(board.rows(), self.rows, "search used with another board");

        self.flush_close(board);
        match self.phase {
            Phase::Searching => self.expand(board),
            Phase::Tracing { .. } => self.trace(board),
            Phase::Done(ref outcome) => Step::Finished(outcome.clone()),
        }
    }

    /// Mark the previously expanded cell `Closed`. Closing lags one step
    /// so a renderer sees the expansion before the cell changes colour.
    fn flush_close(&mut self, board: &mut Board) {
        if let Some(ci) = self.to_close.take() {
            if let Some(cell) = board.cell_mut(self.point(ci)) {
                cell.make_closed();
            }
        }
    }

    fn expand(&mut self, board: &mut Board) -> Step {
        let ci = loop {
            let Some(entry) = self.open.pop() else {
                log::debug!(
                    "no path from {} to {} after {} expansions",
                    self.start,
                    self.end,
                    self.expanded
                );
                self.phase = Phase::Done(Outcome::NotFound);
                return Step::Finished(Outcome::NotFound);
            };
            if self.members[entry.idx] {
                log::trace!("dequeue {} f={} #{}", self.point(entry.idx), entry.f, entry.order);
                break entry.idx;
            }
        };
        self.members[ci] = false;

        if ci == self.end_idx {
            self.begin_trace();
            return self.trace(board);
        }

        let cp = self.point(ci);
        let tentative = self.g[ci] + 1;
        self.nbuf.clear();
        if let Some(cell) = board.cell(cp) {
            self.nbuf.extend_from_slice(cell.neighbors());
        }

        let mut enqueued = 0;
        for k in 0..self.nbuf.len() {
            let np = self.nbuf[k];
            let Some(ni) = self.idx(np) else {
                continue;
            };
            if tentative >= self.g[ni] {
                continue;
            }
            self.parent[ni] = ci;
            self.g[ni] = tentative;
            self.f[ni] = tentative + manhattan(np, self.end);

            if !self.members[ni] {
                let order = self.open.push(self.f[ni], ni);
                self.members[ni] = true;
                enqueued += 1;
                log::trace!("enqueue {np} g={tentative} f={} #{order}", self.f[ni]);
                if ni != self.end_idx && ni != self.start_idx {
                    if let Some(cell) = board.cell_mut(np) {
                        cell.make_open();
                    }
                }
            }
        }

        self.expanded += 1;
        if ci != self.start_idx {
            self.to_close = Some(ci);
        }
        Step::Expanded { cell: cp, enqueued }
    }

    fn begin_trace(&mut self) {
        let mut pending = Vec::new();
        let mut ci = self.parent[self.end_idx];
        while ci != NO_PARENT && ci != self.start_idx {
            pending.push(self.point(ci));
            ci = self.parent[ci];
        }
        let mut path = Vec::with_capacity(pending.len() + 2);
        path.push(self.start);
        path.extend(pending.iter().rev());
        path.push(self.end);
        log::debug!(
            "path from {} to {}: {} steps, {} expansions, {} left queued",
            self.start,
            self.end,
            path.len() - 1,
            self.expanded,
            self.open.len()
        );
        self.phase = Phase::Tracing {
            pending,
            next: 0,
            path,
        };
    }

    fn trace(&mut self, board: &mut Board) -> Step {
        let Phase::Tracing { pending, next, path } = &mut self.phase else {
            unreachable!("trace called outside the tracing phase");
        };
        if let Some(&p) = pending.get(*next) {
            *next += 1;
            if let Some(cell) = board.cell_mut(p) {
                cell.make_path();
            }
            return Step::Traced(p);
        }

        let outcome = Outcome::Found {
            path: std::mem::take(path),
        };
        if let Some(cell) = board.cell_mut(self.end) {
            cell.make_end();
        }
        self.phase = Phase::Done(outcome.clone());
        Step::Finished(outcome)
    }

    /// Run to completion, calling `render` after every expansion and after
    /// every path cell is marked.
    ///
    /// `ctx` is checked before each step; once it is done the run stops
    /// with [`SearchError::Cancelled`] and the board keeps whatever state
    /// it had reached.
    pub fn run<R: Render + ?Sized>(
        &mut self,
        board: &mut Board,
        render: &mut R,
        ctx: &Context,
    ) -> Result<Outcome, SearchError> {
        loop {
            if ctx.is_done() {
                self.flush_close(board);
                log::debug!("search cancelled after {} expansions", self.expanded);
                return Err(SearchError::Cancelled);
            }
            match self.step(board) {
                Step::Expanded { .. } | Step::Traced(_) => render.render(board),
                Step::Finished(outcome) => return Ok(outcome),
            }
        }
    }
}

/// Recompute neighbours and search between the board's endpoints without
/// rendering.
pub fn find_path(board: &mut Board) -> Result<Outcome, SearchError> {
    board.recompute_all_neighbors();
    Search::new(board)?.run(board, &mut NoRender, &Context::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::DistanceMap;
    use crate::cell::CellState;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn board(rows: i32, start: (i32, i32), end: (i32, i32), walls: &[(i32, i32)]) -> Board {
        let mut b = Board::new(rows, rows * 20).unwrap();
        b.set_start(Point::at(start.0, start.1)).unwrap();
        b.set_end(Point::at(end.0, end.1)).unwrap();
        for &(r, c) in walls {
            b.set_obstacle(Point::at(r, c)).unwrap();
        }
        b.recompute_all_neighbors();
        b
    }

    fn assert_valid_path(b: &Board, path: &[Point]) {
        assert_eq!(path.first(), b.start().as_ref());
        assert_eq!(path.last(), b.end().as_ref());
        for w in path.windows(2) {
            assert_eq!(manhattan(w[0], w[1]), 1, "{} -> {} is not a step", w[0], w[1]);
            assert!(!b.cell(w[1]).unwrap().is_obstacle());
        }
    }

    #[test]
    fn empty_grid_corner_to_corner() {
        let mut b = board(5, (0, 0), (4, 4), &[]);
        let mut search = Search::new(&b).unwrap();
        let outcome = search.run(&mut b, &mut NoRender, &Context::new()).unwrap();
        assert_eq!(outcome.steps(), Some(8));
        assert_valid_path(&b, outcome.path().unwrap());
        assert_eq!(search.g_score(Point::at(4, 4)), 8);
    }

    #[test]
    fn wall_with_gap_routes_through_gap() {
        let wall: Vec<(i32, i32)> = (0..4).map(|r| (r, 2)).collect();
        let mut b = board(5, (0, 0), (4, 4), &wall);
        let outcome = find_path(&mut b).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(outcome.steps(), Some(8));
        assert!(path.contains(&Point::at(4, 2)));
        assert_valid_path(&b, path);
    }

    #[test]
    fn walled_in_start_finds_nothing() {
        let mut b = board(3, (0, 0), (2, 2), &[(0, 1), (1, 0)]);
        let outcome = find_path(&mut b).unwrap();
        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(b.state(Point::at(2, 2)), Some(CellState::End));
        assert!(b.cells().all(|c| !c.is_path()));
    }

    #[test]
    fn unreachable_end_closes_everything_reachable() {
        // End boxed in at the far corner.
        let mut b = board(4, (0, 0), (3, 3), &[(2, 3), (3, 2)]);
        let outcome = find_path(&mut b).unwrap();
        assert_eq!(outcome, Outcome::NotFound);
        let closed = b.cells().filter(|c| c.is_closed()).count();
        // 16 cells - 2 walls - end - start
        assert_eq!(closed, 12);
        assert_eq!(b.state(Point::at(0, 0)), Some(CellState::Start));
    }

    #[test]
    fn path_cells_marked_and_endpoints_kept() {
        let mut b = board(5, (0, 0), (0, 4), &[]);
        let outcome = find_path(&mut b).unwrap();
        assert_eq!(outcome.steps(), Some(4));
        for c in 1..4 {
            assert_eq!(b.state(Point::at(0, c)), Some(CellState::Path));
        }
        assert_eq!(b.state(Point::at(0, 0)), Some(CellState::Start));
        assert_eq!(b.state(Point::at(0, 4)), Some(CellState::End));
    }

    #[test]
    fn render_called_once_per_expansion_and_path_cell() {
        let mut b = board(5, (0, 0), (0, 4), &[]);
        let mut search = Search::new(&b).unwrap();
        let mut frames = 0;
        let mut render = |_: &Board| frames += 1;
        let outcome = search.run(&mut b, &mut render, &Context::new()).unwrap();
        let interior = outcome.steps().unwrap() - 1;
        assert_eq!(frames, search.expanded() + interior);
    }

    #[test]
    fn renderer_sees_expanded_cell_before_it_closes() {
        let mut b = board(3, (0, 0), (2, 2), &[]);
        let mut search = Search::new(&b).unwrap();
        // Expand the start, then its first neighbour (1,0).
        assert!(matches!(search.step(&mut b), Step::Expanded { .. }));
        let Step::Expanded { cell, .. } = search.step(&mut b) else {
            panic!("expected an expansion");
        };
        assert_eq!(b.state(cell), Some(CellState::Open));
        search.step(&mut b);
        assert_eq!(b.state(cell), Some(CellState::Closed));
    }

    #[test]
    fn path_is_traced_from_the_end_side() {
        // The straight run along row 0 is the only shortest path.
        let mut b = board(4, (0, 0), (0, 3), &[]);
        let mut search = Search::new(&b).unwrap();
        let traced: Vec<Point> = std::iter::from_fn(|| match search.step(&mut b) {
            Step::Finished(_) => None,
            s => Some(s),
        })
        .filter_map(|s| match s {
            Step::Traced(p) => Some(p),
            _ => None,
        })
        .collect();
        assert_eq!(traced, vec![Point::at(0, 2), Point::at(0, 1)]);
    }

    #[test]
    fn first_expansion_enqueues_in_neighbor_order() {
        let mut b = board(3, (1, 1), (0, 0), &[]);
        let mut search = Search::new(&b).unwrap();
        assert_eq!(
            search.step(&mut b),
            Step::Expanded {
                cell: Point::at(1, 1),
                enqueued: 4
            }
        );
        // up (0,1) and left (1,0) both have f = 2; up was queued first.
        match search.step(&mut b) {
            Step::Expanded { cell, .. } => assert_eq!(cell, Point::at(0, 1)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn start_equal_end_is_found_immediately() {
        let mut b = board(3, (0, 0), (2, 2), &[]);
        let p = Point::at(1, 1);
        let mut search = Search::between(&b, p, p).unwrap();
        assert!(search.is_finished());
        let outcome = search.run(&mut b, &mut NoRender, &Context::new()).unwrap();
        assert!(outcome.is_found());
        assert_eq!(outcome.path(), Some(&[][..]));
        assert_eq!(outcome.steps(), Some(0));
        assert_eq!(b.state(p), Some(CellState::Empty));
    }

    #[test]
    fn preconditions_are_reported() {
        let mut b = Board::new(3, 30).unwrap();
        b.recompute_all_neighbors();
        assert_eq!(Search::new(&b).err(), Some(SearchError::MissingStart));
        b.set_start(Point::at(0, 0)).unwrap();
        assert_eq!(Search::new(&b).err(), Some(SearchError::MissingEnd));
        b.set_end(Point::at(2, 2)).unwrap();
        assert!(Search::new(&b).is_ok());

        let outside = Point::at(3, 0);
        assert_eq!(
            Search::between(&b, outside, Point::at(2, 2)).err(),
            Some(SearchError::OutOfBounds { pos: outside })
        );

        b.set_obstacle(Point::at(1, 1)).unwrap();
        assert_eq!(Search::new(&b).err(), Some(SearchError::StaleNeighbors));
        b.recompute_all_neighbors();
        assert_eq!(
            Search::between(&b, Point::at(1, 1), Point::at(2, 2)).err(),
            Some(SearchError::Blocked {
                pos: Point::at(1, 1)
            })
        );
    }

    #[test]
    fn cancelled_context_stops_run() {
        let mut b = board(5, (0, 0), (4, 4), &[]);
        let mut search = Search::new(&b).unwrap();
        let ctx = Context::new();
        let cancel = ctx.clone();
        let mut frames = 0;
        let mut render = |_: &Board| {
            frames += 1;
            if frames == 3 {
                cancel.cancel();
            }
        };
        assert_eq!(
            search.run(&mut b, &mut render, &ctx),
            Err(SearchError::Cancelled)
        );
        assert_eq!(search.expanded(), 3);
        assert!(!search.is_finished());
    }

    #[test]
    fn cancelled_run_leaves_no_expanded_cell_open() {
        let mut b = board(5, (0, 0), (4, 4), &[]);
        let mut search = Search::new(&b).unwrap();
        let ctx = Context::new();
        let cancel = ctx.clone();
        let mut frames = 0;
        let mut render = |_: &Board| {
            frames += 1;
            if frames == 2 {
                cancel.cancel();
            }
        };
        assert_eq!(
            search.run(&mut b, &mut render, &ctx),
            Err(SearchError::Cancelled)
        );
        assert_eq!(search.expanded(), 2);

        // Down and right of the start tie on f; down was queued first.
        let second = Point::at(1, 0);
        assert_eq!(search.came_from(second), Some(Point::at(0, 0)));
        assert_eq!(b.state(second), Some(CellState::Closed));
        assert_eq!(b.state(Point::at(0, 0)), Some(CellState::Start));
        let closed = b.cells().filter(|c| c.is_closed()).count();
        assert_eq!(closed, 1);
    }

    #[test]
    fn finished_search_keeps_reporting_outcome() {
        let mut b = board(3, (0, 0), (0, 1), &[]);
        let mut search = Search::new(&b).unwrap();
        let first = search.run(&mut b, &mut NoRender, &Context::new()).unwrap();
        assert_eq!(search.step(&mut b), Step::Finished(first.clone()));
        assert_eq!(search.outcome(), Some(&first));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let walls = [(1, 1), (1, 2), (1, 3), (3, 0), (3, 1), (3, 3), (3, 4)];
        let run = || {
            let mut b = board(5, (0, 0), (4, 4), &walls);
            let mut search = Search::new(&b).unwrap();
            let outcome = search.run(&mut b, &mut NoRender, &Context::new()).unwrap();
            let scores: Vec<(i32, i32, Option<Point>)> = b
                .bounds()
                .iter()
                .map(|p| (search.g_score(p), search.f_score(p), search.came_from(p)))
                .collect();
            let states: Vec<CellState> = b.cells().map(|c| c.state()).collect();
            (outcome, scores, states)
        };
        assert_eq!(run(), run());
    }

    fn random_board(rng: &mut StdRng, rows: i32) -> Board {
        let mut b = Board::new(rows, rows).unwrap();
        b.scatter_obstacles(rng, 0.3);
        let mut pick = |b: &Board| loop {
            let p = Point::at(rng.random_range(0..rows), rng.random_range(0..rows));
            if b.state(p) == Some(CellState::Empty) {
                return p;
            }
        };
        let s = pick(&b);
        b.set_start(s).unwrap();
        let e = pick(&b);
        b.set_end(e).unwrap();
        b.recompute_all_neighbors();
        b
    }

    #[test]
    fn matches_bfs_on_random_boards() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut b = random_board(&mut rng, 8);
            let (start, end) = (b.start().unwrap(), b.end().unwrap());
            let oracle = DistanceMap::from_board(&b, start);
            let outcome = Search::new(&b)
                .unwrap()
                .run(&mut b, &mut NoRender, &Context::new())
                .unwrap();
            match oracle.at(end) {
                UNREACHABLE => assert_eq!(outcome, Outcome::NotFound),
                d => {
                    assert_eq!(outcome.steps(), Some(d as usize));
                    assert_valid_path(&b, outcome.path().unwrap());
                }
            }
        }
    }

    #[test]
    fn heuristic_never_overestimates() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let b = random_board(&mut rng, 7);
            for from in b.bounds() {
                if b.cell(from).unwrap().is_obstacle() {
                    continue;
                }
                let dist = DistanceMap::from_board(&b, from);
                for to in b.bounds() {
                    let d = dist.at(to);
                    if d != UNREACHABLE {
                        assert!(manhattan(from, to) <= d);
                    }
                }
            }
        }
    }
}
