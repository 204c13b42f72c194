//! The interactive board model.
//!
//! Left-click places the start, then the end, then obstacles; right-click
//! erases. Space runs A* one step per frame so the open set can be watched
//! growing towards the end.

use pathviz_core::{
    AttrMask, Button, Color, Effect, Glyph, Key, Model, MouseAction, Msg, Point, Range, Screen,
    Style, tick,
};
use pathviz_search::{Board, BoardError, CellState, Search, Step};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::palette;

/// Key reference shown on the last screen line.
pub const HELP: &str = "LMB paint  RMB erase  SPACE run  x clear  r scatter  c reset  q quit";

const READY: &str = "place a start and an end, then press space";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

pub struct Visualizer {
    board: Board,
    search: Option<Search>,
    rng: StdRng,
    density: f64,
    status: Status,
}

impl Visualizer {
    pub fn new(config: &Config) -> Result<Self, BoardError> {
        let board = Board::new(config.rows, config.pixel_width())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            board,
            search: None,
            rng,
            density: config.density,
            status: Status::Info(READY.into()),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether a search is currently being animated.
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Text of the status line.
    pub fn status(&self) -> &str {
        match &self.status {
            Status::Info(s) | Status::Error(s) => s,
        }
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.status = Status::Info(msg.into());
    }

    /// Map a terminal position to a board cell. Terminal rows stand in for
    /// `cell_width` pixels so that each cell keeps a square footprint.
    fn cell_under(&self, pos: Point) -> Option<Point> {
        let pixel = Point::new(pos.x, pos.y * self.board.cell_width());
        self.board.cell_at(pixel)
    }

    fn start_search(&mut self) -> Option<Effect> {
        if self.search.is_some() {
            return None;
        }
        self.board.clear_search();
        self.board.recompute_all_neighbors();
        match Search::new(&self.board) {
            Ok(search) => {
                log::info!("searching from {} to {}", search.start(), search.end());
                self.search = Some(search);
                self.info("searching...");
                Some(tick())
            }
            Err(e) => {
                log::warn!("cannot start search: {e}");
                self.status = Status::Error(e.to_string());
                None
            }
        }
    }

    fn advance(&mut self) -> Option<Effect> {
        let search = self.search.as_mut()?;
        match search.step(&mut self.board) {
            Step::Expanded { .. } | Step::Traced(_) => Some(tick()),
            Step::Finished(outcome) => {
                let expanded = search.expanded();
                self.search = None;
                let text = if outcome.is_found() {
                    format!(
                        "path found: {} steps, {expanded} cells expanded",
                        outcome.steps().unwrap_or_default()
                    )
                } else {
                    format!("no path ({expanded} cells expanded)")
                };
                log::info!("{text}");
                self.info(text);
                None
            }
        }
    }

    fn abort(&mut self) {
        if self.search.take().is_some() {
            log::debug!("search aborted");
        }
    }

    fn edit(&mut self, action: MouseAction, pos: Point) {
        // The board must not change under a running search.
        if self.search.is_some() {
            return;
        }
        let (Some(button), Some(p)) = (action.button(), self.cell_under(pos)) else {
            return;
        };
        match button {
            Button::Main => {
                if let Some(state) = self.board.paint(p) {
                    log::trace!("painted {p} as {state:?}");
                }
            }
            Button::Secondary => {
                self.board.erase(p);
            }
        }
    }

    fn key_down(&mut self, key: Key) -> Option<Effect> {
        match key {
            Key::Escape | Key::Char('q') => return Some(Effect::End),
            Key::Space => return self.start_search(),
            Key::Char('c') => {
                self.abort();
                self.board.reset();
                self.info(READY);
            }
            Key::Char('x') => {
                self.abort();
                let n = self.board.clear_search();
                self.info(format!("cleared {n} cells"));
            }
            Key::Char('r') if self.search.is_none() => {
                let n = self.board.scatter_obstacles(&mut self.rng, self.density);
                self.info(format!("scattered {n} obstacles"));
            }
            _ => {}
        }
        None
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::info!(
                    "board of {0}x{0} cells, {1} columns each",
                    self.board.rows(),
                    self.board.cell_width()
                );
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::Tick => self.advance(),
            Msg::Key(key) => self.key_down(key),
            Msg::Mouse { action, pos } => {
                self.edit(action, pos);
                None
            }
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, screen: &mut Screen) {
        screen.fill(Glyph::blank(palette::FOOTER_BG));

        let w = self.board.cell_width();
        let dot = Style::new().with_fg(Color::from_rgb(180, 180, 180));
        for cell in self.board.cells() {
            let p = cell.pos();
            let x = self.board.cell_origin(p).x;
            let bg = palette::state_color(cell.state());
            screen.fill_range(Range::new(x, p.y, x + w, p.y + 1), Glyph::blank(bg));
            if cell.state() == CellState::Empty {
                screen.set(
                    Point::new(x, p.y),
                    Glyph::blank(bg).with_style(dot.with_bg(bg)).with_char('·'),
                );
            }
        }

        let (fg, attrs) = match self.status {
            Status::Info(_) => (palette::FOOTER_FG, AttrMask::NONE),
            Status::Error(_) => (palette::ERROR_FG, AttrMask::BOLD),
        };
        let footer = Style::new()
            .with_fg(fg)
            .with_bg(palette::FOOTER_BG)
            .with_attrs(attrs);
        let rows = self.board.rows();
        screen.print(
            Point::new(0, rows),
            self.status(),
            Glyph::default().with_style(footer),
        );
        screen.print(
            Point::new(0, rows + 1),
            HELP,
            Glyph::default().with_style(
                Style::new()
                    .with_fg(palette::FOOTER_FG)
                    .with_bg(palette::FOOTER_BG)
                    .with_attrs(AttrMask::DIM),
            ),
        );
    }
}
