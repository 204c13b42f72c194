//! Command-line options and the validated [`Config`] built from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Rows of the board plus the status and help lines below it.
const FOOTER_LINES: i32 = 2;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Interactive A* path-finding visualizer")]
pub struct Cli {
    /// Number of rows (and columns) of the square board.
    #[arg(long, default_value_t = 25)]
    pub rows: i32,

    /// Terminal columns used to draw one cell.
    #[arg(long, default_value_t = 2)]
    pub cell_width: i32,

    /// Milliseconds per animation frame.
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Obstacle probability used by the scatter key.
    #[arg(long, default_value_t = 0.3)]
    pub density: f64,

    /// Seed for obstacle scattering; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file. Nothing is logged otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("--rows must be between 2 and {max}, got {rows}")]
    Rows { rows: i32, max: i32 },

    #[error("--cell-width must be between 1 and 8, got {0}")]
    CellWidth(i32),

    #[error("--frame-ms must be at least 1")]
    FrameTime,

    #[error("--density must be within [0, 1], got {0}")]
    Density(f64),
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: i32,
    pub cell_width: i32,
    pub frame: Duration,
    pub density: f64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 25,
            cell_width: 2,
            frame: Duration::from_millis(16),
            density: 0.3,
            seed: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Largest board whose screen still fits crossterm's `u16` coordinates.
    pub const MAX_ROWS: i32 = 200;

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if !(2..=Self::MAX_ROWS).contains(&cli.rows) {
            return Err(ConfigError::Rows {
                rows: cli.rows,
                max: Self::MAX_ROWS,
            });
        }
        if !(1..=8).contains(&cli.cell_width) {
            return Err(ConfigError::CellWidth(cli.cell_width));
        }
        if cli.frame_ms == 0 {
            return Err(ConfigError::FrameTime);
        }
        if !(0.0..=1.0).contains(&cli.density) {
            return Err(ConfigError::Density(cli.density));
        }
        Ok(Self {
            rows: cli.rows,
            cell_width: cli.cell_width,
            frame: Duration::from_millis(cli.frame_ms),
            density: cli.density,
            seed: cli.seed,
            log_file: cli.log_file,
        })
    }

    /// Width of the canvas the board is laid out on. One terminal row is
    /// treated as `cell_width` pixels tall so cells come out square.
    #[inline]
    pub fn pixel_width(&self) -> i32 {
        self.rows * self.cell_width
    }

    /// Terminal `(width, height)` needed by the visualizer.
    #[inline]
    pub fn screen_size(&self) -> (i32, i32) {
        let width = self.pixel_width().max(crate::visualizer::HELP.len() as i32);
        (width, self.rows + FOOTER_LINES)
    }
}
