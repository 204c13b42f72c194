//! Interactive A* visualizer on a square board, drawn in the terminal.
//!
//! The binary wires [`Visualizer`] into a [`pathviz_core::App`] driven by
//! [`pathviz_crossterm::CrosstermDriver`].

pub mod config;
pub mod logging;
pub mod palette;
pub mod visualizer;

pub use config::{Cli, Config, ConfigError};
pub use visualizer::Visualizer;
