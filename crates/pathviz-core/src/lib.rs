//! **pathviz-core**: building blocks for grid-based terminal visualizers.
//!
//! This crate provides the foundational types shared by the *pathviz*
//! crates: geometry primitives, styled glyphs, a screen buffer with frame
//! diffing, input messages, the Elm-architecture application loop, and the
//! cooperative cancellation [`Context`].

pub mod app;
pub mod geom;
pub mod glyph;
pub mod messages;
pub mod screen;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model, cmd, tick};
pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use messages::*;
pub use screen::{Frame, FrameGlyph, Screen};
pub use style::{AttrMask, Color, Style};
