//! The [`Screen`] buffer and frame diffing.
//!
//! A model draws a whole [`Screen`] every update; [`compute_frame`] turns the
//! difference with the previous screen into a [`Frame`] so drivers only
//! repaint the glyphs that changed.

use crate::geom::{Point, Range};
use crate::glyph::Glyph;

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A fixed-size 2D buffer of [`Glyph`]s, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    glyphs: Vec<Glyph>,
    bounds: Range,
}

impl Screen {
    /// Create a screen of the given dimensions, filled with default glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.bounds.width() as usize + p.x as usize)
    }

    /// Read the glyph at `p`. Returns `Glyph::default()` outside bounds.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p)
            .map(|i| self.glyphs[i])
            .unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill every glyph in `r` (clipped to the screen) with `glyph`.
    pub fn fill_range(&mut self, r: Range, glyph: Glyph) {
        for p in self.bounds.intersect(r) {
            self.set(p, glyph);
        }
    }

    /// Fill the whole screen with `glyph`.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` starting at `at`, one glyph per char, clipped at the
    /// right edge. Returns the number of glyphs written.
    pub fn print(&mut self, at: Point, text: &str, template: Glyph) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let p = at.shift(i as i32, 0);
            if !self.bounds.contains(p) {
                break;
            }
            self.set(p, template.with_char(ch));
            written += 1;
        }
        written
    }

    /// Copy all glyphs from `src`. Both screens must have the same size;
    /// otherwise `self` is replaced by a clone of `src`.
    pub fn copy_from(&mut self, src: &Screen) {
        if self.bounds == src.bounds {
            self.glyphs.copy_from_slice(&src.glyphs);
        } else {
            *self = src.clone();
        }
    }

    /// Row-major iterator over `(Point, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Glyph)> + '_ {
        self.bounds.iter().zip(self.glyphs.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameGlyph / compute_frame
// ---------------------------------------------------------------------------

/// A single glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameGlyph {
    pub glyph: Glyph,
    pub pos: Point,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub glyphs: Vec<FrameGlyph>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two screens.
///
/// Points of `curr` that fall outside `prev` always count as changed, so the
/// first frame after a resize repaints everything.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let bounds = curr.bounds();
    let same_size = prev.bounds() == bounds;
    let glyphs = curr
        .iter()
        .filter(|&(p, g)| !same_size || prev.at(p) != g)
        .map(|(pos, glyph)| FrameGlyph { glyph, pos })
        .collect();
    Frame {
        glyphs,
        width: bounds.width(),
        height: bounds.height(),
    }
}
