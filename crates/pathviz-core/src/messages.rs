//! Messages the app loop hands to a [`Model`](crate::Model).
//!
//! Input is cut down to what a board editor needs: a handful of keys and
//! two-button mouse presses and drags, reported in screen cells. Animation
//! is driven by [`Msg::Tick`], which a model requests one frame ahead with
//! [`tick`](crate::app::tick).

use crate::geom::Point;

/// A pressed key. Space has its own variant because it is the usual
/// "go" key; every other printable key arrives as [`Key::Char`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Escape,
    Space,
    Char(char),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Usually the left button.
    Main,
    Secondary,
}

/// What the pointer did at the position carried by [`Msg::Mouse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    Press(Button),
    /// Moved while the button is held. Terminals report one drag per cell
    /// crossed, so a stroke arrives as a run of these.
    Drag(Button),
    Release,
}

impl MouseAction {
    /// The button pressed or held, or `None` for a release.
    #[inline]
    pub const fn button(self) -> Option<Button> {
        match self {
            Self::Press(b) | Self::Drag(b) => Some(b),
            Self::Release => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// First message of every run, before any input.
    Init,
    Key(Key),
    Mouse { action: MouseAction, pos: Point },
    /// The terminal now has this many columns and rows.
    Screen { width: i32, height: i32 },
    /// Follow-up of a [`tick`](crate::app::tick) command, one frame later.
    Tick,
    /// The user asked to leave, e.g. with Ctrl+C.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_drag_carry_their_button() {
        assert_eq!(MouseAction::Press(Button::Main).button(), Some(Button::Main));
        assert_eq!(
            MouseAction::Drag(Button::Secondary).button(),
            Some(Button::Secondary)
        );
        assert_eq!(MouseAction::Release.button(), None);
    }

    #[test]
    fn space_is_not_a_char_key() {
        assert_ne!(Msg::Key(Key::Space), Msg::Key(Key::Char(' ')));
    }
}
