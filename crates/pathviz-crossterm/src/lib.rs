//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`CrosstermDriver`] that implements [`pathviz_core::Driver`],
//! translating terminal key and mouse events into [`Msg`]s and painting
//! diff [`Frame`]s with queued crossterm commands.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{
    app::{Context, Driver},
    messages::{Button, Key, MouseAction, Msg},
    screen::Frame,
    style::{AttrMask, Color},
    Point,
};

const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

fn to_button(b: MouseButton) -> Option<Button> {
    match b {
        MouseButton::Left => Some(Button::Main),
        MouseButton::Right => Some(Button::Secondary),
        MouseButton::Middle => None,
    }
}

/// Maps a crossterm mouse event kind to a [`MouseAction`]. Plain motion,
/// scrolling and the middle button are dropped.
fn to_mouse_action(kind: MouseEventKind) -> Option<MouseAction> {
    match kind {
        MouseEventKind::Down(b) => to_button(b).map(MouseAction::Press),
        MouseEventKind::Drag(b) => to_button(b).map(MouseAction::Drag),
        MouseEventKind::Up(_) => Some(MouseAction::Release),
        _ => None,
    }
}

/// Translate one terminal event into a message, if it maps to one.
fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            // Release/repeat events only arrive with keyboard enhancement
            // flags; treat presses as the single source of key input.
            if kind != KeyEventKind::Press {
                return None;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Some(Msg::Quit);
            }
            to_key(code).map(Msg::Key)
        }
        Event::Mouse(me) => to_mouse_action(me.kind).map(|action| Msg::Mouse {
            action,
            pos: Point::new(me.column as i32, me.row as i32),
        }),
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm. Mouse capture is always on, since
/// cells are painted with the mouse.
pub struct CrosstermDriver {
    frame: Duration,
}

impl CrosstermDriver {
    /// Create a new driver polling at roughly 60 frames per second.
    pub fn new() -> Self {
        Self {
            frame: DEFAULT_FRAME,
        }
    }

    /// Configure how long a poll waits for input before returning.
    pub fn with_frame_interval(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableMouseCapture
        )?;
        log::debug!("crossterm driver initialised, frame {:?}", self.frame);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(self.frame)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(m) = to_msg(event::read()?) {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();

        for fg in &frame.glyphs {
            let p = fg.pos;
            let glyph = &fg.glyph;

            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(glyph.style.fg)),
                SetBackgroundColor(to_ct_color(glyph.style.bg))
            )?;

            let attrs = glyph.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }

            write!(stdout, "{}", glyph.ch)?;

            if !attrs.is_empty() {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn space_maps_to_space_key() {
        assert_eq!(
            to_msg(key_event(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Msg::Key(Key::Space))
        );
        assert_eq!(
            to_msg(key_event(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Msg::Key(Key::Escape))
        );
        assert_eq!(to_msg(key_event(KeyCode::Up, KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            to_msg(key_event(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Msg::Quit)
        );
    }

    fn mouse_event(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn right_drag_is_a_secondary_drag_at_the_cell() {
        assert_eq!(
            to_msg(mouse_event(MouseEventKind::Drag(MouseButton::Right), 7, 3)),
            Some(Msg::Mouse {
                action: MouseAction::Drag(Button::Secondary),
                pos: Point::new(7, 3),
            })
        );
    }

    #[test]
    fn motion_and_middle_button_are_dropped() {
        assert_eq!(to_msg(mouse_event(MouseEventKind::Moved, 1, 1)), None);
        assert_eq!(
            to_msg(mouse_event(MouseEventKind::Down(MouseButton::Middle), 1, 1)),
            None
        );
    }

    #[test]
    fn default_colour_resets() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::from_rgb(1, 2, 3)),
            CtColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
