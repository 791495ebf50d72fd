//! Input / event mapper
//!
//! Raw device events are first reduced to a small abstract `InputEvent`
//! vocabulary, then translated into domain `Command`s according to the
//! phase the game is in. The same key can mean different things on
//! different screens.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::display::Viewport;
use crate::engine::Phase;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    Char(char),
}

/// Device-independent input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    /// Primary button pressed at a point in arena space.
    PointerDown(Point),
    KeyDown(Key),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Quit,
    /// Activate whatever menu item lies under the point.
    Click(Point),
    Confirm,
    Back,
    SelectPrev,
    SelectNext,
    MoveLeft,
    MoveRight,
    /// Fire toward the point, or straight up.
    Fire(Option<Point>),
    TogglePause,
    Restart,
}

/// Translate one event in the context of `phase`. Events with no meaning in
/// that phase yield `None`.
pub fn map_event(phase: &Phase, event: InputEvent) -> Option<Command> {
    use Key::*;

    let key = match event {
        InputEvent::Quit => return Some(Command::Quit),
        InputEvent::PointerDown(p) => {
            return match phase {
                Phase::Menu { .. } | Phase::DifficultySelect { .. } => Some(Command::Click(p)),
                Phase::Playing => Some(Command::Fire(Some(p))),
                _ => None,
            };
        }
        InputEvent::KeyDown(Char(c)) => Char(c.to_ascii_lowercase()),
        InputEvent::KeyDown(k) => k,
    };

    if key == Char('q') {
        return Some(Command::Quit);
    }

    match phase {
        Phase::Menu { .. } => match key {
            Up => Some(Command::SelectPrev),
            Down => Some(Command::SelectNext),
            Enter | Space => Some(Command::Confirm),
            Escape => Some(Command::Quit),
            _ => None,
        },
        Phase::DifficultySelect { .. } => match key {
            Up | Left => Some(Command::SelectPrev),
            Down | Right => Some(Command::SelectNext),
            Enter | Space => Some(Command::Confirm),
            Escape => Some(Command::Back),
            _ => None,
        },
        Phase::Playing => match key {
            Left | Char('a') => Some(Command::MoveLeft),
            Right | Char('d') => Some(Command::MoveRight),
            Space | Up | Char('w') => Some(Command::Fire(None)),
            Escape | Char('p') => Some(Command::TogglePause),
            Char('r') => Some(Command::Restart),
            _ => None,
        },
        Phase::Paused => match key {
            Escape | Enter | Char('p') => Some(Command::TogglePause),
            Char('r') => Some(Command::Restart),
            _ => None,
        },
        Phase::GameOver { .. } => match key {
            Enter | Char('r') => Some(Command::Restart),
            Escape => Some(Command::Quit),
            _ => None,
        },
        Phase::Quit => None,
    }
}

/// Reduce a terminal event to an `InputEvent`. Key releases, mouse motion,
/// resizes and unbound keys are dropped.
pub fn from_terminal(event: &Event, viewport: &Viewport) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
            if *kind == KeyEventKind::Release {
                return None;
            }
            if modifiers.contains(KeyModifiers::CONTROL) && *code == KeyCode::Char('c') {
                return Some(InputEvent::Quit);
            }
            let key = match code {
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Up => Key::Up,
                KeyCode::Down => Key::Down,
                KeyCode::Enter => Key::Enter,
                KeyCode::Esc => Key::Escape,
                KeyCode::Char(' ') => Key::Space,
                KeyCode::Char(c) => Key::Char(*c),
                _ => return None,
            };
            Some(InputEvent::KeyDown(key))
        }
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(InputEvent::PointerDown(viewport.to_arena(*column, *row))),
        _ => None,
    }
}
