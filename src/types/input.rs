use serde::{Deserialize, Serialize};

/// Modifier flags carried by every key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

/// Mouse button as understood by the remote engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps the DOM `MouseEvent.button` number; auxiliary buttons are not forwarded.
    pub fn from_dom(button: u16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Local pointer input in CSS pixels relative to the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move {
        x: f64,
        y: f64,
    },
    Button {
        x: f64,
        y: f64,
        button: MouseButton,
        pressed: bool,
    },
    Wheel {
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
    },
}

/// Local keyboard input.
///
/// `code` is the physical platform key identifier (`"KeyA"`, `"ArrowUp"`),
/// `key` the produced value (`"a"`, `"A"`, `"Enter"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: String,
    pub key: String,
    pub modifiers: Modifiers,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(code: &str, key: &str, modifiers: Modifiers) -> Self {
        Self {
            code: code.to_string(),
            key: key.to_string(),
            modifiers,
            pressed: true,
        }
    }

    pub fn up(code: &str, key: &str, modifiers: Modifiers) -> Self {
        Self {
            pressed: false,
            ..Self::down(code, key, modifiers)
        }
    }

    /// The single printable character this event produces, if any.
    pub fn printable_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

/// Mouse cursor shape requested by the remote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    Pointer,
    Hand,
    IBeam,
    Crosshair,
}
