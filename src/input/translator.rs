//! Routes local input to the active tab's remote page.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::TabConnection;
use crate::managers::shortcut_manager::{combo_for, ShortcutAction, ShortcutManagerTrait};
use crate::render::mapper::CoordinateMapping;
use crate::types::errors::EngineError;
use crate::types::input::{KeyEvent, PointerEvent};
use crate::types::keycode::KeyCode;
use crate::types::tab::TabId;

use super::keycodes;

/// What happened to a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Matched an application shortcut runnable in the current context.
    Shortcut(ShortcutAction),
    /// Matched an application shortcut that does not run here; not forwarded.
    Consumed,
    /// Sent to the remote page.
    Forwarded { prevent_default: bool },
    /// Dropped: no tab bound, or nothing forwardable.
    Ignored { prevent_default: bool },
}

/// Binds local input to exactly one tab connection at a time.
#[derive(Default)]
pub struct InputTranslator {
    connection: Option<Arc<dyn TabConnection>>,
    browser_focused: bool,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches input to another tab, or detaches with `None`.
    ///
    /// A focused display hands its focus over to the newly bound page.
    pub fn bind(&mut self, connection: Option<Arc<dyn TabConnection>>) {
        if self.bound_tab() == connection.as_ref().map(|c| c.id()) {
            return;
        }
        self.connection = connection;
        debug!(tab = ?self.bound_tab(), "input rebound");
        if self.browser_focused {
            self.send("focus", |c| c.focus(true));
        }
    }

    pub fn bound_tab(&self) -> Option<TabId> {
        self.connection.as_ref().map(|c| c.id())
    }

    /// Whether the display surface currently has keyboard focus.
    pub fn browser_focused(&self) -> bool {
        self.browser_focused
    }

    /// Maps a pointer event into remote coordinates and forwards it.
    ///
    /// Wheel deltas are sign-inverted on the way out. Returns whether the event was sent.
    pub fn pointer<M>(&self, event: PointerEvent, mapping: &M) -> bool
    where
        M: CoordinateMapping + ?Sized,
    {
        match event {
            PointerEvent::Move { x, y } => {
                let (rx, ry) = remote_point(mapping, x, y);
                self.send("mouse_move", |c| c.mouse_move(rx, ry))
            }
            PointerEvent::Button {
                x,
                y,
                button,
                pressed,
            } => {
                let (rx, ry) = remote_point(mapping, x, y);
                self.send("click", |c| c.click(rx, ry, button, pressed))
            }
            PointerEvent::Wheel {
                x,
                y,
                delta_x,
                delta_y,
            } => {
                let (rx, ry) = remote_point(mapping, x, y);
                let (dx, dy) = (-delta_x.round() as i32, -delta_y.round() as i32);
                self.send("scroll", |c| c.scroll(rx, ry, dx, dy))
            }
        }
    }

    /// Handles a key event: application shortcuts first, then the remote page.
    pub fn key(&self, event: &KeyEvent, shortcuts: &dyn ShortcutManagerTrait) -> KeyOutcome {
        let combo = combo_for(&event.code, event.modifiers);
        if shortcuts.has_conflict(&combo) {
            if !event.pressed {
                return KeyOutcome::Consumed;
            }
            return match shortcuts.resolve(&combo, self.browser_focused) {
                Some(action) => KeyOutcome::Shortcut(action),
                None => KeyOutcome::Consumed,
            };
        }

        let prevent_default = event.key == "Tab" || event.code == "Tab";
        if self.connection.is_none() {
            return KeyOutcome::Ignored { prevent_default };
        }

        let code = keycodes::from_dom_code(&event.code);
        let character = if event.pressed {
            event.printable_char()
        } else {
            None
        };

        if code == KeyCode::Unknown && character.is_none() {
            return KeyOutcome::Ignored { prevent_default };
        }

        let sent = self.send("key", |c| c.key(code, character, event.pressed, event.modifiers));
        if sent {
            KeyOutcome::Forwarded { prevent_default }
        } else {
            KeyOutcome::Ignored { prevent_default }
        }
    }

    /// Records local focus and mirrors it on the remote page.
    pub fn focus(&mut self, focused: bool) -> bool {
        self.browser_focused = focused;
        self.send("focus", |c| c.focus(focused))
    }

    fn send<F>(&self, what: &str, call: F) -> bool
    where
        F: FnOnce(&dyn TabConnection) -> Result<(), EngineError>,
    {
        let Some(connection) = self.connection.as_deref() else {
            return false;
        };
        match call(connection) {
            Ok(()) => true,
            Err(e) => {
                warn!(tab = %connection.id(), error = %e, "failed to forward {}", what);
                false
            }
        }
    }
}

fn remote_point<M: CoordinateMapping + ?Sized>(mapping: &M, x: f64, y: f64) -> (i32, i32) {
    let (rx, ry) = mapping.convert_local_to_remote(x, y);
    (rx.round() as i32, ry.round() as i32)
}
