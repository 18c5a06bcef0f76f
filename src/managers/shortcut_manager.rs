//! Shortcut Manager for Relaybrowser.
//!
//! Application shortcuts keyed by a normalized key-combination string
//! (`"ctrl+shift+tab"`). Lookup is a pure function of that string, so the
//! input translator can ask whether a key event belongs to the application
//! before forwarding it to the remote page.

use std::collections::HashMap;

use crate::types::errors::ShortcutError;
use crate::types::input::Modifiers;

/// Where a shortcut applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Always runs.
    Global,
    /// Runs only while the remote page has keyboard focus.
    Webpage,
}

/// Application actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    NewTab,
    CloseTab,
    SelectAll,
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
    FocusAddressBar,
    NextTab,
    PreviousTab,
}

impl ShortcutAction {
    pub fn context(self) -> ShortcutContext {
        match self {
            ShortcutAction::SelectAll
            | ShortcutAction::Copy
            | ShortcutAction::Paste
            | ShortcutAction::Cut
            | ShortcutAction::Undo
            | ShortcutAction::Redo => ShortcutContext::Webpage,
            ShortcutAction::NewTab
            | ShortcutAction::CloseTab
            | ShortcutAction::FocusAddressBar
            | ShortcutAction::NextTab
            | ShortcutAction::PreviousTab => ShortcutContext::Global,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShortcutAction::NewTab => "new_tab",
            ShortcutAction::CloseTab => "close_tab",
            ShortcutAction::SelectAll => "select_all",
            ShortcutAction::Copy => "copy",
            ShortcutAction::Paste => "paste",
            ShortcutAction::Cut => "cut",
            ShortcutAction::Undo => "undo",
            ShortcutAction::Redo => "redo",
            ShortcutAction::FocusAddressBar => "focus_address_bar",
            ShortcutAction::NextTab => "next_tab",
            ShortcutAction::PreviousTab => "previous_tab",
        }
    }
}

const MODIFIER_CODES: &[&str] = &[
    "ControlLeft",
    "ControlRight",
    "ShiftLeft",
    "ShiftRight",
    "AltLeft",
    "AltRight",
    "MetaLeft",
    "MetaRight",
];

/// Builds the normalized combination string for a key event.
///
/// Modifiers come first in `ctrl+shift+alt+meta` order. The key part is
/// derived from the physical code (`KeyT` → `t`, `Digit1` → `1`, otherwise the
/// lower-cased code) and omitted for bare modifier keys.
pub fn combo_for(code: &str, modifiers: Modifiers) -> String {
    let mut parts: Vec<String> = modifier_parts(modifiers)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !MODIFIER_CODES.contains(&code) {
        parts.push(key_name(code));
    }
    parts.join("+")
}

fn modifier_parts(modifiers: Modifiers) -> Vec<&'static str> {
    let mut parts = Vec::with_capacity(4);
    if modifiers.ctrl {
        parts.push("ctrl");
    }
    if modifiers.shift {
        parts.push("shift");
    }
    if modifiers.alt {
        parts.push("alt");
    }
    if modifiers.meta {
        parts.push("meta");
    }
    parts
}

fn key_name(code: &str) -> String {
    let stripped = code
        .strip_prefix("Key")
        .or_else(|| code.strip_prefix("Digit"))
        .filter(|rest| rest.len() == 1);
    stripped.unwrap_or(code).to_ascii_lowercase()
}

/// Parses a user-written combination (`"Ctrl+Shift+Tab"`) into normalized form.
pub fn normalize_keys(keys: &str) -> Result<String, ShortcutError> {
    let mut modifiers = Modifiers::NONE;
    let mut key: Option<String> = None;

    for part in keys.split('+').map(str::trim) {
        match part.to_ascii_lowercase().as_str() {
            "" => return Err(ShortcutError::InvalidKeys(keys.to_string())),
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            "meta" | "cmd" | "super" => modifiers.meta = true,
            other => {
                if key.is_some() {
                    return Err(ShortcutError::InvalidKeys(keys.to_string()));
                }
                key = Some(other.to_string());
            }
        }
    }

    let key = key.ok_or_else(|| ShortcutError::InvalidKeys(keys.to_string()))?;
    let mut parts: Vec<&str> = modifier_parts(modifiers);
    parts.push(&key);
    Ok(parts.join("+"))
}

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register(&mut self, keys: &str, action: ShortcutAction) -> Result<(), ShortcutError>;
    fn unregister(&mut self, keys: &str) -> Result<(), ShortcutError>;
    /// The action to run for `combo`, honouring its context.
    fn resolve(&self, combo: &str, browser_focused: bool) -> Option<ShortcutAction>;
    /// Whether `combo` is bound at all, regardless of context.
    fn has_conflict(&self, combo: &str) -> bool;
    fn list(&self) -> Vec<(String, ShortcutAction)>;
    fn reset_to_defaults(&mut self);
}

/// In-memory shortcut table.
pub struct ShortcutManager {
    shortcuts: HashMap<String, ShortcutAction>,
}

impl ShortcutManager {
    pub fn new() -> Self {
        Self {
            shortcuts: Self::default_shortcuts(),
        }
    }

    pub fn default_shortcuts() -> HashMap<String, ShortcutAction> {
        [
            ("ctrl+t", ShortcutAction::NewTab),
            ("ctrl+w", ShortcutAction::CloseTab),
            ("ctrl+a", ShortcutAction::SelectAll),
            ("ctrl+c", ShortcutAction::Copy),
            ("ctrl+v", ShortcutAction::Paste),
            ("ctrl+x", ShortcutAction::Cut),
            ("ctrl+z", ShortcutAction::Undo),
            ("ctrl+y", ShortcutAction::Redo),
            ("alt+g", ShortcutAction::FocusAddressBar),
            ("ctrl+tab", ShortcutAction::NextTab),
            ("ctrl+shift+tab", ShortcutAction::PreviousTab),
        ]
        .into_iter()
        .map(|(k, a)| (k.to_string(), a))
        .collect()
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register(&mut self, keys: &str, action: ShortcutAction) -> Result<(), ShortcutError> {
        let combo = normalize_keys(keys)?;
        if let Some(existing) = self.shortcuts.get(&combo) {
            if *existing != action {
                return Err(ShortcutError::Conflict(format!(
                    "'{}' is already bound to '{}'",
                    combo,
                    existing.as_str()
                )));
            }
        }
        self.shortcuts.insert(combo, action);
        Ok(())
    }

    fn unregister(&mut self, keys: &str) -> Result<(), ShortcutError> {
        let combo = normalize_keys(keys)?;
        self.shortcuts
            .remove(&combo)
            .map(|_| ())
            .ok_or(ShortcutError::NotFound(combo))
    }

    fn resolve(&self, combo: &str, browser_focused: bool) -> Option<ShortcutAction> {
        let action = *self.shortcuts.get(combo)?;
        match action.context() {
            ShortcutContext::Global => Some(action),
            ShortcutContext::Webpage if browser_focused => Some(action),
            ShortcutContext::Webpage => None,
        }
    }

    fn has_conflict(&self, combo: &str) -> bool {
        self.shortcuts.contains_key(combo)
    }

    fn list(&self) -> Vec<(String, ShortcutAction)> {
        let mut all: Vec<_> = self
            .shortcuts
            .iter()
            .map(|(k, a)| (k.clone(), *a))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    fn reset_to_defaults(&mut self) {
        self.shortcuts = Self::default_shortcuts();
    }
}
