//! Platform key identifier to protocol key code table.
//!
//! Identifiers are the layout-independent physical key names carried by
//! keyboard events (`"KeyA"`, `"Digit1"`, `"ArrowUp"`, `"NumpadAdd"`).

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::warn;

use crate::types::keycode::KeyCode;

/// Every mapped platform identifier with its protocol key code.
pub const KEYCODE_TABLE: &[(&str, KeyCode)] = &[
    ("Backspace", KeyCode::Backspace),
    ("Tab", KeyCode::Tab),
    ("Enter", KeyCode::Enter),
    ("ShiftLeft", KeyCode::LeftShift),
    ("ShiftRight", KeyCode::RightShift),
    ("ControlLeft", KeyCode::LeftControl),
    ("ControlRight", KeyCode::RightControl),
    ("AltLeft", KeyCode::LeftAlt),
    ("AltRight", KeyCode::RightAlt),
    ("Pause", KeyCode::Pause),
    ("CapsLock", KeyCode::CapsLock),
    ("Escape", KeyCode::Escape),
    ("Space", KeyCode::Space),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("End", KeyCode::End),
    ("Home", KeyCode::Home),
    ("ArrowLeft", KeyCode::Left),
    ("ArrowUp", KeyCode::Up),
    ("ArrowRight", KeyCode::Right),
    ("ArrowDown", KeyCode::Down),
    ("PrintScreen", KeyCode::PrintScreen),
    ("Insert", KeyCode::Insert),
    ("Delete", KeyCode::Delete),
    ("Digit0", KeyCode::Key0),
    ("Digit1", KeyCode::Key1),
    ("Digit2", KeyCode::Key2),
    ("Digit3", KeyCode::Key3),
    ("Digit4", KeyCode::Key4),
    ("Digit5", KeyCode::Key5),
    ("Digit6", KeyCode::Key6),
    ("Digit7", KeyCode::Key7),
    ("Digit8", KeyCode::Key8),
    ("Digit9", KeyCode::Key9),
    ("KeyA", KeyCode::KeyA),
    ("KeyB", KeyCode::KeyB),
    ("KeyC", KeyCode::KeyC),
    ("KeyD", KeyCode::KeyD),
    ("KeyE", KeyCode::KeyE),
    ("KeyF", KeyCode::KeyF),
    ("KeyG", KeyCode::KeyG),
    ("KeyH", KeyCode::KeyH),
    ("KeyI", KeyCode::KeyI),
    ("KeyJ", KeyCode::KeyJ),
    ("KeyK", KeyCode::KeyK),
    ("KeyL", KeyCode::KeyL),
    ("KeyM", KeyCode::KeyM),
    ("KeyN", KeyCode::KeyN),
    ("KeyO", KeyCode::KeyO),
    ("KeyP", KeyCode::KeyP),
    ("KeyQ", KeyCode::KeyQ),
    ("KeyR", KeyCode::KeyR),
    ("KeyS", KeyCode::KeyS),
    ("KeyT", KeyCode::KeyT),
    ("KeyU", KeyCode::KeyU),
    ("KeyV", KeyCode::KeyV),
    ("KeyW", KeyCode::KeyW),
    ("KeyX", KeyCode::KeyX),
    ("KeyY", KeyCode::KeyY),
    ("KeyZ", KeyCode::KeyZ),
    ("MetaLeft", KeyCode::LeftWindows),
    ("MetaRight", KeyCode::RightWindows),
    ("ContextMenu", KeyCode::ContextMenu),
    ("Numpad0", KeyCode::Numpad0),
    ("Numpad1", KeyCode::Numpad1),
    ("Numpad2", KeyCode::Numpad2),
    ("Numpad3", KeyCode::Numpad3),
    ("Numpad4", KeyCode::Numpad4),
    ("Numpad5", KeyCode::Numpad5),
    ("Numpad6", KeyCode::Numpad6),
    ("Numpad7", KeyCode::Numpad7),
    ("Numpad8", KeyCode::Numpad8),
    ("Numpad9", KeyCode::Numpad9),
    ("NumpadMultiply", KeyCode::NumpadMultiply),
    ("NumpadAdd", KeyCode::NumpadAdd),
    ("NumpadComma", KeyCode::NumpadSeparator),
    ("NumpadSubtract", KeyCode::NumpadSubtract),
    ("NumpadDecimal", KeyCode::NumpadDecimal),
    ("NumpadDivide", KeyCode::NumpadDivide),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
    ("F13", KeyCode::F13),
    ("F14", KeyCode::F14),
    ("F15", KeyCode::F15),
    ("F16", KeyCode::F16),
    ("F17", KeyCode::F17),
    ("F18", KeyCode::F18),
    ("F19", KeyCode::F19),
    ("F20", KeyCode::F20),
    ("F21", KeyCode::F21),
    ("F22", KeyCode::F22),
    ("F23", KeyCode::F23),
    ("F24", KeyCode::F24),
    ("NumLock", KeyCode::NumLock),
    ("ScrollLock", KeyCode::ScrollLock),
    ("Semicolon", KeyCode::Semicolon),
    ("Equal", KeyCode::Equal),
    ("Comma", KeyCode::Comma),
    ("Minus", KeyCode::Minus),
    ("Period", KeyCode::Period),
    ("Slash", KeyCode::Slash),
    ("Backquote", KeyCode::Backquote),
    ("BracketLeft", KeyCode::BracketLeft),
    ("Backslash", KeyCode::Backslash),
    ("BracketRight", KeyCode::BracketRight),
    ("Quote", KeyCode::Quote),
    ("BrowserBack", KeyCode::BrowserBack),
    ("BrowserForward", KeyCode::BrowserForward),
    ("BrowserRefresh", KeyCode::BrowserRefresh),
    ("BrowserStop", KeyCode::BrowserStop),
    ("BrowserSearch", KeyCode::BrowserSearch),
    ("BrowserFavorites", KeyCode::BrowserFavorites),
    ("BrowserHome", KeyCode::BrowserHome),
    ("AudioVolumeMute", KeyCode::VolumeMute),
    ("AudioVolumeDown", KeyCode::VolumeDown),
    ("AudioVolumeUp", KeyCode::VolumeUp),
    ("MediaTrackNext", KeyCode::MediaNextTrack),
    ("MediaTrackPrevious", KeyCode::MediaPrevTrack),
    ("MediaStop", KeyCode::MediaStop),
    ("MediaPlayPause", KeyCode::MediaPlayPause),
    ("LaunchMail", KeyCode::MediaLaunchMail),
    ("MediaSelect", KeyCode::MediaLaunchMediaSelect),
    ("LaunchApp1", KeyCode::MediaLaunchApp1),
    ("LaunchApp2", KeyCode::MediaLaunchApp2),
];

fn table() -> &'static HashMap<&'static str, KeyCode> {
    static TABLE: OnceLock<HashMap<&'static str, KeyCode>> = OnceLock::new();
    TABLE.get_or_init(|| KEYCODE_TABLE.iter().copied().collect())
}

/// Looks up a platform key identifier without logging.
pub fn lookup(code: &str) -> Option<KeyCode> {
    table().get(code).copied()
}

/// Maps a platform key identifier to its protocol key code.
///
/// Unmapped identifiers log a warning and return [`KeyCode::Unknown`].
pub fn from_dom_code(code: &str) -> KeyCode {
    match lookup(code) {
        Some(key) => key,
        None => {
            warn!(code, "unmapped keyboard code");
            KeyCode::Unknown
        }
    }
}
