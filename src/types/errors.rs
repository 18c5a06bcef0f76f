use std::fmt;

use super::frame::Size;
use super::tab::TabId;

// === EngineError ===

/// Errors reported by the remote engine or its transport.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The connection could not be established or was lost.
    ConnectionFailed(String),
    /// The engine did not answer in time.
    Timeout(String),
    /// The tab's connection has already been closed.
    Closed(TabId),
    /// The engine rejected the request.
    Rejected(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ConnectionFailed(msg) => write!(f, "Engine connection failed: {}", msg),
            EngineError::Timeout(msg) => write!(f, "Engine request timed out: {}", msg),
            EngineError::Closed(id) => write!(f, "Tab connection closed: {}", id),
            EngineError::Rejected(msg) => write!(f, "Engine rejected request: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

// === TabError ===

/// Errors related to tab registry operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TabError {
    /// Tab with the given ID is not tracked.
    NotFound(TabId),
    /// The operation is not allowed on a pinned tab.
    Pinned(TabId),
    /// The provided tab index is out of bounds.
    InvalidIndex(usize),
    /// The remote engine failed while serving the request.
    Engine(EngineError),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::Pinned(id) => write!(f, "Tab is pinned: {}", id),
            TabError::InvalidIndex(index) => write!(f, "Invalid tab index: {}", index),
            TabError::Engine(e) => write!(f, "Tab engine error: {}", e),
        }
    }
}

impl std::error::Error for TabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for TabError {
    fn from(e: EngineError) -> Self {
        TabError::Engine(e)
    }
}

// === FrameError ===

/// Errors related to incoming video frames.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// The pixel payload length does not match the declared dimensions.
    PayloadMismatch { expected: usize, actual: usize },
    /// The frame size differs from the fixed-size buffer it must land in.
    SizeMismatch { expected: Size, actual: Size },
    /// The frame declares a zero width or height.
    EmptyFrame,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::PayloadMismatch { expected, actual } => write!(
                f,
                "Frame payload mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            FrameError::SizeMismatch { expected, actual } => write!(
                f,
                "Frame size mismatch: buffer {}x{}, frame {}x{}",
                expected.width, expected.height, actual.width, actual.height
            ),
            FrameError::EmptyFrame => write!(f, "Frame has zero width or height"),
        }
    }
}

impl std::error::Error for FrameError {}

// === ShortcutError ===

/// Errors related to keyboard shortcut management.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutError {
    /// Shortcut for the given action was not found.
    NotFound(String),
    /// The shortcut keys conflict with an existing binding.
    Conflict(String),
    /// The provided key combination is invalid.
    InvalidKeys(String),
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::NotFound(action) => {
                write!(f, "Shortcut not found for action: {}", action)
            }
            ShortcutError::Conflict(msg) => write!(f, "Shortcut conflict: {}", msg),
            ShortcutError::InvalidKeys(keys) => write!(f, "Invalid shortcut keys: {}", keys),
        }
    }
}

impl std::error::Error for ShortcutError {}

// === SessionError ===

/// Errors related to reading or writing the persisted session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// An I/O error occurred while reading or writing a session file.
    IoError(String),
    /// Failed to serialize or deserialize session data.
    SerializationError(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::IoError(msg) => write!(f, "Session I/O error: {}", msg),
            SessionError::SerializationError(msg) => {
                write!(f, "Session serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SessionError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
