// Relaybrowser shared type definitions
// Each submodule defines types used across the session layer.

pub mod download;
pub mod errors;
pub mod events;
pub mod frame;
pub mod input;
pub mod keycode;
pub mod session;
pub mod settings;
pub mod tab;
