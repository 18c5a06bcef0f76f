// Relaybrowser input routing
// Local pointer and keyboard events translated into the remote protocol.

pub mod keycodes;
pub mod translator;
