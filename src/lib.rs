//! Relaybrowser: client-side session layer for a remote-rendered browser.
//!
//! A remote engine renders pages and streams raw frames plus page events.
//! This crate presents those pages as local tabs, keeps exactly one tab's
//! video stream running, draws its frames and routes local input back to it.

pub mod app;
pub mod callbacks;
pub mod engine;
pub mod input;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod render;
pub mod services;
pub mod types;
