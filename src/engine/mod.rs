//! Boundary to the remote browser engine.
//!
//! The engine owns every page. This crate only holds handles to them: a
//! [`RemoteBrowser`] that opens and enumerates tabs, and one
//! [`TabConnection`] per tab carrying navigation, input, and the video
//! stream switch. Transports (websocket, IPC, in-process test doubles)
//! implement these traits.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::errors::EngineError;
use crate::types::events::{FileDialogResponse, TabEvent};
use crate::types::frame::Size;
use crate::types::input::{Modifiers, MouseButton};
use crate::types::keycode::KeyCode;
use crate::types::tab::TabId;

/// Receiving half of a tab's event stream.
pub type EventStream = mpsc::UnboundedReceiver<TabEvent>;

/// Browser-level handle to the remote engine.
#[async_trait]
pub trait RemoteBrowser: Send + Sync {
    /// Creates a remote page and connects to it.
    async fn open_tab(&self, url: &str) -> Result<Arc<dyn TabConnection>, EngineError>;

    /// Every page currently open on the engine, including ones this client did not open.
    async fn tabs(&self) -> Result<Vec<Arc<dyn TabConnection>>, EngineError>;

    /// Sets the remote viewport size in device pixels.
    fn resize(&self, width: u32, height: u32) -> Result<(), EngineError>;

    /// The remote viewport size, when the engine dictates it.
    async fn size(&self) -> Result<Option<Size>, EngineError>;

    /// Releases the browser-level connection. Pages stay open on the engine.
    fn close(&self);
}

/// Per-tab handle to one remote page.
#[async_trait]
pub trait TabConnection: Send + Sync {
    fn id(&self) -> TabId;

    /// Hands out the tab's event stream. Only the first call succeeds.
    fn events(&self) -> Result<EventStream, EngineError>;

    async fn navigate(&self, url: &str) -> Result<(), EngineError>;
    fn back(&self) -> Result<(), EngineError>;
    fn forward(&self) -> Result<(), EngineError>;
    fn reload(&self) -> Result<(), EngineError>;

    fn select_all(&self) -> Result<(), EngineError>;
    fn copy(&self) -> Result<(), EngineError>;
    fn paste(&self) -> Result<(), EngineError>;
    fn cut(&self) -> Result<(), EngineError>;
    fn undo(&self) -> Result<(), EngineError>;
    fn redo(&self) -> Result<(), EngineError>;

    /// Starts delivering `Frame` events.
    fn start_video(&self) -> Result<(), EngineError>;
    fn stop_video(&self) -> Result<(), EngineError>;

    fn mouse_move(&self, x: i32, y: i32) -> Result<(), EngineError>;
    fn click(&self, x: i32, y: i32, button: MouseButton, down: bool) -> Result<(), EngineError>;
    fn scroll(&self, x: i32, y: i32, delta_x: i32, delta_y: i32) -> Result<(), EngineError>;
    fn key(
        &self,
        code: KeyCode,
        character: Option<char>,
        down: bool,
        modifiers: Modifiers,
    ) -> Result<(), EngineError>;
    fn focus(&self, focused: bool) -> Result<(), EngineError>;

    fn cancel_download(&self, id: u32) -> Result<(), EngineError>;
    fn respond_file_dialog(&self, response: FileDialogResponse) -> Result<(), EngineError>;

    /// Closes the remote page and its event stream.
    fn close(&self) -> Result<(), EngineError>;
}

/// Live forwarding of one tab's event stream into a shared channel.
///
/// Dropping the subscription stops the forwarder.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Spawns a task that tags every event from `stream` with `id` and sends it to `sink`.
    pub fn spawn(
        id: TabId,
        mut stream: EventStream,
        sink: mpsc::UnboundedSender<(TabId, TabEvent)>,
    ) -> Self {
        let task = tokio::spawn(async move {
            while let Some(event) = stream.recv().await {
                if sink.send((id, event)).is_err() {
                    break;
                }
            }
            tracing::trace!(tab = %id, "event stream ended");
        });
        Self { task }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
