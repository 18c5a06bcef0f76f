//! Tab Registry for Relaybrowser.
//!
//! Owns every open tab: its presentation state, its connection to the
//! remote engine and its event subscription. All mutation goes through the
//! registry, which keeps two invariants:
//!
//! - at most one tab is active, and only the active tab streams video;
//! - pinned tabs cannot be closed and are mirrored into the bookmark list.
//!
//! Opening a tab is split into [`TabRegistry::begin_open`] and
//! [`TabRegistry::complete_open`] so the owner can await the engine without
//! holding the registry. Completions that arrive after the request was
//! cancelled, or after [`TabRegistry::clear`], close the returned connection
//! instead of registering it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::callbacks::TabCallbacks;
use crate::engine::{RemoteBrowser, Subscription, TabConnection};
use crate::services::url_resolver;
use crate::types::download::DownloadProgress;
use crate::types::errors::{EngineError, SessionError, TabError};
use crate::types::events::{FileDialog, FileDialogResponse, TabEvent};
use crate::types::frame::Frame;
use crate::types::input::Cursor;
use crate::types::session::PersistedTab;
use crate::types::settings::AppConfig;
use crate::types::tab::{LoadStatus, TabId, TabSeed, TabState};

use super::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use super::download_manager::{DownloadManager, DownloadManagerTrait};
use super::session_manager::SessionStore;

/// Receiving end of the merged event stream of every registered tab.
pub type TabEventReceiver = mpsc::UnboundedReceiver<(TabId, TabEvent)>;

/// One open tab: passive state plus the exclusively owned remote handles.
pub struct TabSession {
    state: TabState,
    connection: Arc<dyn TabConnection>,
    /// URL of the bookmark standing for this tab while it is pinned.
    bookmark: Option<String>,
    _subscription: Subscription,
}

impl TabSession {
    pub fn state(&self) -> &TabState {
        &self.state
    }

    pub fn connection(&self) -> &Arc<dyn TabConnection> {
        &self.connection
    }

    pub fn bookmark(&self) -> Option<&str> {
        self.bookmark.as_deref()
    }
}

/// A tab open that has been issued to the engine but not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    pub id: u64,
    pub generation: u64,
    pub url: String,
    pub seed: TabSeed,
    /// Make the tab active once registered.
    pub activate: bool,
    /// Signal the UI to focus the address bar once registered.
    pub focus_address_bar: bool,
}

/// Per-tab UI actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    Back,
    Forward,
    Reload,
    SelectAll,
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
    Activate,
    Close,
    Pin,
    Unpin,
}

/// An action bound to one tab, handed to the UI in place of methods on the tab itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabCommand {
    pub tab: TabId,
    pub action: TabAction,
}

impl TabCommand {
    pub fn new(tab: TabId, action: TabAction) -> Self {
        Self { tab, action }
    }
}

/// What the owner still has to do after an event was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Tab state changed.
    Updated,
    /// Nothing to do.
    Ignored,
    /// The page asked for a new tab.
    OpenTab(String),
    /// A frame of the active tab to draw.
    Render(Frame),
    /// The active tab changed its cursor.
    Cursor(Cursor),
    /// A download was recorded.
    Download(DownloadProgress),
    /// The page wants a file picker; the answer goes back through [`relay_file_dialog`].
    FileDialog(FileDialog),
    /// The page wants to open a link outside the browser.
    ExternalLink(String),
}

/// Shows the file picker and relays the answer to the page.
pub async fn relay_file_dialog(
    callbacks: Arc<dyn TabCallbacks>,
    connection: Arc<dyn TabConnection>,
    dialog: FileDialog,
) {
    let response = callbacks.on_file_dialog(dialog).await;
    if let Err(e) = connection.respond_file_dialog(response) {
        warn!(tab = %connection.id(), error = %e, "failed to answer file dialog");
    }
}

/// Ordered collection of open tabs.
pub struct TabRegistry {
    engine: Arc<dyn RemoteBrowser>,
    store: Arc<dyn SessionStore>,
    callbacks: Arc<dyn TabCallbacks>,
    config: AppConfig,

    order: Vec<TabId>,
    sessions: HashMap<TabId, TabSession>,
    active: Option<TabId>,

    generation: u64,
    next_request: u64,
    pending: HashSet<u64>,

    events_tx: mpsc::UnboundedSender<(TabId, TabEvent)>,
    bookmarks: BookmarkManager,
    downloads: DownloadManager,
}

impl TabRegistry {
    /// Creates an empty registry and the receiver its tabs' events arrive on.
    pub fn new(
        engine: Arc<dyn RemoteBrowser>,
        store: Arc<dyn SessionStore>,
        callbacks: Arc<dyn TabCallbacks>,
        config: AppConfig,
    ) -> (Self, TabEventReceiver) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let registry = Self {
            engine,
            store,
            callbacks,
            config,
            order: Vec::new(),
            sessions: HashMap::new(),
            active: None,
            generation: 0,
            next_request: 0,
            pending: HashSet::new(),
            events_tx,
            bookmarks: BookmarkManager::new(),
            downloads: DownloadManager::new(),
        };
        (registry, events_rx)
    }

    // --- accessors ---

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> Arc<dyn RemoteBrowser> {
        Arc::clone(&self.engine)
    }

    pub fn callbacks(&self) -> Arc<dyn TabCallbacks> {
        Arc::clone(&self.callbacks)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&TabState> {
        self.active.and_then(|id| self.tab(id))
    }

    pub fn tab(&self, id: TabId) -> Option<&TabState> {
        self.sessions.get(&id).map(|s| &s.state)
    }

    /// All tabs in display order.
    pub fn tabs(&self) -> Vec<&TabState> {
        self.order
            .iter()
            .filter_map(|id| self.sessions.get(id).map(|s| &s.state))
            .collect()
    }

    pub fn order(&self) -> &[TabId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn connection(&self, id: TabId) -> Option<Arc<dyn TabConnection>> {
        self.sessions.get(&id).map(|s| Arc::clone(&s.connection))
    }

    pub fn active_connection(&self) -> Option<Arc<dyn TabConnection>> {
        self.active.and_then(|id| self.connection(id))
    }

    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub fn downloads(&self) -> &DownloadManager {
        &self.downloads
    }

    /// Incremented by every [`clear`](Self::clear); completions from older generations are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_opens(&self) -> usize {
        self.pending.len()
    }

    fn session(&self, id: TabId) -> Result<&TabSession, TabError> {
        self.sessions.get(&id).ok_or(TabError::NotFound(id))
    }

    fn session_mut(&mut self, id: TabId) -> Result<&mut TabSession, TabError> {
        self.sessions.get_mut(&id).ok_or(TabError::NotFound(id))
    }

    // --- opening ---

    /// Records a user-initiated open and returns the request to send to the engine.
    ///
    /// The input is resolved to a URL or a search query first.
    pub fn begin_open(&mut self, input: Option<&str>) -> OpenRequest {
        let url = url_resolver::resolve(input.unwrap_or(""), &self.config.navigation);
        self.begin_open_seeded(url, TabSeed::default(), true, true)
    }

    /// Records an open of an already-resolved URL.
    pub fn begin_open_seeded(
        &mut self,
        url: String,
        seed: TabSeed,
        activate: bool,
        focus_address_bar: bool,
    ) -> OpenRequest {
        self.next_request += 1;
        let request = OpenRequest {
            id: self.next_request,
            generation: self.generation,
            url,
            seed,
            activate,
            focus_address_bar,
        };
        self.pending.insert(request.id);
        debug!(request = request.id, url = %request.url, "open requested");
        request
    }

    /// Forgets a pending open; its completion will be discarded.
    pub fn cancel_open(&mut self, request_id: u64) -> bool {
        self.pending.remove(&request_id)
    }

    /// Applies the engine's answer to an open request.
    ///
    /// Returns the tab the request ended up on, if any.
    pub fn complete_open(
        &mut self,
        request: OpenRequest,
        result: Result<Arc<dyn TabConnection>, EngineError>,
    ) -> Option<TabId> {
        let current = request.generation == self.generation && self.pending.remove(&request.id);

        let connection = match result {
            Ok(connection) => connection,
            Err(e) => {
                warn!(url = %request.url, error = %e, "failed to open tab");
                return None;
            }
        };

        let id = connection.id();
        if !current {
            debug!(tab = %id, request = request.id, "discarding stale open");
            if let Err(e) = connection.close() {
                warn!(tab = %id, error = %e, "failed to close stale tab");
            }
            return None;
        }

        if self.sessions.contains_key(&id) {
            debug!(tab = %id, "open completed for a tab already tracked");
            if request.activate {
                self.activate_logged(id);
            }
            return Some(id);
        }

        if !self.register(connection, Some(&request)) {
            return None;
        }

        info!(tab = %id, url = %request.url, "tab opened");
        if request.activate {
            self.activate_logged(id);
        }
        if request.focus_address_bar {
            self.callbacks.on_focus_address_bar();
        }
        Some(id)
    }

    /// Opens a tab for `input` and activates it.
    pub async fn open(&mut self, input: Option<&str>) -> Option<TabId> {
        let request = self.begin_open(input);
        self.send_open(request).await
    }

    async fn send_open(&mut self, request: OpenRequest) -> Option<TabId> {
        let engine = Arc::clone(&self.engine);
        let result = engine.open_tab(&request.url).await;
        self.complete_open(request, result)
    }

    /// Subscribes to a connection's events and inserts it last.
    ///
    /// A connection whose event stream cannot be obtained is closed and not registered.
    fn register(&mut self, connection: Arc<dyn TabConnection>, request: Option<&OpenRequest>) -> bool {
        let id = connection.id();
        let stream = match connection.events() {
            Ok(stream) => stream,
            Err(e) => {
                warn!(tab = %id, error = %e, "failed to subscribe to tab events");
                if let Err(e) = connection.close() {
                    warn!(tab = %id, error = %e, "failed to close unsubscribed tab");
                }
                return false;
            }
        };

        let mut state = TabState::new(id);
        if let Some(request) = request {
            let seed = &request.seed;
            state.url = seed.url.clone().unwrap_or_else(|| request.url.clone());
            if let Some(title) = &seed.title {
                state.title = title.clone();
            }
            if let Some(favicon) = &seed.favicon {
                state.favicon = favicon.clone();
            }
            state.pinned = seed.pinned;
        }

        let bookmark = state.pinned.then(|| state.url.clone());
        let subscription = Subscription::spawn(id, stream, self.events_tx.clone());
        self.sessions.insert(
            id,
            TabSession {
                state,
                connection,
                bookmark,
                _subscription: subscription,
            },
        );
        self.order.push(id);
        true
    }

    // --- activation ---

    /// Makes `id` the only active tab.
    ///
    /// Stops the previous tab's video before starting the new one. Engine
    /// failures are logged; the flags are updated regardless.
    pub fn activate(&mut self, id: TabId) -> Result<(), TabError> {
        if !self.sessions.contains_key(&id) {
            warn!(tab = %id, "cannot activate unknown tab");
            return Err(TabError::NotFound(id));
        }
        if self.active == Some(id) {
            return Ok(());
        }

        if let Some(previous) = self.active.take() {
            if let Some(session) = self.sessions.get_mut(&previous) {
                session.state.active = false;
                if let Err(e) = session.connection.stop_video() {
                    warn!(tab = %previous, error = %e, "failed to stop video");
                }
            }
        }

        let session = self.session_mut(id)?;
        session.state.active = true;
        if let Err(e) = session.connection.start_video() {
            warn!(tab = %id, error = %e, "failed to start video");
        }
        self.active = Some(id);
        debug!(tab = %id, "tab activated");
        Ok(())
    }

    fn activate_logged(&mut self, id: TabId) {
        let _ = self.activate(id);
    }

    /// Activates the next (or previous) tab, wrapping around.
    pub fn shift(&mut self, forward: bool) -> Result<(), TabError> {
        let Some(active) = self.active else {
            return Ok(());
        };
        let Some(position) = self.order.iter().position(|id| *id == active) else {
            return Ok(());
        };

        let len = self.order.len();
        let next = if forward {
            (position + 1) % len
        } else {
            (position + len - 1) % len
        };
        self.activate(self.order[next])
    }

    // --- closing ---

    /// Closes a tab. Pinned tabs are refused.
    ///
    /// When the active tab closes, its left neighbour (or the new first tab) becomes active.
    pub fn close(&mut self, id: TabId) -> Result<(), TabError> {
        let session = self.session(id).map_err(|e| {
            warn!(tab = %id, "cannot close unknown tab");
            e
        })?;
        if session.state.pinned {
            warn!(tab = %id, "refusing to close pinned tab");
            return Err(TabError::Pinned(id));
        }

        let index = self
            .order
            .iter()
            .position(|t| *t == id)
            .ok_or(TabError::NotFound(id))?;
        self.order.remove(index);
        let was_active = self.active == Some(id);

        if let Some(session) = self.sessions.remove(&id) {
            if let Err(e) = session.connection.close() {
                warn!(tab = %id, error = %e, "failed to close remote tab");
            }
        }
        info!(tab = %id, "tab closed");

        if was_active {
            self.active = None;
            if !self.order.is_empty() {
                let neighbour = self.order[index.saturating_sub(1)];
                self.activate(neighbour)?;
            }
        }
        Ok(())
    }

    /// Drops every tab without closing the remote pages and invalidates pending opens.
    pub fn clear(&mut self) {
        if let Some(session) = self.active.and_then(|id| self.sessions.get(&id)) {
            if let Err(e) = session.connection.stop_video() {
                warn!(tab = %session.state.id, error = %e, "failed to stop video");
            }
        }
        self.generation += 1;
        self.pending.clear();
        self.sessions.clear();
        self.order.clear();
        self.active = None;
        info!(generation = self.generation, "registry cleared");
    }

    /// Switches to another engine, e.g. on profile change.
    pub fn set_engine(&mut self, engine: Arc<dyn RemoteBrowser>) {
        self.clear();
        self.engine.close();
        self.engine = engine;
    }

    // --- navigation and per-tab commands ---

    /// Resolves `input` and returns the connection to navigate plus the target URL.
    pub fn navigation_target(
        &self,
        id: TabId,
        input: &str,
    ) -> Result<(Arc<dyn TabConnection>, String), TabError> {
        let connection = self.session(id).map(|s| Arc::clone(&s.connection)).map_err(|e| {
            warn!(tab = %id, "cannot navigate unknown tab");
            e
        })?;
        let url = url_resolver::resolve(input, &self.config.navigation);
        Ok((connection, url))
    }

    /// Navigates a tab to a URL or a search for `input`.
    pub async fn navigate(&mut self, id: TabId, input: &str) -> Result<(), TabError> {
        let (connection, url) = self.navigation_target(id, input)?;
        connection.navigate(&url).await.map_err(|e| {
            warn!(tab = %id, url = %url, error = %e, "navigation failed");
            TabError::Engine(e)
        })
    }

    /// Moves a tab to `new_index` in the display order.
    pub fn reorder(&mut self, id: TabId, new_index: usize) -> Result<(), TabError> {
        if new_index >= self.order.len() {
            return Err(TabError::InvalidIndex(new_index));
        }
        let current = self
            .order
            .iter()
            .position(|t| *t == id)
            .ok_or(TabError::NotFound(id))?;
        let tab = self.order.remove(current);
        self.order.insert(new_index, tab);
        Ok(())
    }

    /// Runs a per-tab action.
    pub fn execute(&mut self, command: TabCommand) -> Result<(), TabError> {
        let id = command.tab;
        match command.action {
            TabAction::Activate => return self.activate(id),
            TabAction::Close => return self.close(id),
            TabAction::Pin => return self.pin(id),
            TabAction::Unpin => return self.unpin(id),
            _ => {}
        }

        let connection = Arc::clone(&self.session(id)?.connection);
        let result = match command.action {
            TabAction::Back => connection.back(),
            TabAction::Forward => connection.forward(),
            TabAction::Reload => connection.reload(),
            TabAction::SelectAll => connection.select_all(),
            TabAction::Copy => connection.copy(),
            TabAction::Paste => connection.paste(),
            TabAction::Cut => connection.cut(),
            TabAction::Undo => connection.undo(),
            TabAction::Redo => connection.redo(),
            TabAction::Activate | TabAction::Close | TabAction::Pin | TabAction::Unpin => Ok(()),
        };
        result.map_err(|e| {
            warn!(tab = %id, action = ?command.action, error = %e, "tab action failed");
            TabError::Engine(e)
        })
    }

    // --- pinning ---

    /// Pins a tab and mirrors it into the bookmark list.
    ///
    /// Tabs pinned on the same URL share one bookmark.
    pub fn pin(&mut self, id: TabId) -> Result<(), TabError> {
        let session = self.session_mut(id)?;
        if session.state.pinned {
            return Ok(());
        }
        session.state.pinned = true;
        session.bookmark = Some(session.state.url.clone());
        let (title, url, favicon) = (
            session.state.title.clone(),
            session.state.url.clone(),
            session.state.favicon.clone(),
        );
        self.bookmarks.add(&title, &url, &favicon);
        self.save_bookmarks();
        Ok(())
    }

    /// Unpins a tab and drops its bookmark unless another pinned tab still uses it.
    pub fn unpin(&mut self, id: TabId) -> Result<(), TabError> {
        let session = self.session_mut(id)?;
        if !session.state.pinned {
            return Ok(());
        }
        session.state.pinned = false;
        if let Some(url) = session.bookmark.take() {
            self.release_bookmark(&url);
        }
        self.save_bookmarks();
        Ok(())
    }

    /// Moves a pinned tab's bookmark to the URL the tab now shows.
    fn follow_pinned_url(&mut self, id: TabId) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        if !session.state.pinned || session.bookmark.as_deref() == Some(session.state.url.as_str()) {
            return;
        }
        let previous = session.bookmark.replace(session.state.url.clone());
        let (title, url, favicon) = (
            session.state.title.clone(),
            session.state.url.clone(),
            session.state.favicon.clone(),
        );
        if let Some(previous) = previous {
            self.release_bookmark(&previous);
        }
        self.bookmarks.add(&title, &url, &favicon);
        debug!(tab = %id, url = %url, "pinned tab navigated, bookmark moved");
        self.save_bookmarks();
    }

    /// Removes the bookmark for `url` once no pinned tab refers to it.
    fn release_bookmark(&mut self, url: &str) {
        let shared = self
            .sessions
            .values()
            .any(|s| s.bookmark.as_deref() == Some(url));
        if !shared {
            self.bookmarks.remove(url);
        }
    }

    fn save_bookmarks(&self) {
        if !self.config.mode.should_save {
            return;
        }
        if let Err(e) = self.bookmarks.save(self.store.as_ref()) {
            warn!(error = %e, "failed to save bookmarks");
        }
    }

    // --- events ---

    /// Applies one engine event to the tab it came from.
    ///
    /// State updates, download tracking and policy refusals happen here; the
    /// returned outcome names what is left for the owner.
    pub fn apply_event(&mut self, id: TabId, event: TabEvent) -> EventOutcome {
        let is_active = self.active == Some(id);
        let Some(session) = self.sessions.get_mut(&id) else {
            debug!(tab = %id, kind = event.kind(), "event for unknown tab ignored");
            return EventOutcome::Ignored;
        };

        match event {
            TabEvent::Title(title) => session.state.title = title,
            TabEvent::Url(url) => {
                session.state.url = url;
                self.follow_pinned_url(id);
            }
            TabEvent::Favicon(favicon) => session.state.favicon = favicon,
            TabEvent::UrlHovered(url) => session.state.hovered_url = url,
            TabEvent::LoadState(load) => {
                session.state.is_loading = load.status == LoadStatus::Loading;
                session.state.can_go_back = load.can_go_back;
                session.state.can_go_forward = load.can_go_forward;
            }
            TabEvent::NewTab(url) => return EventOutcome::OpenTab(url),
            TabEvent::DownloadProgress(progress) => {
                if !self.config.mode.download_allowed {
                    info!(tab = %id, download = progress.id, "downloads disabled, cancelling");
                    if let Err(e) = session.connection.cancel_download(progress.id) {
                        warn!(tab = %id, error = %e, "failed to cancel download");
                    }
                    return EventOutcome::Ignored;
                }
                self.downloads.update(id, progress.clone());
                self.callbacks.on_download_update(id, &progress);
                return EventOutcome::Download(progress);
            }
            TabEvent::FileDialog(dialog) => {
                if !self.config.mode.upload_allowed {
                    info!(tab = %id, "uploads disabled, cancelling file dialog");
                    if let Err(e) = session
                        .connection
                        .respond_file_dialog(FileDialogResponse::Cancelled)
                    {
                        warn!(tab = %id, error = %e, "failed to answer file dialog");
                    }
                    return EventOutcome::Ignored;
                }
                return EventOutcome::FileDialog(dialog);
            }
            TabEvent::ExternalLink(url) => {
                if !self.config.mode.external_links_allowed {
                    info!(tab = %id, url = %url, "external links disabled");
                    return EventOutcome::Ignored;
                }
                return EventOutcome::ExternalLink(url);
            }
            TabEvent::Frame(frame) => {
                return if is_active {
                    EventOutcome::Render(frame)
                } else {
                    EventOutcome::Ignored
                };
            }
            TabEvent::Cursor(cursor) => {
                if !is_active {
                    return EventOutcome::Ignored;
                }
                self.callbacks.on_cursor_changed(cursor);
                return EventOutcome::Cursor(cursor);
            }
        }
        EventOutcome::Updated
    }

    /// Applies an event and performs its follow-up inline.
    ///
    /// New tabs are opened, file dialogs and external links are awaited. Frames
    /// are returned to the caller as [`EventOutcome::Render`].
    pub async fn handle_event(&mut self, id: TabId, event: TabEvent) -> EventOutcome {
        let outcome = self.apply_event(id, event);
        match &outcome {
            EventOutcome::OpenTab(url) => {
                self.open(Some(url)).await;
            }
            EventOutcome::FileDialog(dialog) => {
                if let Some(connection) = self.connection(id) {
                    relay_file_dialog(self.callbacks(), connection, dialog.clone()).await;
                }
            }
            EventOutcome::ExternalLink(url) => {
                self.callbacks.on_external_link(url).await;
            }
            _ => {}
        }
        outcome
    }

    // --- reconciliation ---

    /// Attaches every engine tab not yet tracked. Returns the attached ids.
    pub async fn reconcile(&mut self) -> Result<Vec<TabId>, TabError> {
        let engine = Arc::clone(&self.engine);
        let connections = engine.tabs().await.map_err(|e| {
            warn!(error = %e, "failed to fetch engine tabs");
            TabError::Engine(e)
        })?;
        Ok(self.apply_reconcile(connections))
    }

    /// Attaches the untracked connections from an engine tab listing.
    ///
    /// Attached tabs are not activated unless nothing is active yet.
    pub fn apply_reconcile(&mut self, connections: Vec<Arc<dyn TabConnection>>) -> Vec<TabId> {
        let mut added = Vec::new();
        for connection in connections {
            let id = connection.id();
            if self.sessions.contains_key(&id) {
                continue;
            }
            let stream = match connection.events() {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(tab = %id, error = %e, "failed to subscribe to external tab");
                    continue;
                }
            };
            let subscription = Subscription::spawn(id, stream, self.events_tx.clone());
            self.sessions.insert(
                id,
                TabSession {
                    state: TabState::new(id),
                    connection,
                    bookmark: None,
                    _subscription: subscription,
                },
            );
            self.order.push(id);
            added.push(id);
        }

        if !added.is_empty() {
            info!(count = added.len(), "attached external tabs");
            if self.active.is_none() {
                self.activate_logged(added[0]);
            }
        }
        added
    }

    // --- persistence ---

    /// Writes the non-pinned tabs and the bookmark list to the store.
    pub fn persist(&self) -> Result<(), SessionError> {
        let tabs: Vec<PersistedTab> = self
            .tabs()
            .into_iter()
            .filter(|t| !t.pinned)
            .map(PersistedTab::from)
            .collect();
        self.store.write_tabs(&tabs)?;
        self.bookmarks.save(self.store.as_ref())?;
        debug!(tabs = tabs.len(), "session persisted");
        Ok(())
    }

    /// Rebuilds the session from the store.
    ///
    /// Bookmarks reopen as pinned tabs, then the remembered tabs follow. The
    /// tab saved as active is activated, else the last one opened. When nothing
    /// could be opened a single default tab is opened instead.
    pub async fn restore(&mut self) -> Vec<TabId> {
        let defaults = self.config.default_bookmarks.clone();
        self.bookmarks.load(self.store.as_ref(), &defaults);

        let mut opened = Vec::new();
        let mut remembered_active = None;

        for bookmark in self.bookmarks.all().to_vec() {
            let seed = TabSeed {
                title: Some(bookmark.title),
                url: Some(bookmark.url.clone()),
                favicon: Some(bookmark.favicon),
                pinned: true,
            };
            let request = self.begin_open_seeded(bookmark.url, seed, false, false);
            if let Some(id) = self.send_open(request).await {
                opened.push(id);
            }
        }

        let remembered = match self.store.read_tabs() {
            Ok(tabs) => tabs,
            Err(e) => {
                warn!(error = %e, "saved tabs unreadable, starting fresh");
                Vec::new()
            }
        };
        for tab in remembered.into_iter().filter(|t| !t.pinned) {
            let seed = TabSeed {
                title: Some(tab.title),
                url: Some(tab.url.clone()),
                favicon: Some(tab.favicon),
                pinned: false,
            };
            let request = self.begin_open_seeded(tab.url, seed, false, false);
            if let Some(id) = self.send_open(request).await {
                if tab.active {
                    remembered_active = Some(id);
                }
                opened.push(id);
            }
        }

        if self.order.is_empty() {
            info!("nothing restored, opening default tab");
            if let Some(id) = self.open(None).await {
                opened.push(id);
            }
            return opened;
        }

        if let Some(id) = remembered_active.or_else(|| self.order.last().copied()) {
            self.activate_logged(id);
        }
        info!(tabs = opened.len(), "session restored");
        opened
    }
}
