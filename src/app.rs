//! App Core for Relaybrowser.
//!
//! The single owner of all session state. UI commands, engine completions,
//! tab events and timers are all applied on the task running [`App::run`];
//! slow engine calls are spawned and their results come back as messages
//! tagged with the registry generation they were issued under.

use std::future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::callbacks::TabCallbacks;
use crate::engine::{RemoteBrowser, TabConnection};
use crate::input::translator::{InputTranslator, KeyOutcome};
use crate::managers::session_manager::SessionStore;
use crate::managers::shortcut_manager::{
    combo_for, ShortcutAction, ShortcutManager, ShortcutManagerTrait,
};
use crate::managers::tab_registry::{
    relay_file_dialog, EventOutcome, OpenRequest, TabAction, TabCommand, TabEventReceiver,
    TabRegistry,
};
use crate::render::debounce::ResizeDebouncer;
use crate::render::fps::FpsTracker;
use crate::render::renderer::{build_renderer, FrameRenderer};
use crate::render::surface::DisplaySurface;
use crate::types::errors::EngineError;
use crate::types::events::TabEvent;
use crate::types::frame::Size;
use crate::types::input::{KeyEvent, PointerEvent};
use crate::types::settings::AppConfig;
use crate::types::tab::TabId;

/// Requests from the UI layer.
pub enum AppCommand {
    OpenTab(Option<String>),
    CloseTab(TabId),
    Activate(TabId),
    Shift { forward: bool },
    Navigate { tab: TabId, input: String },
    Tab(TabCommand),
    Reorder { tab: TabId, index: usize },
    /// Display area resized, in CSS pixels.
    Resize { width: u32, height: u32 },
    Pointer(PointerEvent),
    /// Key event on the display surface.
    Key(KeyEvent),
    /// Key event anywhere else in the window; only global shortcuts apply.
    ChromeKey(KeyEvent),
    Focus(bool),
    SwitchEngine(Arc<dyn RemoteBrowser>),
    Persist,
    Shutdown,
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Results of spawned engine calls.
enum Completion {
    Opened {
        request: OpenRequest,
        result: Result<Arc<dyn TabConnection>, EngineError>,
    },
    Listed {
        generation: u64,
        result: Result<Vec<Arc<dyn TabConnection>>, EngineError>,
    },
    RemoteSize {
        generation: u64,
        result: Result<Option<Size>, EngineError>,
    },
    Navigated,
}

/// Session driver tying the registry, renderer and input together.
pub struct App {
    registry: TabRegistry,
    events: TabEventReceiver,
    renderer: Box<dyn FrameRenderer>,
    translator: InputTranslator,
    shortcuts: ShortcutManager,
    debouncer: ResizeDebouncer,
    fps: FpsTracker,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    bound: Option<TabId>,
    timers_dirty: bool,
}

impl App {
    pub fn new(
        engine: Arc<dyn RemoteBrowser>,
        store: Arc<dyn SessionStore>,
        callbacks: Arc<dyn TabCallbacks>,
        config: AppConfig,
        renderer: Box<dyn FrameRenderer>,
    ) -> Self {
        let debounce = Duration::from_millis(config.timing.resize_debounce_ms);
        let (registry, events) = TabRegistry::new(engine, store, callbacks, config);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            events,
            renderer,
            translator: InputTranslator::new(),
            shortcuts: ShortcutManager::new(),
            debouncer: ResizeDebouncer::new(debounce),
            fps: FpsTracker::new(Instant::now()),
            completions_tx,
            completions_rx,
            in_flight: 0,
            bound: None,
            timers_dirty: false,
        }
    }

    /// Creates an app drawing on `surface` with the renderer the config calls for.
    pub fn with_surface<S>(
        engine: Arc<dyn RemoteBrowser>,
        store: Arc<dyn SessionStore>,
        callbacks: Arc<dyn TabCallbacks>,
        config: AppConfig,
        surface: S,
    ) -> Self
    where
        S: DisplaySurface + 'static,
    {
        let renderer = build_renderer(&config, surface);
        Self::new(engine, store, callbacks, config, renderer)
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &dyn FrameRenderer {
        self.renderer.as_ref()
    }

    pub fn translator(&self) -> &InputTranslator {
        &self.translator
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutManager {
        &mut self.shortcuts
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    fn config(&self) -> &AppConfig {
        self.registry.config()
    }

    // --- lifecycle ---

    /// Builds the initial session according to the mode settings.
    pub async fn start(&mut self) {
        let mode = self.config().mode.clone();
        if mode.should_restore {
            self.registry.restore().await;
        } else if mode.should_fetch {
            if let Err(e) = self.registry.reconcile().await {
                warn!(error = %e, "initial tab fetch failed");
            }
        } else {
            self.registry.open(None).await;
        }
        if mode.use_server_size {
            self.spawn_size_query();
        }
        self.sync_bindings();
    }

    /// Drives the session until `Shutdown` or until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<AppCommand>) {
        let mut reconcile = self.reconcile_timer();
        let mut autosave = self.autosave_timer();

        loop {
            if self.timers_dirty {
                reconcile = self.reconcile_timer();
                autosave = self.autosave_timer();
                self.timers_dirty = false;
            }
            let resize_deadline = self.debouncer.deadline();

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if self.handle(command).await == Flow::Stop {
                            return;
                        }
                    }
                    None => break,
                },
                Some((tab, event)) = self.events.recv() => self.dispatch_event(tab, event),
                Some(completion) = self.completions_rx.recv() => self.apply_completion(completion),
                _ = tick(&mut reconcile) => self.spawn_reconcile(),
                _ = tick(&mut autosave) => self.persist(),
                _ = sleep_until(resize_deadline) => {
                    self.poll_resize(Instant::now());
                }
            }
        }
        self.shutdown();
    }

    fn reconcile_timer(&self) -> Option<Interval> {
        let timing = &self.config().timing;
        if !self.config().mode.should_fetch || timing.reconcile_interval_secs == 0 {
            return None;
        }
        Some(periodic(Duration::from_secs(timing.reconcile_interval_secs)))
    }

    fn autosave_timer(&self) -> Option<Interval> {
        if !self.config().mode.should_save {
            return None;
        }
        match self.config().timing.autosave_interval_secs {
            Some(secs) if secs > 0 => Some(periodic(Duration::from_secs(secs))),
            _ => None,
        }
    }

    /// Saves the session when the mode allows it and detaches input.
    pub fn shutdown(&mut self) {
        self.persist();
        self.translator.bind(None);
        info!("session shut down");
    }

    fn persist(&self) {
        if !self.config().mode.should_save {
            return;
        }
        if let Err(e) = self.registry.persist() {
            warn!(error = %e, "failed to save session");
        }
    }

    // --- commands ---

    /// Applies one UI command.
    pub async fn handle(&mut self, command: AppCommand) -> Flow {
        match command {
            AppCommand::OpenTab(input) => {
                let request = self.registry.begin_open(input.as_deref());
                self.spawn_open(request);
            }
            AppCommand::CloseTab(tab) => {
                let _ = self.registry.close(tab);
            }
            AppCommand::Activate(tab) => {
                let _ = self.registry.activate(tab);
            }
            AppCommand::Shift { forward } => {
                let _ = self.registry.shift(forward);
            }
            AppCommand::Navigate { tab, input } => self.spawn_navigate(tab, &input),
            AppCommand::Tab(command) => {
                let _ = self.registry.execute(command);
            }
            AppCommand::Reorder { tab, index } => {
                if let Err(e) = self.registry.reorder(tab, index) {
                    warn!(tab = %tab, error = %e, "reorder failed");
                }
            }
            AppCommand::Resize { width, height } => {
                self.debouncer.push(Size::new(width, height), Instant::now());
            }
            AppCommand::Pointer(event) => {
                self.translator.pointer(event, self.renderer.as_ref());
            }
            AppCommand::Key(event) => {
                self.key(&event);
            }
            AppCommand::ChromeKey(event) => {
                self.chrome_key(&event);
            }
            AppCommand::Focus(focused) => {
                self.translator.focus(focused);
            }
            AppCommand::SwitchEngine(engine) => self.switch_engine(engine).await,
            AppCommand::Persist => self.persist(),
            AppCommand::Shutdown => {
                self.shutdown();
                return Flow::Stop;
            }
        }
        self.sync_bindings();
        Flow::Continue
    }

    /// Routes a key event from the display surface.
    pub fn key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let outcome = self.translator.key(event, &self.shortcuts);
        if let KeyOutcome::Shortcut(action) = outcome {
            self.run_shortcut(action);
        }
        outcome
    }

    /// Routes a key event from outside the display surface.
    pub fn chrome_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        if !event.pressed {
            return None;
        }
        let combo = combo_for(&event.code, event.modifiers);
        let action = self.shortcuts.resolve(&combo, false)?;
        self.run_shortcut(action);
        Some(action)
    }

    fn run_shortcut(&mut self, action: ShortcutAction) {
        debug!(action = action.as_str(), "shortcut");
        let active = self.registry.active_id();
        let tab_action = match action {
            ShortcutAction::NewTab => {
                let request = self.registry.begin_open(None);
                self.spawn_open(request);
                None
            }
            ShortcutAction::FocusAddressBar => {
                self.registry.callbacks().on_focus_address_bar();
                None
            }
            ShortcutAction::NextTab => {
                let _ = self.registry.shift(true);
                None
            }
            ShortcutAction::PreviousTab => {
                let _ = self.registry.shift(false);
                None
            }
            ShortcutAction::CloseTab => Some(TabAction::Close),
            ShortcutAction::SelectAll => Some(TabAction::SelectAll),
            ShortcutAction::Copy => Some(TabAction::Copy),
            ShortcutAction::Paste => Some(TabAction::Paste),
            ShortcutAction::Cut => Some(TabAction::Cut),
            ShortcutAction::Undo => Some(TabAction::Undo),
            ShortcutAction::Redo => Some(TabAction::Redo),
        };

        if let (Some(tab), Some(tab_action)) = (active, tab_action) {
            let _ = self.registry.execute(TabCommand::new(tab, tab_action));
        }
        self.sync_bindings();
    }

    async fn switch_engine(&mut self, engine: Arc<dyn RemoteBrowser>) {
        info!("switching remote engine");
        self.registry.set_engine(engine);
        self.sync_bindings();
        self.timers_dirty = true;
        self.start().await;
    }

    // --- resize ---

    /// Applies a debounced resize once due. Returns the applied size.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Size> {
        let size = self.debouncer.poll(now)?;
        self.renderer.resize(size.width, size.height);
        if self.config().mode.use_server_size {
            self.spawn_size_query();
        } else {
            let device = self.renderer.local_size();
            if let Err(e) = self.registry.engine().resize(device.width, device.height) {
                warn!(error = %e, "remote resize failed");
            }
        }
        Some(size)
    }

    // --- events ---

    fn dispatch_event(&mut self, tab: TabId, event: TabEvent) {
        match self.registry.apply_event(tab, event) {
            EventOutcome::Render(frame) => {
                if self.renderer.render(&frame).is_ok() {
                    if let Some(fps) = self.fps.record(Instant::now()) {
                        debug!(fps, "frame rate");
                    }
                }
            }
            EventOutcome::OpenTab(url) => {
                let request = self.registry.begin_open(Some(&url));
                self.spawn_open(request);
            }
            EventOutcome::FileDialog(dialog) => {
                if let Some(connection) = self.registry.connection(tab) {
                    tokio::spawn(relay_file_dialog(
                        self.registry.callbacks(),
                        connection,
                        dialog,
                    ));
                }
            }
            EventOutcome::ExternalLink(url) => {
                let callbacks = self.registry.callbacks();
                tokio::spawn(async move { callbacks.on_external_link(&url).await });
            }
            EventOutcome::Updated
            | EventOutcome::Ignored
            | EventOutcome::Cursor(_)
            | EventOutcome::Download(_) => {}
        }
        self.sync_bindings();
    }

    // --- spawned engine calls ---

    fn spawn_open(&mut self, request: OpenRequest) {
        let engine = self.registry.engine();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = engine.open_tab(&request.url).await;
            let _ = tx.send(Completion::Opened { request, result });
        });
    }

    fn spawn_navigate(&mut self, tab: TabId, input: &str) {
        let Ok((connection, url)) = self.registry.navigation_target(tab, input) else {
            return;
        };
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            if let Err(e) = connection.navigate(&url).await {
                warn!(tab = %tab, url = %url, error = %e, "navigation failed");
            }
            let _ = tx.send(Completion::Navigated);
        });
    }

    fn spawn_reconcile(&mut self) {
        let engine = self.registry.engine();
        let generation = self.registry.generation();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = engine.tabs().await;
            let _ = tx.send(Completion::Listed { generation, result });
        });
    }

    fn spawn_size_query(&mut self) {
        let engine = self.registry.engine();
        let generation = self.registry.generation();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = engine.size().await;
            let _ = tx.send(Completion::RemoteSize { generation, result });
        });
    }

    fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let current = self.registry.generation();
        match completion {
            Completion::Opened { request, result } => {
                self.registry.complete_open(request, result);
            }
            Completion::Listed { generation, result } => match result {
                Ok(_) if generation != current => debug!("discarding stale tab listing"),
                Ok(connections) => {
                    self.registry.apply_reconcile(connections);
                }
                Err(e) => warn!(error = %e, "failed to fetch engine tabs"),
            },
            Completion::RemoteSize { generation, result } => match result {
                Ok(Some(size)) if generation == current => self.renderer.set_remote_size(size),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to query remote size"),
            },
            Completion::Navigated => {}
        }
        self.sync_bindings();
    }

    /// Waits for every spawned engine call and applies all queued events.
    ///
    /// Test hook for stepping the app through [`App::handle`] without
    /// [`App::run`]. Never needed alongside a running loop.
    #[doc(hidden)]
    pub async fn settle(&mut self) {
        loop {
            while self.in_flight > 0 {
                match self.completions_rx.recv().await {
                    Some(completion) => self.apply_completion(completion),
                    None => break,
                }
            }

            let mut applied = false;
            for _ in 0..4 {
                tokio::task::yield_now().await;
                while let Ok((tab, event)) = self.events.try_recv() {
                    self.dispatch_event(tab, event);
                    applied = true;
                }
            }
            if !applied && self.in_flight == 0 {
                break;
            }
        }
    }

    /// Rebinds input to the active tab and blanks the display when none is active.
    fn sync_bindings(&mut self) {
        let active = self.registry.active_id();
        if active == self.bound {
            return;
        }
        self.bound = active;
        self.translator.bind(self.registry.active_connection());
        if active.is_none() {
            self.renderer.clear();
        }
    }
}

fn periodic(period: Duration) -> Interval {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(time::Instant::from_std(deadline)).await,
        None => future::pending::<()>().await,
    }
}
