#[path = "../common/mod.rs"]
mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::{Call, MockBrowser, MockConnection, RecordingCallbacks};
use relaybrowser::engine::{RemoteBrowser, TabConnection};
use relaybrowser::managers::bookmark_manager::BookmarkManagerTrait;
use relaybrowser::managers::download_manager::DownloadManagerTrait;
use relaybrowser::managers::session_manager::{MemorySessionStore, SessionStore};
use relaybrowser::managers::tab_registry::{
    EventOutcome, TabAction, TabCommand, TabEventReceiver, TabRegistry,
};
use relaybrowser::types::download::DownloadProgress;
use relaybrowser::types::errors::{EngineError, TabError};
use relaybrowser::types::events::{FileDialog, FileDialogMode, FileDialogResponse, TabEvent};
use relaybrowser::types::frame::Frame;
use relaybrowser::types::input::Cursor;
use relaybrowser::types::session::{BookmarkRecord, PersistedTab};
use relaybrowser::types::settings::AppConfig;
use relaybrowser::types::tab::{LoadState, LoadStatus, TabId, TabSeed, PLACEHOLDER_TITLE};

struct Harness {
    browser: Arc<MockBrowser>,
    store: Arc<MemorySessionStore>,
    callbacks: Arc<RecordingCallbacks>,
    registry: TabRegistry,
    _events: TabEventReceiver,
}

fn harness_with(config: AppConfig, store: MemorySessionStore) -> Harness {
    let browser = MockBrowser::new();
    let store = Arc::new(store);
    let callbacks = RecordingCallbacks::new();
    let engine: Arc<dyn RemoteBrowser> = browser.clone();
    let (registry, events) = TabRegistry::new(engine, store.clone(), callbacks.clone(), config);
    Harness {
        browser,
        store,
        callbacks,
        registry,
        _events: events,
    }
}

fn harness() -> Harness {
    harness_with(AppConfig::browser(), MemorySessionStore::new())
}

fn download(id: u32) -> DownloadProgress {
    DownloadProgress {
        id,
        path: "/tmp/file.zip".to_string(),
        received: 10,
        total: 100,
        is_complete: false,
        is_aborted: false,
    }
}

fn dialog() -> FileDialog {
    FileDialog {
        mode: FileDialogMode::Open,
        title: "Upload".to_string(),
        default_path: String::new(),
        accept_types: vec![".png".to_string()],
    }
}

fn bookmark(url: &str) -> BookmarkRecord {
    BookmarkRecord {
        title: format!("Title of {}", url),
        url: url.to_string(),
        favicon: String::new(),
    }
}

fn persisted(url: &str, active: bool) -> PersistedTab {
    PersistedTab {
        title: format!("Saved {}", url),
        url: url.to_string(),
        favicon: String::new(),
        pinned: false,
        active,
    }
}

// === Opening ===

#[tokio::test]
async fn test_open_activates_new_tab() {
    let mut h = harness();
    let id = h.registry.open(Some("https://example.com")).await.unwrap();

    assert_eq!(h.registry.active_id(), Some(id));
    let tab = h.registry.tab(id).unwrap();
    assert!(tab.active);
    assert_eq!(tab.url, "https://example.com");
    assert_eq!(tab.title, PLACEHOLDER_TITLE);
    assert!(h.browser.page(id).video_running());
    assert_eq!(h.callbacks.focus_count(), 1);
}

#[tokio::test]
async fn test_open_resolves_search_query() {
    let mut h = harness();
    h.registry.open(Some("rust lang")).await.unwrap();
    assert_eq!(
        h.browser.opened_urls(),
        vec!["https://www.google.com/search?q=rust+lang".to_string()]
    );
}

#[tokio::test]
async fn test_open_without_input_uses_default_url() {
    let mut config = AppConfig::browser();
    config.navigation.default_url = "about:blank".to_string();
    let mut h = harness_with(config, MemorySessionStore::new());

    h.registry.open(None).await.unwrap();
    assert_eq!(h.browser.opened_urls(), vec!["about:blank".to_string()]);
}

#[tokio::test]
async fn test_open_failure_registers_nothing() {
    let mut h = harness();
    h.browser.set_fail_open(true);

    assert!(h.registry.open(Some("https://example.com")).await.is_none());
    assert!(h.registry.is_empty());
    assert_eq!(h.registry.pending_opens(), 0);
    assert_eq!(h.registry.active_id(), None);
}

#[tokio::test]
async fn test_stale_completion_after_clear_closes_connection() {
    let mut h = harness();
    let request = h.registry.begin_open(Some("https://late.com"));
    h.registry.clear();

    let result = h.browser.open_tab(&request.url).await;
    assert!(h.registry.complete_open(request, result).is_none());

    assert!(h.registry.is_empty());
    assert!(h.browser.pages()[0].is_closed());
}

#[tokio::test]
async fn test_cancelled_open_is_discarded() {
    let mut h = harness();
    let request = h.registry.begin_open(Some("https://example.com"));
    assert_eq!(h.registry.pending_opens(), 1);
    assert!(h.registry.cancel_open(request.id));

    let result = h.browser.open_tab(&request.url).await;
    assert!(h.registry.complete_open(request, result).is_none());
    assert!(h.registry.is_empty());
    assert!(h.browser.pages()[0].is_closed());
}

#[tokio::test]
async fn test_connection_without_event_stream_is_closed() {
    let mut h = harness();
    let request = h.registry.begin_open(Some("https://example.com"));
    let connection = MockConnection::new(42, "https://example.com");
    connection.fail_events();

    let result: Result<Arc<dyn TabConnection>, EngineError> = Ok(connection.clone());
    assert!(h.registry.complete_open(request, result).is_none());
    assert!(connection.is_closed());
    assert!(!h.registry.contains(TabId(42)));
}

#[tokio::test]
async fn test_open_completing_on_tracked_tab_activates_it() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    assert_eq!(h.registry.active_id(), Some(b));

    let request = h
        .registry
        .begin_open_seeded("https://a.com".to_string(), TabSeed::default(), true, false);
    let existing: Arc<dyn TabConnection> = h.browser.page(a);
    assert_eq!(h.registry.complete_open(request, Ok(existing)), Some(a));

    assert_eq!(h.registry.len(), 2);
    assert_eq!(h.registry.active_id(), Some(a));
}

#[tokio::test]
async fn test_seeded_open_keeps_remembered_state() {
    let mut h = harness();
    let seed = TabSeed {
        title: Some("Docs".to_string()),
        url: Some("https://docs.rs".to_string()),
        favicon: Some("https://docs.rs/favicon.ico".to_string()),
        pinned: true,
    };
    let request = h
        .registry
        .begin_open_seeded("https://docs.rs".to_string(), seed, false, false);
    let result = h.browser.open_tab(&request.url).await;
    let id = h.registry.complete_open(request, result).unwrap();

    let tab = h.registry.tab(id).unwrap();
    assert_eq!(tab.title, "Docs");
    assert_eq!(tab.favicon, "https://docs.rs/favicon.ico");
    assert!(tab.pinned);
    assert!(!tab.active);
    assert_eq!(h.callbacks.focus_count(), 0);
}

// === Activation ===

#[tokio::test]
async fn test_activate_moves_video_stream() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();

    assert!(!h.browser.page(a).video_running());
    assert!(h.browser.page(b).video_running());

    h.registry.activate(a).unwrap();
    assert!(h.browser.page(a).video_running());
    assert!(!h.browser.page(b).video_running());
    assert_eq!(h.browser.running_streams(), 1);
    assert!(!h.registry.tab(b).unwrap().active);
}

#[tokio::test]
async fn test_activate_active_tab_is_noop() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.activate(a).unwrap();
    h.registry.activate(a).unwrap();
    assert_eq!(h.browser.page(a).count(&Call::StartVideo), 1);
    assert_eq!(h.browser.page(a).count(&Call::StopVideo), 0);
}

#[tokio::test]
async fn test_activate_unknown_tab() {
    let mut h = harness();
    assert_eq!(
        h.registry.activate(TabId(99)),
        Err(TabError::NotFound(TabId(99)))
    );
}

#[tokio::test]
async fn test_activate_survives_engine_failure() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    h.browser.page(a).fail_calls();

    h.registry.activate(a).unwrap();
    assert_eq!(h.registry.active_id(), Some(a));
    assert!(!h.registry.tab(b).unwrap().active);
}

#[tokio::test]
async fn test_shift_wraps_around() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let _b = h.registry.open(Some("https://b.com")).await.unwrap();
    let c = h.registry.open(Some("https://c.com")).await.unwrap();

    h.registry.shift(true).unwrap();
    assert_eq!(h.registry.active_id(), Some(a));
    h.registry.shift(false).unwrap();
    assert_eq!(h.registry.active_id(), Some(c));
}

// === Closing ===

#[tokio::test]
async fn test_close_active_activates_left_neighbour() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    let c = h.registry.open(Some("https://c.com")).await.unwrap();

    h.registry.activate(b).unwrap();
    h.registry.close(b).unwrap();
    assert_eq!(h.registry.active_id(), Some(a));
    assert_eq!(h.registry.order(), &[a, c]);
    assert!(h.browser.page(b).is_closed());
    assert!(h.browser.page(a).video_running());
}

#[tokio::test]
async fn test_close_first_active_tab_activates_new_first() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();

    h.registry.activate(a).unwrap();
    h.registry.close(a).unwrap();
    assert_eq!(h.registry.active_id(), Some(b));
}

#[tokio::test]
async fn test_close_inactive_keeps_active() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();

    h.registry.close(a).unwrap();
    assert_eq!(h.registry.active_id(), Some(b));
    assert_eq!(h.browser.page(b).count(&Call::StartVideo), 1);
}

#[tokio::test]
async fn test_close_last_tab_leaves_nothing_active() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.close(a).unwrap();
    assert!(h.registry.is_empty());
    assert_eq!(h.registry.active_id(), None);
    assert_eq!(h.browser.running_streams(), 0);
}

#[tokio::test]
async fn test_close_pinned_tab_is_refused() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();

    assert_eq!(h.registry.close(a), Err(TabError::Pinned(a)));
    assert!(h.registry.contains(a));
    assert!(!h.browser.page(a).is_closed());
}

#[tokio::test]
async fn test_close_unknown_tab() {
    let mut h = harness();
    assert_eq!(h.registry.close(TabId(7)), Err(TabError::NotFound(TabId(7))));
}

#[tokio::test]
async fn test_clear_stops_video_but_keeps_remote_pages() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.clear();

    assert!(h.registry.is_empty());
    assert_eq!(h.registry.generation(), 1);
    assert!(!h.browser.page(a).video_running());
    assert!(!h.browser.page(a).is_closed());
}

#[tokio::test]
async fn test_set_engine_closes_previous_engine() {
    let mut h = harness();
    h.registry.open(Some("https://a.com")).await.unwrap();

    let next = MockBrowser::new();
    let engine: Arc<dyn RemoteBrowser> = next.clone();
    h.registry.set_engine(engine);

    assert!(h.browser.is_closed());
    assert!(h.registry.is_empty());
    h.registry.open(Some("https://b.com")).await.unwrap();
    assert_eq!(next.opened_urls(), vec!["https://b.com".to_string()]);
}

// === Navigation and commands ===

#[tokio::test]
async fn test_navigate_passes_domain_verbatim() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.navigate(a, "example.com/path").await.unwrap();
    assert_eq!(
        h.browser.page(a).calls().last(),
        Some(&Call::Navigate("example.com/path".to_string()))
    );
}

#[tokio::test]
async fn test_navigate_unknown_tab() {
    let mut h = harness();
    let result = h.registry.navigate(TabId(3), "example.com").await;
    assert_eq!(result, Err(TabError::NotFound(TabId(3))));
}

#[tokio::test]
async fn test_execute_forwards_page_actions() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let page = h.browser.page(a);
    page.clear_calls();

    for action in [TabAction::Back, TabAction::Reload, TabAction::Copy, TabAction::Redo] {
        h.registry.execute(TabCommand::new(a, action)).unwrap();
    }
    assert_eq!(page.calls(), vec![Call::Back, Call::Reload, Call::Copy, Call::Redo]);
}

#[tokio::test]
async fn test_execute_reports_engine_failure() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.browser.page(a).fail_calls();

    let result = h.registry.execute(TabCommand::new(a, TabAction::Forward));
    assert!(matches!(result, Err(TabError::Engine(EngineError::Rejected(_)))));
}

#[tokio::test]
async fn test_execute_pin_and_close() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    h.registry.execute(TabCommand::new(a, TabAction::Pin)).unwrap();
    assert!(h.registry.tab(a).unwrap().pinned);
    assert_eq!(
        h.registry.execute(TabCommand::new(a, TabAction::Close)),
        Err(TabError::Pinned(a))
    );
    h.registry.execute(TabCommand::new(a, TabAction::Unpin)).unwrap();
    h.registry.execute(TabCommand::new(a, TabAction::Close)).unwrap();
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_reorder_moves_tab() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    let c = h.registry.open(Some("https://c.com")).await.unwrap();

    h.registry.reorder(c, 0).unwrap();
    assert_eq!(h.registry.order(), &[c, a, b]);
    assert_eq!(h.registry.reorder(a, 3), Err(TabError::InvalidIndex(3)));
    assert_eq!(h.registry.reorder(TabId(50), 0), Err(TabError::NotFound(TabId(50))));
}

// === Pinning ===

#[tokio::test]
async fn test_pin_mirrors_bookmark_and_saves() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.apply_event(a, TabEvent::Title("A".to_string()));

    h.registry.pin(a).unwrap();
    assert!(h.registry.bookmarks().contains("https://a.com"));
    let saved = h.store.read_bookmarks().unwrap().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].title, "A");

    h.registry.unpin(a).unwrap();
    assert!(!h.registry.bookmarks().contains("https://a.com"));
    assert_eq!(h.store.read_bookmarks().unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn test_pin_twice_keeps_one_bookmark() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();
    h.registry.pin(a).unwrap();
    assert_eq!(h.registry.bookmarks().all().len(), 1);
}

#[tokio::test]
async fn test_pin_without_save_does_not_write() {
    let mut h = harness_with(AppConfig::observer(), MemorySessionStore::new());
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();
    assert!(h.registry.bookmarks().contains("https://a.com"));
    assert_eq!(h.store.read_bookmarks().unwrap(), None);
}

#[tokio::test]
async fn test_pinned_tab_bookmark_follows_navigation() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();

    h.registry.apply_event(a, TabEvent::Url("https://b.com".to_string()));
    assert!(!h.registry.bookmarks().contains("https://a.com"));
    assert!(h.registry.bookmarks().contains("https://b.com"));
    let saved = h.store.read_bookmarks().unwrap().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].url, "https://b.com");

    h.registry.unpin(a).unwrap();
    assert!(h.registry.bookmarks().all().is_empty());
    assert_eq!(h.store.read_bookmarks().unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn test_unpinned_tab_navigation_leaves_bookmarks_alone() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    h.registry.pin(a).unwrap();

    h.registry.apply_event(b, TabEvent::Url("https://c.com".to_string()));
    let urls: Vec<&str> = h.registry.bookmarks().all().iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.com"]);
}

#[tokio::test]
async fn test_shared_bookmark_survives_until_last_unpin() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();
    h.registry.pin(b).unwrap();
    assert_eq!(h.registry.bookmarks().all().len(), 1);

    h.registry.unpin(a).unwrap();
    assert!(h.registry.tab(b).unwrap().pinned);
    assert!(h.registry.bookmarks().contains("https://a.com"));
    assert_eq!(h.store.read_bookmarks().unwrap().unwrap().len(), 1);

    h.registry.unpin(b).unwrap();
    assert!(h.registry.bookmarks().all().is_empty());
}

#[tokio::test]
async fn test_shared_bookmark_kept_when_one_pinned_tab_navigates() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry.pin(a).unwrap();
    h.registry.pin(b).unwrap();

    h.registry.apply_event(a, TabEvent::Url("https://moved.com".to_string()));
    assert!(h.registry.bookmarks().contains("https://a.com"));
    assert!(h.registry.bookmarks().contains("https://moved.com"));
}

#[tokio::test]
async fn test_restored_pinned_tab_owns_its_bookmark() {
    let store = MemorySessionStore::with_contents(Vec::new(), vec![bookmark("https://z.com")]);
    let mut h = harness_with(AppConfig::browser(), store);
    let opened = h.registry.restore().await;

    h.registry.unpin(opened[0]).unwrap();
    assert!(h.registry.bookmarks().all().is_empty());
    assert_eq!(h.store.read_bookmarks().unwrap(), Some(Vec::new()));
}

// === Events ===

#[tokio::test]
async fn test_events_update_tab_state() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    let events = [
        TabEvent::Title("Example".to_string()),
        TabEvent::Url("https://a.com/next".to_string()),
        TabEvent::Favicon("https://a.com/icon.png".to_string()),
        TabEvent::UrlHovered("https://a.com/link".to_string()),
        TabEvent::LoadState(LoadState {
            status: LoadStatus::Loading,
            can_go_back: true,
            can_go_forward: false,
        }),
    ];
    for event in events {
        assert_eq!(h.registry.apply_event(a, event), EventOutcome::Updated);
    }

    let tab = h.registry.tab(a).unwrap();
    assert_eq!(tab.title, "Example");
    assert_eq!(tab.url, "https://a.com/next");
    assert_eq!(tab.favicon, "https://a.com/icon.png");
    assert_eq!(tab.hovered_url, "https://a.com/link");
    assert!(tab.is_loading);
    assert!(tab.can_go_back);
    assert!(!tab.can_go_forward);

    h.registry.apply_event(
        a,
        TabEvent::LoadState(LoadState {
            status: LoadStatus::Loaded,
            can_go_back: true,
            can_go_forward: true,
        }),
    );
    assert!(!h.registry.tab(a).unwrap().is_loading);
}

#[tokio::test]
async fn test_frames_render_only_for_active_tab() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();
    let frame = Frame::new(2, 2, vec![0; 16]);

    assert_eq!(
        h.registry.apply_event(a, TabEvent::Frame(frame.clone())),
        EventOutcome::Ignored
    );
    assert_eq!(
        h.registry.apply_event(b, TabEvent::Frame(frame.clone())),
        EventOutcome::Render(frame)
    );
}

#[tokio::test]
async fn test_cursor_changes_only_for_active_tab() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let b = h.registry.open(Some("https://b.com")).await.unwrap();

    assert_eq!(
        h.registry.apply_event(a, TabEvent::Cursor(Cursor::Hand)),
        EventOutcome::Ignored
    );
    assert_eq!(
        h.registry.apply_event(b, TabEvent::Cursor(Cursor::IBeam)),
        EventOutcome::Cursor(Cursor::IBeam)
    );
    assert_eq!(*h.callbacks.cursors.lock().unwrap(), vec![Cursor::IBeam]);
}

#[tokio::test]
async fn test_download_tracked_when_allowed() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    let outcome = h.registry.apply_event(a, TabEvent::DownloadProgress(download(1)));
    assert_eq!(outcome, EventOutcome::Download(download(1)));
    assert_eq!(h.registry.downloads().list().len(), 1);
    assert_eq!(h.callbacks.downloads.lock().unwrap()[0].0, a);
}

#[tokio::test]
async fn test_download_cancelled_when_disallowed() {
    let mut h = harness_with(AppConfig::observer(), MemorySessionStore::new());
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    let outcome = h.registry.apply_event(a, TabEvent::DownloadProgress(download(5)));
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(h.browser.page(a).count(&Call::CancelDownload(5)), 1);
    assert!(h.registry.downloads().list().is_empty());
    assert!(h.callbacks.downloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_file_dialog_relays_selection() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let selection = FileDialogResponse::Selected(vec![PathBuf::from("/home/me/cat.png")]);
    *h.callbacks.dialog_answer.lock().unwrap() = Some(selection.clone());

    let outcome = h.registry.handle_event(a, TabEvent::FileDialog(dialog())).await;
    assert_eq!(outcome, EventOutcome::FileDialog(dialog()));
    assert_eq!(h.callbacks.dialogs.lock().unwrap().len(), 1);
    assert_eq!(h.browser.page(a).count(&Call::FileDialog(selection)), 1);
}

#[tokio::test]
async fn test_file_dialog_cancelled_when_uploads_disallowed() {
    let mut h = harness_with(AppConfig::observer(), MemorySessionStore::new());
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    let outcome = h.registry.handle_event(a, TabEvent::FileDialog(dialog())).await;
    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(h.callbacks.dialogs.lock().unwrap().is_empty());
    assert_eq!(
        h.browser.page(a).count(&Call::FileDialog(FileDialogResponse::Cancelled)),
        1
    );
}

#[tokio::test]
async fn test_external_link_policy() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    h.registry
        .handle_event(a, TabEvent::ExternalLink("mailto:me@example.com".to_string()))
        .await;
    assert_eq!(
        *h.callbacks.external_links.lock().unwrap(),
        vec!["mailto:me@example.com".to_string()]
    );

    let mut observer = harness_with(AppConfig::observer(), MemorySessionStore::new());
    let b = observer.registry.open(Some("https://b.com")).await.unwrap();
    let outcome = observer
        .registry
        .handle_event(b, TabEvent::ExternalLink("mailto:me@example.com".to_string()))
        .await;
    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(observer.callbacks.external_links.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_tab_event_opens_and_activates() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();

    let outcome = h
        .registry
        .handle_event(a, TabEvent::NewTab("https://popup.com".to_string()))
        .await;
    assert_eq!(outcome, EventOutcome::OpenTab("https://popup.com".to_string()));
    assert_eq!(h.registry.len(), 2);
    assert_eq!(h.registry.active_tab().unwrap().url, "https://popup.com");
}

#[tokio::test]
async fn test_event_for_unknown_tab_is_ignored() {
    let mut h = harness();
    assert_eq!(
        h.registry.apply_event(TabId(11), TabEvent::Title("x".to_string())),
        EventOutcome::Ignored
    );
}

// === Reconcile ===

#[tokio::test]
async fn test_reconcile_attaches_external_tabs() {
    let mut h = harness();
    let first = h.browser.add_external("https://one.com");
    let second = h.browser.add_external("https://two.com");

    let added = h.registry.reconcile().await.unwrap();
    assert_eq!(added, vec![first.id(), second.id()]);
    assert_eq!(h.registry.active_id(), Some(first.id()));
    assert_eq!(h.browser.running_streams(), 1);

    assert!(h.registry.reconcile().await.unwrap().is_empty());
    assert_eq!(h.registry.len(), 2);
}

#[tokio::test]
async fn test_reconcile_keeps_current_active_tab() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let external = h.browser.add_external("https://ext.com");

    let added = h.registry.reconcile().await.unwrap();
    assert_eq!(added, vec![external.id()]);
    assert_eq!(h.registry.active_id(), Some(a));
    assert!(!external.video_running());
}

#[tokio::test]
async fn test_reconcile_reports_engine_failure() {
    let mut h = harness();
    h.browser.set_fail_tabs(true);
    let result = h.registry.reconcile().await;
    assert!(matches!(result, Err(TabError::Engine(EngineError::Timeout(_)))));
}

// === Persistence ===

#[tokio::test]
async fn test_persist_writes_unpinned_tabs_and_bookmarks() {
    let mut h = harness();
    let a = h.registry.open(Some("https://a.com")).await.unwrap();
    let _b = h.registry.open(Some("https://b.com")).await.unwrap();
    h.registry.pin(a).unwrap();

    h.registry.persist().unwrap();
    let tabs = h.store.read_tabs().unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].url, "https://b.com");
    assert!(tabs[0].active);
    assert_eq!(
        h.store.read_bookmarks().unwrap().unwrap()[0].url,
        "https://a.com"
    );
}

#[tokio::test]
async fn test_restore_reopens_bookmarks_then_tabs() {
    let store = MemorySessionStore::with_contents(
        vec![persisted("https://x.com", false), persisted("https://y.com", true)],
        vec![bookmark("https://z.com")],
    );
    let mut h = harness_with(AppConfig::browser(), store);

    let opened = h.registry.restore().await;
    assert_eq!(opened.len(), 3);
    assert_eq!(
        h.browser.opened_urls(),
        vec![
            "https://z.com".to_string(),
            "https://x.com".to_string(),
            "https://y.com".to_string(),
        ]
    );

    let tabs = h.registry.tabs();
    assert!(tabs[0].pinned);
    assert_eq!(tabs[0].title, "Title of https://z.com");
    assert!(!tabs[1].pinned);
    assert_eq!(tabs[1].title, "Saved https://x.com");
    assert_eq!(h.registry.active_tab().unwrap().url, "https://y.com");
    assert_eq!(h.browser.running_streams(), 1);
    assert_eq!(h.callbacks.focus_count(), 0);
}

#[tokio::test]
async fn test_restore_activates_last_without_saved_active() {
    let store = MemorySessionStore::with_contents(
        vec![persisted("https://x.com", false), persisted("https://y.com", false)],
        Vec::new(),
    );
    let mut h = harness_with(AppConfig::browser(), store);
    h.registry.restore().await;
    assert_eq!(h.registry.active_tab().unwrap().url, "https://y.com");
}

#[tokio::test]
async fn test_restore_uses_default_bookmarks_without_file() {
    let mut config = AppConfig::browser();
    config.default_bookmarks = vec![bookmark("https://start.page")];
    let mut h = harness_with(config, MemorySessionStore::new());

    h.registry.restore().await;
    assert_eq!(h.registry.len(), 1);
    let tab = h.registry.active_tab().unwrap();
    assert!(tab.pinned);
    assert_eq!(tab.url, "https://start.page");
}

#[tokio::test]
async fn test_restore_empty_session_opens_default_tab() {
    let mut config = AppConfig::browser();
    config.navigation.default_url = "about:blank".to_string();
    let mut h = harness_with(config, MemorySessionStore::new());

    let opened = h.registry.restore().await;
    assert_eq!(opened.len(), 1);
    assert_eq!(h.browser.opened_urls(), vec!["about:blank".to_string()]);
    assert!(h.registry.active_id().is_some());
}
