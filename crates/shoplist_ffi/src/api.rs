//! FFI use-case API for the Flutter screens.
//!
//! # Responsibility
//! - Expose the home and detail screen managers to Dart via FRB.
//! - Translate core state into flat view envelopes the UI renders as-is.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One home manager and at most one detail manager live per process.
//! - Every response carries the full current view, never a delta.

use shoplist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ItemCommand, ItemManager, ListCommand, ListManager, MoveDirection, RouteParam, SqliteKvStore,
    SyncOutcome,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const DB_FILE_NAME: &str = "shoplist.sqlite3";
const DB_PATH_ENV: &str = "SHOPLIST_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

#[derive(Default)]
struct Session {
    home: Option<ListManager<SqliteKvStore>>,
    detail: Option<ItemManager<SqliteKvStore>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by both screens.
///
/// Must be called before the first screen opens; later calls are rejected.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One row of the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRowView {
    pub id: i64,
    pub name: String,
}

/// Full home screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    /// False when the screen could not be opened or the last command failed to persist.
    pub ok: bool,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
    pub loading: bool,
    pub sort_mode: bool,
    pub editing_id: Option<i64>,
    pub editing_text: String,
    pub lists: Vec<ListRowView>,
}

/// One row of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: i64,
    pub name: String,
    pub checked: bool,
}

/// Full detail screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub ok: bool,
    pub message: String,
    pub loading: bool,
    pub list_id: String,
    pub title: String,
    /// Header text such as `2/5 完了`.
    pub progress: String,
    pub checked_count: u32,
    pub sort_mode: bool,
    pub editing_id: Option<i64>,
    pub editing_text: String,
    pub items: Vec<ItemRowView>,
}

/// Navigation target returned when a home row is tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRouteView {
    pub list_id: String,
    pub list_name: String,
}

/// Home screen actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    Add,
    BeginEdit { id: i64 },
    EditText { text: String },
    SaveEdit,
    CancelEdit,
    MoveUp { index: u32 },
    MoveDown { index: u32 },
    Delete { id: i64 },
    ToggleSortMode,
}

/// Detail screen actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    Add,
    BeginEdit { id: i64 },
    EditText { text: String },
    SaveEdit,
    CancelEdit,
    MoveUp { index: u32 },
    MoveDown { index: u32 },
    Delete { id: i64 },
    ToggleChecked { id: i64 },
    ResetAll,
    ToggleSortMode,
}

/// Opens (or reloads) the home screen from the store.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Seeds default lists on first launch.
/// - Never panics; store failures are reported with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn home_open() -> HomeView {
    let mut session = lock_session();
    let store = match open_store() {
        Ok(store) => store,
        Err(message) => return home_failure(message),
    };
    let mut manager = ListManager::new(store);
    let outcome = manager.load();
    let view = home_view(&manager, outcome);
    session.home = Some(manager);
    view
}

/// Applies one home screen action and returns the resulting view.
#[flutter_rust_bridge::frb(sync)]
pub fn home_dispatch(action: HomeAction) -> HomeView {
    let mut session = lock_session();
    let Some(manager) = session.home.as_mut() else {
        return home_failure("home screen is not open".to_string());
    };
    let outcome = manager.dispatch(to_list_command(action));
    home_view(manager, outcome)
}

/// Resolves a home row tap into a navigation target.
///
/// Returns `None` in sort mode, while loading, or for an unknown id.
#[flutter_rust_bridge::frb(sync)]
pub fn home_open_list(id: i64) -> Option<ListRouteView> {
    let session = lock_session();
    let route = session.home.as_ref()?.open(id)?;
    Some(ListRouteView {
        list_id: route.list_id,
        list_name: route.list_name,
    })
}

/// Opens the detail screen for a list.
///
/// `list_id` carries the raw route values; the first one is used and an
/// empty vector means the parameter was missing.
#[flutter_rust_bridge::frb(sync)]
pub fn detail_open(list_id: Vec<String>, list_name: Option<String>) -> DetailView {
    let mut session = lock_session();
    let store = match open_store() {
        Ok(store) => store,
        Err(message) => return detail_failure(message),
    };
    let route = if list_id.is_empty() {
        RouteParam::Missing
    } else {
        RouteParam::Multi(list_id)
    };
    let mut manager = ItemManager::new(store, &route, list_name.as_deref());
    let outcome = manager.load();
    let view = detail_view(&manager, outcome);
    session.detail = Some(manager);
    view
}

/// Applies one detail screen action and returns the resulting view.
#[flutter_rust_bridge::frb(sync)]
pub fn detail_dispatch(action: DetailAction) -> DetailView {
    let mut session = lock_session();
    let Some(manager) = session.detail.as_mut() else {
        return detail_failure("detail screen is not open".to_string());
    };
    let outcome = manager.dispatch(to_item_command(action));
    detail_view(manager, outcome)
}

/// Drops the detail screen manager when the user navigates back.
#[flutter_rust_bridge::frb(sync)]
pub fn detail_close() {
    lock_session().detail = None;
}

fn lock_session() -> MutexGuard<'static, Session> {
    SESSION
        .get_or_init(|| Mutex::new(Session::default()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_store() -> Result<SqliteKvStore, String> {
    let path = resolve_db_path();
    SqliteKvStore::open(&path).map_err(|err| {
        log::warn!("event=store_open module=ffi status=error error={err}");
        format!("store open failed: {err}")
    })
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn outcome_status(outcome: SyncOutcome) -> (bool, String) {
    match outcome {
        SyncOutcome::NoWrite | SyncOutcome::Persisted => (true, String::new()),
        SyncOutcome::WriteFailed => (
            false,
            "change applied but could not be saved".to_string(),
        ),
        SyncOutcome::Blocked => (true, "action not available right now".to_string()),
    }
}

fn move_direction(up: bool) -> MoveDirection {
    if up {
        MoveDirection::Up
    } else {
        MoveDirection::Down
    }
}

fn to_list_command(action: HomeAction) -> ListCommand {
    match action {
        HomeAction::Add => ListCommand::Add,
        HomeAction::BeginEdit { id } => ListCommand::BeginEdit { id },
        HomeAction::EditText { text } => ListCommand::EditText { text },
        HomeAction::SaveEdit => ListCommand::SaveEdit,
        HomeAction::CancelEdit => ListCommand::CancelEdit,
        HomeAction::MoveUp { index } => ListCommand::Reorder {
            index: index as usize,
            direction: move_direction(true),
        },
        HomeAction::MoveDown { index } => ListCommand::Reorder {
            index: index as usize,
            direction: move_direction(false),
        },
        HomeAction::Delete { id } => ListCommand::Delete { id },
        HomeAction::ToggleSortMode => ListCommand::ToggleSortMode,
    }
}

fn to_item_command(action: DetailAction) -> ItemCommand {
    match action {
        DetailAction::Add => ItemCommand::Add,
        DetailAction::BeginEdit { id } => ItemCommand::BeginEdit { id },
        DetailAction::EditText { text } => ItemCommand::EditText { text },
        DetailAction::SaveEdit => ItemCommand::SaveEdit,
        DetailAction::CancelEdit => ItemCommand::CancelEdit,
        DetailAction::MoveUp { index } => ItemCommand::Reorder {
            index: index as usize,
            direction: move_direction(true),
        },
        DetailAction::MoveDown { index } => ItemCommand::Reorder {
            index: index as usize,
            direction: move_direction(false),
        },
        DetailAction::Delete { id } => ItemCommand::Delete { id },
        DetailAction::ToggleChecked { id } => ItemCommand::ToggleChecked { id },
        DetailAction::ResetAll => ItemCommand::ResetAll,
        DetailAction::ToggleSortMode => ItemCommand::ToggleSortMode,
    }
}

fn home_view(manager: &ListManager<SqliteKvStore>, outcome: SyncOutcome) -> HomeView {
    let (ok, message) = outcome_status(outcome);
    let draft = manager.session().draft();
    HomeView {
        ok,
        message,
        loading: manager.is_loading(),
        sort_mode: manager.is_sort_mode(),
        editing_id: draft.map(|draft| draft.id),
        editing_text: draft.map(|draft| draft.text.clone()).unwrap_or_default(),
        lists: manager
            .lists()
            .iter()
            .map(|list| ListRowView {
                id: list.id,
                name: list.name.clone(),
            })
            .collect(),
    }
}

fn home_failure(message: String) -> HomeView {
    HomeView {
        ok: false,
        message,
        loading: false,
        sort_mode: false,
        editing_id: None,
        editing_text: String::new(),
        lists: Vec::new(),
    }
}

fn detail_view(manager: &ItemManager<SqliteKvStore>, outcome: SyncOutcome) -> DetailView {
    let (ok, message) = outcome_status(outcome);
    let draft = manager.session().draft();
    DetailView {
        ok,
        message,
        loading: manager.is_loading(),
        list_id: manager.list_id().to_string(),
        title: manager.title().to_string(),
        progress: manager.progress_label(),
        checked_count: u32::try_from(manager.checked_count()).unwrap_or(u32::MAX),
        sort_mode: manager.is_sort_mode(),
        editing_id: draft.map(|draft| draft.id),
        editing_text: draft.map(|draft| draft.text.clone()).unwrap_or_default(),
        items: manager
            .items()
            .iter()
            .map(|item| ItemRowView {
                id: item.id,
                name: item.name.clone(),
                checked: manager.is_checked(item.id),
            })
            .collect(),
    }
}

fn detail_failure(message: String) -> DetailView {
    DetailView {
        ok: false,
        message,
        loading: false,
        list_id: String::new(),
        title: String::new(),
        progress: String::new(),
        checked_count: 0,
        sort_mode: false,
        editing_id: None,
        editing_text: String::new(),
        items: Vec::new(),
    }
}
