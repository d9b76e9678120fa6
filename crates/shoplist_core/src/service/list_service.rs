//! Home screen state manager over the list sequence.
//!
//! # Responsibility
//! - Hydrate the list sequence from `shopping_lists`, seeding on first run.
//! - Apply add/rename/reorder/remove and mirror the sequence after each one.
//! - Cascade list removal to the list's item and checked-state keys.
//!
//! # Invariants
//! - List ids stay pairwise distinct; new ids are `max + 1`.
//! - Removal writes the shortened sequence first, then always attempts a
//!   best-effort deletion of the derived keys; a cleanup failure never brings
//!   a list back.

use crate::model::route::RouteParam;
use crate::model::shopping::{
    default_lists, move_record, next_id, remove_record, rename_record, ListId, MoveDirection,
    ShoppingList,
};
use crate::repo::keys::{derived_keys, LISTS_KEY};
use crate::repo::KvStore;
use crate::service::command::{gate, ListCommand, Surface, SyncOutcome};
use crate::service::persist::{load_json, remove_keys, save_json};
use crate::service::session::EditSession;
use log::{debug, error, info};

/// Navigation target produced when a list row is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoute {
    /// Decimal string form of the list id.
    pub list_id: String,
    pub list_name: String,
}

impl ListRoute {
    pub fn route_param(&self) -> RouteParam {
        RouteParam::Single(self.list_id.clone())
    }
}

/// State manager for the home screen.
pub struct ListManager<S: KvStore> {
    store: S,
    lists: Vec<ShoppingList>,
    session: EditSession,
    loading: bool,
}

impl<S: KvStore> ListManager<S> {
    /// Creates a manager in loading state. Call [`ListManager::load`] next.
    pub fn new(store: S) -> Self {
        Self {
            store,
            lists: Vec::new(),
            session: EditSession::new(),
            loading: true,
        }
    }

    /// Hydrates the list sequence from the store.
    ///
    /// Absent, unreadable or undecodable data falls back to the two seed
    /// lists, which are written back. Loading always ends, even on failure.
    pub fn load(&mut self) -> SyncOutcome {
        self.loading = true;
        let outcome = match load_json::<Vec<ShoppingList>>(&self.store, LISTS_KEY) {
            Ok(Some(lists)) => {
                info!(
                    "event=lists_load module=service status=ok source=store count={}",
                    lists.len()
                );
                self.lists = lists;
                SyncOutcome::NoWrite
            }
            Ok(None) => {
                info!("event=lists_load module=service status=ok source=seed");
                self.seed()
            }
            Err(err) => {
                error!(
                    "event=lists_load module=service status=error source=seed error={}",
                    err
                );
                self.seed()
            }
        };
        self.session = EditSession::new();
        self.loading = false;
        outcome
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn lists(&self) -> &[ShoppingList] {
        &self.lists
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_sort_mode(&self) -> bool {
        self.session.is_sort_mode()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies one home screen command.
    pub fn dispatch(&mut self, command: ListCommand) -> SyncOutcome {
        debug!(
            "event=list_command module=service command={}",
            command_name(&command)
        );
        match command {
            ListCommand::Add => self.add(),
            ListCommand::BeginEdit { id } => self.begin_edit(id),
            ListCommand::EditText { text } => self.set_edit_text(text),
            ListCommand::SaveEdit => self.save_edit(),
            ListCommand::CancelEdit => self.cancel_edit(),
            ListCommand::Rename { id, text } => self.rename(id, &text),
            ListCommand::Reorder { index, direction } => self.reorder(index, direction),
            ListCommand::Delete { id } => self.remove(id),
            ListCommand::ToggleSortMode => self.toggle_sort_mode(),
        }
    }

    /// Appends a list named from the default template and returns its outcome.
    pub fn add(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        let id = next_id(&self.lists);
        self.lists.push(ShoppingList::with_default_name(id));
        info!("event=list_add module=service status=ok list_id={id}");
        self.persist_lists()
    }

    /// Renames list `id`. Blank names and unknown ids are no-ops.
    pub fn rename(&mut self, id: ListId, name: &str) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if !rename_record(&mut self.lists, id, name) {
            return SyncOutcome::NoWrite;
        }
        self.persist_lists()
    }

    /// Swaps the list at `index` with its neighbour. Boundary moves are no-ops.
    pub fn reorder(&mut self, index: usize, direction: MoveDirection) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Sort) {
            return blocked;
        }
        if !move_record(&mut self.lists, index, direction) {
            return SyncOutcome::NoWrite;
        }
        self.persist_lists()
    }

    /// Removes list `id` and then its derived item and checked-state keys.
    pub fn remove(&mut self, id: ListId) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if !remove_record(&mut self.lists, id) {
            return SyncOutcome::NoWrite;
        }
        self.session.forget(id);

        let saved = self.persist_lists();
        let keys = derived_keys(id);
        let cleaned = match remove_keys(&self.store, &keys) {
            Ok(()) => SyncOutcome::Persisted,
            Err(err) => {
                error!(
                    "event=list_cleanup module=service status=error list_id={} error={}",
                    id, err
                );
                SyncOutcome::WriteFailed
            }
        };
        let outcome = saved.merge(cleaned);
        if outcome == SyncOutcome::Persisted {
            info!("event=list_remove module=service status=ok list_id={id}");
        }
        outcome
    }

    /// Starts editing list `id` with its current name in the buffer.
    pub fn begin_edit(&mut self, id: ListId) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if let Some(list) = self.lists.iter().find(|list| list.id == id) {
            self.session.begin(list.id, &list.name);
        }
        SyncOutcome::NoWrite
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        self.session.set_text(text);
        SyncOutcome::NoWrite
    }

    /// Commits the edit buffer when it is non-blank and returns to viewing.
    pub fn save_edit(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        match self.session.take_draft() {
            Some(draft) => self.rename(draft.id, &draft.text),
            None => SyncOutcome::NoWrite,
        }
    }

    pub fn cancel_edit(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        self.session.cancel();
        SyncOutcome::NoWrite
    }

    /// Flips sort mode, discarding any in-progress rename.
    pub fn toggle_sort_mode(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Any) {
            return blocked;
        }
        let sort_mode = self.session.toggle_sort_mode();
        debug!("event=list_sort_mode module=service sort_mode={sort_mode}");
        SyncOutcome::NoWrite
    }

    /// Returns the navigation target for list `id`.
    ///
    /// `None` while loading, in sort mode, or for an unknown id.
    pub fn open(&self, id: ListId) -> Option<ListRoute> {
        if self.guard(Surface::Normal).is_some() {
            return None;
        }
        self.lists.iter().find(|list| list.id == id).map(|list| ListRoute {
            list_id: list.id.to_string(),
            list_name: list.name.clone(),
        })
    }

    fn seed(&mut self) -> SyncOutcome {
        self.lists = default_lists();
        self.persist_lists()
    }

    fn persist_lists(&self) -> SyncOutcome {
        match save_json(&self.store, LISTS_KEY, &self.lists) {
            Ok(()) => SyncOutcome::Persisted,
            Err(err) => {
                error!(
                    "event=lists_save module=service status=error count={} error={}",
                    self.lists.len(),
                    err
                );
                SyncOutcome::WriteFailed
            }
        }
    }

    fn guard(&self, surface: Surface) -> Option<SyncOutcome> {
        gate(self.loading, &self.session, surface)
    }
}

fn command_name(command: &ListCommand) -> &'static str {
    match command {
        ListCommand::Add => "add",
        ListCommand::BeginEdit { .. } => "begin_edit",
        ListCommand::EditText { .. } => "edit_text",
        ListCommand::SaveEdit => "save_edit",
        ListCommand::CancelEdit => "cancel_edit",
        ListCommand::Rename { .. } => "rename",
        ListCommand::Reorder { .. } => "reorder",
        ListCommand::Delete { .. } => "delete",
        ListCommand::ToggleSortMode => "toggle_sort_mode",
    }
}
