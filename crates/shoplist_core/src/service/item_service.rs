//! Detail screen state manager over one list's items and checked-state.
//!
//! # Responsibility
//! - Hydrate `shopping_items_<id>` (seeding on first open) and
//!   `checked_items_<id>` for one list.
//! - Apply item add/rename/reorder/remove plus check toggling and reset.
//! - Derive progress (`checked_count`) from the checked-state mapping.
//!
//! # Invariants
//! - Item ids stay pairwise distinct within the list.
//! - Removing an item also removes its checked-state entry.
//! - `checked_count` is always recomputed, never persisted on its own.

use crate::model::route::RouteParam;
use crate::model::shopping::{
    default_items, move_record, next_id, normalize_name, remove_record, rename_record,
    CheckedState, ItemId, MoveDirection, ShoppingItem, DEFAULT_LIST_TITLE,
};
use crate::repo::keys::{checked_key, items_key};
use crate::repo::KvStore;
use crate::service::command::{gate, ItemCommand, Surface, SyncOutcome};
use crate::service::list_service::ListRoute;
use crate::service::persist::{load_json, save_json};
use crate::service::session::EditSession;
use log::{debug, error, info};

/// State manager for one list's detail screen.
pub struct ItemManager<S: KvStore> {
    store: S,
    list_id: String,
    title: String,
    items_key: String,
    checked_key: String,
    items: Vec<ShoppingItem>,
    checked: CheckedState,
    session: EditSession,
    loading: bool,
}

impl<S: KvStore> ItemManager<S> {
    /// Creates a manager scoped to the normalized `list_id`.
    ///
    /// `list_name` becomes the screen title; blank or missing names fall back
    /// to the generic title.
    pub fn new(store: S, list_id: &RouteParam, list_name: Option<&str>) -> Self {
        let list_id = list_id.normalize();
        let title = list_name
            .and_then(normalize_name)
            .unwrap_or_else(|| DEFAULT_LIST_TITLE.to_string());
        Self {
            store,
            items_key: items_key(&list_id),
            checked_key: checked_key(&list_id),
            list_id,
            title,
            items: Vec::new(),
            checked: CheckedState::new(),
            session: EditSession::new(),
            loading: true,
        }
    }

    /// Creates a manager for a route produced by the home screen.
    pub fn for_route(store: S, route: &ListRoute) -> Self {
        Self::new(store, &route.route_param(), Some(route.list_name.as_str()))
    }

    /// Hydrates items and checked-state.
    ///
    /// Items fall back to the seed set (written back) when absent or
    /// unreadable. Checked-state falls back to an empty mapping in memory.
    pub fn load(&mut self) -> SyncOutcome {
        self.loading = true;
        let outcome = match load_json::<Vec<ShoppingItem>>(&self.store, &self.items_key) {
            Ok(Some(items)) => {
                info!(
                    "event=items_load module=service status=ok source=store list_id={} count={}",
                    self.list_id,
                    items.len()
                );
                self.items = items;
                SyncOutcome::NoWrite
            }
            Ok(None) => {
                info!(
                    "event=items_load module=service status=ok source=seed list_id={}",
                    self.list_id
                );
                self.seed_items()
            }
            Err(err) => {
                error!(
                    "event=items_load module=service status=error source=seed list_id={} error={}",
                    self.list_id, err
                );
                self.seed_items()
            }
        };

        self.checked = match load_json::<CheckedState>(&self.store, &self.checked_key) {
            Ok(checked) => checked.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event=checked_load module=service status=error list_id={} error={}",
                    self.list_id, err
                );
                CheckedState::new()
            }
        };

        self.session = EditSession::new();
        self.loading = false;
        outcome
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Normalized list id this manager is scoped to.
    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn checked(&self) -> &CheckedState {
        &self.checked
    }

    pub fn is_checked(&self, id: ItemId) -> bool {
        self.checked.is_checked(id)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.checked_count()
    }

    /// Progress text shown in the detail header, e.g. `2/5 完了`.
    pub fn progress_label(&self) -> String {
        format!("{}/{} 完了", self.checked_count(), self.items.len())
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

    /// Applies one detail screen command.
    pub fn dispatch(&mut self, command: ItemCommand) -> SyncOutcome {
        debug!(
            "event=item_command module=service list_id={} command={}",
            self.list_id,
            command_name(&command)
        );
        match command {
            ItemCommand::Add => self.add(),
            ItemCommand::BeginEdit { id } => self.begin_edit(id),
            ItemCommand::EditText { text } => self.set_edit_text(text),
            ItemCommand::SaveEdit => self.save_edit(),
            ItemCommand::CancelEdit => self.cancel_edit(),
            ItemCommand::Rename { id, text } => self.rename(id, &text),
            ItemCommand::Reorder { index, direction } => self.reorder(index, direction),
            ItemCommand::Delete { id } => self.remove(id),
            ItemCommand::ToggleChecked { id } => self.toggle_checked(id),
            ItemCommand::ResetAll => self.reset_all_checked(),
            ItemCommand::ToggleSortMode => self.toggle_sort_mode(),
        }
    }

    /// Appends an item named from the default template.
    pub fn add(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        let id = next_id(&self.items);
        self.items.push(ShoppingItem::with_default_name(id));
        info!(
            "event=item_add module=service status=ok list_id={} item_id={}",
            self.list_id, id
        );
        self.persist_items()
    }

    /// Renames item `id`. Blank names and unknown ids are no-ops.
    pub fn rename(&mut self, id: ItemId, name: &str) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if !rename_record(&mut self.items, id, name) {
            return SyncOutcome::NoWrite;
        }
        self.persist_items()
    }

    /// Swaps the item at `index` with its neighbour. Boundary moves are no-ops.
    pub fn reorder(&mut self, index: usize, direction: MoveDirection) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Sort) {
            return blocked;
        }
        if !move_record(&mut self.items, index, direction) {
            return SyncOutcome::NoWrite;
        }
        self.persist_items()
    }

    /// Removes item `id` together with its checked-state entry.
    pub fn remove(&mut self, id: ItemId) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if !remove_record(&mut self.items, id) {
            return SyncOutcome::NoWrite;
        }
        self.session.forget(id);
        self.checked.remove(id);
        info!(
            "event=item_remove module=service status=ok list_id={} item_id={}",
            self.list_id, id
        );
        self.persist_items().merge(self.persist_checked())
    }

    /// Flips the checked flag of item `id`. Unknown ids are no-ops.
    pub fn toggle_checked(&mut self, id: ItemId) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if !self.items.iter().any(|item| item.id == id) {
            return SyncOutcome::NoWrite;
        }
        self.checked.toggle(id);
        self.persist_checked()
    }

    /// Clears every checked flag.
    pub fn reset_all_checked(&mut self) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Any) {
            return blocked;
        }
        self.checked.clear();
        self.persist_checked()
    }

    /// Starts editing item `id` with its current name in the buffer.
    pub fn begin_edit(&mut self, id: ItemId) -> SyncOutcome {
        if let Some(blocked) = self.guard(Surface::Normal) {
            return blocked;
        }
        if let Some(item) = self.items.iter().find(|item| item.id == id) {
            self.session.begin(item.id, &item.name);
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
        self.session.toggle_sort_mode();
        SyncOutcome::NoWrite
    }

    fn seed_items(&mut self) -> SyncOutcome {
        self.items = default_items();
        self.persist_items()
    }

    fn persist_items(&self) -> SyncOutcome {
        match save_json(&self.store, &self.items_key, &self.items) {
            Ok(()) => SyncOutcome::Persisted,
            Err(err) => {
                error!(
                    "event=items_save module=service status=error list_id={} count={} error={}",
                    self.list_id,
                    self.items.len(),
                    err
                );
                SyncOutcome::WriteFailed
            }
        }
    }

    fn persist_checked(&self) -> SyncOutcome {
        match save_json(&self.store, &self.checked_key, &self.checked) {
            Ok(()) => SyncOutcome::Persisted,
            Err(err) => {
                error!(
                    "event=checked_save module=service status=error list_id={} error={}",
                    self.list_id, err
                );
                SyncOutcome::WriteFailed
            }
        }
    }

    fn guard(&self, surface: Surface) -> Option<SyncOutcome> {
        gate(self.loading, &self.session, surface)
    }
}

fn command_name(command: &ItemCommand) -> &'static str {
    match command {
        ItemCommand::Add => "add",
        ItemCommand::BeginEdit { .. } => "begin_edit",
        ItemCommand::EditText { .. } => "edit_text",
        ItemCommand::SaveEdit => "save_edit",
        ItemCommand::CancelEdit => "cancel_edit",
        ItemCommand::Rename { .. } => "rename",
        ItemCommand::Reorder { .. } => "reorder",
        ItemCommand::Delete { .. } => "delete",
        ItemCommand::ToggleChecked { .. } => "toggle_checked",
        ItemCommand::ResetAll => "reset_all",
        ItemCommand::ToggleSortMode => "toggle_sort_mode",
    }
}
