//! Commands accepted by the state managers and their outcomes.

use crate::model::shopping::{ItemId, ListId, MoveDirection};
use crate::service::session::EditSession;

/// Result of one command as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was written: a no-op or a view-only transition.
    NoWrite,
    /// State changed and every write succeeded.
    Persisted,
    /// State changed in memory but at least one write failed (logged).
    WriteFailed,
    /// Command is not available in the current mode or while loading.
    Blocked,
}

impl SyncOutcome {
    /// Folds the outcomes of several writes belonging to one command.
    pub fn merge(self, other: SyncOutcome) -> SyncOutcome {
        use SyncOutcome::*;
        match (self, other) {
            (Blocked, _) | (_, Blocked) => Blocked,
            (WriteFailed, _) | (_, WriteFailed) => WriteFailed,
            (Persisted, _) | (_, Persisted) => Persisted,
            (NoWrite, NoWrite) => NoWrite,
        }
    }
}

/// Home screen commands over the list sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    Add,
    BeginEdit { id: ListId },
    EditText { text: String },
    SaveEdit,
    CancelEdit,
    Rename { id: ListId, text: String },
    Reorder { index: usize, direction: MoveDirection },
    Delete { id: ListId },
    ToggleSortMode,
}

/// Detail screen commands over one list's items and checked-state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    Add,
    BeginEdit { id: ItemId },
    EditText { text: String },
    SaveEdit,
    CancelEdit,
    Rename { id: ItemId, text: String },
    Reorder { index: usize, direction: MoveDirection },
    Delete { id: ItemId },
    ToggleChecked { id: ItemId },
    ResetAll,
    ToggleSortMode,
}

/// Which operation surface a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Surface {
    /// Add, edit, delete, check and navigate.
    Normal,
    /// Positional reordering.
    Sort,
    /// Available in both modes.
    Any,
}

/// Returns `Some(Blocked)` when `surface` is unavailable right now.
pub(crate) fn gate(loading: bool, session: &EditSession, surface: Surface) -> Option<SyncOutcome> {
    let allowed = !loading
        && match surface {
            Surface::Normal => !session.is_sort_mode(),
            Surface::Sort => session.is_sort_mode(),
            Surface::Any => true,
        };
    if allowed {
        None
    } else {
        Some(SyncOutcome::Blocked)
    }
}
