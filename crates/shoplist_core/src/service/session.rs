//! Per-screen view session: row editing and sort mode.
//!
//! # Invariants
//! - At most one row is in `editing` state.
//! - Entering or leaving sort mode discards any uncommitted edit.
//! - No row can start editing while sort mode is on.

/// Uncommitted edit of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    draft: Option<EditDraft>,
    sort_mode: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sort_mode(&self) -> bool {
        self.sort_mode
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.draft.as_ref().map(|draft| draft.id)
    }

    /// Starts editing `id` with `current_name` in the buffer.
    ///
    /// Replaces any previous draft. Returns `false` in sort mode.
    pub fn begin(&mut self, id: i64, current_name: &str) -> bool {
        if self.sort_mode {
            return false;
        }
        self.draft = Some(EditDraft {
            id,
            text: current_name.to_string(),
        });
        true
    }

    /// Replaces the buffer text. Returns `false` when no row is editing.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Ends editing and hands the draft to the caller for committing.
    pub fn take_draft(&mut self) -> Option<EditDraft> {
        self.draft.take()
    }

    /// Ends editing without committing. Returns whether a draft was dropped.
    pub fn cancel(&mut self) -> bool {
        self.draft.take().is_some()
    }

    /// Flips sort mode and returns the new value.
    pub fn toggle_sort_mode(&mut self) -> bool {
        self.sort_mode = !self.sort_mode;
        self.draft = None;
        self.sort_mode
    }

    /// Drops the draft if it targets `id`.
    pub fn forget(&mut self, id: i64) {
        if self.editing_id() == Some(id) {
            self.draft = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditSession;

    #[test]
    fn begin_replaces_previous_draft() {
        let mut session = EditSession::new();
        assert!(session.begin(1, "a"));
        assert!(session.begin(2, "b"));
        assert_eq!(session.editing_id(), Some(2));
        assert_eq!(session.draft().map(|d| d.text.as_str()), Some("b"));
    }

    #[test]
    fn entering_sort_mode_discards_draft_and_blocks_edits() {
        let mut session = EditSession::new();
        session.begin(1, "a");
        session.set_text("changed");
        assert!(session.toggle_sort_mode());
        assert_eq!(session.draft(), None);
        assert!(!session.begin(1, "a"));
        assert!(!session.set_text("x"));
    }

    #[test]
    fn take_draft_returns_to_viewing() {
        let mut session = EditSession::new();
        session.begin(3, "old");
        session.set_text("new");
        let draft = session.take_draft().expect("draft should exist");
        assert_eq!((draft.id, draft.text.as_str()), (3, "new"));
        assert_eq!(session.editing_id(), None);
        assert!(!session.cancel());
    }
}
