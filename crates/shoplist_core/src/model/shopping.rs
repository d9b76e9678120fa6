//! Shopping list records, checked-state and sequence helpers.
//!
//! # Invariants
//! - `next_id` returns `1` for an empty sequence, else `max(id) + 1`; when
//!   `max(id)` is `i64::MAX` it returns the lowest unused positive id.
//! - `move_record` swaps neighbours only; boundary moves are no-ops.
//! - Stored names are trimmed and never empty.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type ListId = i64;
pub type ItemId = i64;

pub const DEFAULT_LIST_TITLE: &str = "買い物リスト";

/// A named shopping list. Serialized as `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: ListId,
    pub name: String,
}

/// A named entry inside one shopping list. Serialized as `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: ItemId,
    pub name: String,
}

/// Direction of a positional move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Record with an integer id and an editable name.
pub trait NamedRecord {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

impl NamedRecord for ShoppingList {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl NamedRecord for ShoppingItem {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl ShoppingList {
    /// Creates a list named with the default template for `id`.
    pub fn with_default_name(id: ListId) -> Self {
        Self {
            id,
            name: format!("新しいリスト {id}"),
        }
    }
}

impl ShoppingItem {
    /// Creates an item named with the default template for `id`.
    pub fn with_default_name(id: ItemId) -> Self {
        Self {
            id,
            name: format!("新しい商品 {id}"),
        }
    }
}

/// Lists written on first launch when nothing is stored yet.
pub fn default_lists() -> Vec<ShoppingList> {
    [(1, "今日の買い物"), (2, "週末の準備")]
        .into_iter()
        .map(|(id, name)| ShoppingList {
            id,
            name: name.to_string(),
        })
        .collect()
}

/// Items written the first time a list without saved items is opened.
pub fn default_items() -> Vec<ShoppingItem> {
    [(1, "牛乳"), (2, "パン"), (3, "卵"), (4, "りんご"), (5, "トマト")]
        .into_iter()
        .map(|(id, name)| ShoppingItem {
            id,
            name: name.to_string(),
        })
        .collect()
}

/// Per-list mapping from item id (decimal string) to checked flag.
///
/// Absent entries are unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckedState(BTreeMap<String, bool>);

impl CheckedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, item_id: ItemId) -> bool {
        self.0
            .get(item_id.to_string().as_str())
            .copied()
            .unwrap_or(false)
    }

    /// Sets an explicit flag for `item_id`.
    pub fn set(&mut self, item_id: ItemId, checked: bool) {
        self.0.insert(item_id.to_string(), checked);
    }

    /// Flips the flag for `item_id` and returns the new value.
    pub fn toggle(&mut self, item_id: ItemId) -> bool {
        let next = !self.is_checked(item_id);
        self.set(item_id, next);
        next
    }

    /// Drops the entry for `item_id`. Returns whether an entry existed.
    pub fn remove(&mut self, item_id: ItemId) -> bool {
        self.0.remove(item_id.to_string().as_str()).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of entries whose flag is `true`.
    pub fn checked_count(&self) -> usize {
        self.0.values().filter(|checked| **checked).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ItemId, bool)> for CheckedState {
    fn from_iter<T: IntoIterator<Item = (ItemId, bool)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, checked)| (id.to_string(), checked))
                .collect(),
        )
    }
}

/// Trims `raw` and returns it when something remains.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Next id for a sequence: `1` when empty, else `max(id) + 1`.
pub fn next_id<R: NamedRecord>(records: &[R]) -> i64 {
    let Some(max) = records.iter().map(NamedRecord::id).max() else {
        return 1;
    };
    max.checked_add(1).unwrap_or_else(|| lowest_unused_id(records))
}

fn lowest_unused_id<R: NamedRecord>(records: &[R]) -> i64 {
    let taken: BTreeSet<i64> = records.iter().map(NamedRecord::id).collect();
    (1..=i64::MAX).find(|id| !taken.contains(id)).unwrap_or(1)
}

/// Swaps the record at `index` with its neighbour in `direction`.
///
/// Returns `false` (and leaves `records` untouched) at the boundary or for an
/// out-of-range index.
pub fn move_record<R>(records: &mut [R], index: usize, direction: MoveDirection) -> bool {
    if index >= records.len() {
        return false;
    }
    let target = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < records.len() => index + 1,
        _ => return false,
    };
    records.swap(index, target);
    true
}

/// Replaces the name of the record with `id`. Blank names are rejected.
///
/// Returns whether a record was renamed.
pub fn rename_record<R: NamedRecord>(records: &mut [R], id: i64, raw_name: &str) -> bool {
    let Some(name) = normalize_name(raw_name) else {
        return false;
    };
    match records.iter_mut().find(|record| record.id() == id) {
        Some(record) => {
            record.set_name(name);
            true
        }
        None => false,
    }
}

/// Removes the record with `id`. Returns whether one was removed.
pub fn remove_record<R: NamedRecord>(records: &mut Vec<R>, id: i64) -> bool {
    let before = records.len();
    records.retain(|record| record.id() != id);
    records.len() != before
}

#[cfg(test)]
mod tests {
    use super::{
        move_record, next_id, normalize_name, remove_record, rename_record, CheckedState,
        MoveDirection, ShoppingList,
    };

    fn lists(ids: &[i64]) -> Vec<ShoppingList> {
        ids.iter()
            .map(|id| ShoppingList::with_default_name(*id))
            .collect()
    }

    fn ids(records: &[ShoppingList]) -> Vec<i64> {
        records.iter().map(|record| record.id).collect()
    }

    #[test]
    fn next_id_is_one_for_empty_and_max_plus_one_otherwise() {
        assert_eq!(next_id::<ShoppingList>(&[]), 1);
        assert_eq!(next_id(&lists(&[2, 5, 7])), 8);
        assert_eq!(next_id(&lists(&[7, 2, 5])), 8);
    }

    #[test]
    fn next_id_at_i64_max_takes_lowest_unused_id() {
        assert_eq!(next_id(&lists(&[i64::MAX])), 1);
        assert_eq!(next_id(&lists(&[1, 2, i64::MAX, 4])), 3);
    }

    #[test]
    fn move_record_is_noop_at_boundaries() {
        let mut records = lists(&[1, 2, 3]);
        assert!(!move_record(&mut records, 0, MoveDirection::Up));
        assert!(!move_record(&mut records, 2, MoveDirection::Down));
        assert!(!move_record(&mut records, 9, MoveDirection::Up));
        assert_eq!(ids(&records), vec![1, 2, 3]);
    }

    #[test]
    fn move_record_swaps_with_neighbour() {
        let mut records = lists(&[1, 2, 3]);
        assert!(move_record(&mut records, 1, MoveDirection::Up));
        assert_eq!(ids(&records), vec![2, 1, 3]);
        assert!(move_record(&mut records, 1, MoveDirection::Down));
        assert_eq!(ids(&records), vec![2, 3, 1]);
    }

    #[test]
    fn rename_record_rejects_blank_and_trims() {
        let mut records = lists(&[1]);
        assert!(!rename_record(&mut records, 1, "   "));
        assert_eq!(records[0].name, "新しいリスト 1");
        assert!(rename_record(&mut records, 1, "  週末  "));
        assert_eq!(records[0].name, "週末");
        assert!(!rename_record(&mut records, 42, "x"));
    }

    #[test]
    fn remove_record_reports_presence() {
        let mut records = lists(&[1, 2]);
        assert!(remove_record(&mut records, 1));
        assert!(!remove_record(&mut records, 1));
        assert_eq!(ids(&records), vec![2]);
    }

    #[test]
    fn checked_count_counts_true_entries_only() {
        let state: CheckedState = [(1, true), (2, false), (3, true)].into_iter().collect();
        assert_eq!(state.checked_count(), 2);
    }

    #[test]
    fn toggle_treats_absent_as_unchecked() {
        let mut state = CheckedState::new();
        assert!(state.toggle(4));
        assert!(!state.toggle(4));
        assert_eq!(state.len(), 1);
        assert!(!state.is_checked(4));
    }

    #[test]
    fn checked_state_serializes_as_string_keyed_object() {
        let state: CheckedState = [(1, true), (2, false)].into_iter().collect();
        let json = serde_json::to_string(&state).expect("serialize");
        assert_eq!(json, r#"{"1":true,"2":false}"#);
    }

    #[test]
    fn normalize_name_trims() {
        assert_eq!(normalize_name(" 卵 ").as_deref(), Some("卵"));
        assert_eq!(normalize_name("\t\n"), None);
    }
}
