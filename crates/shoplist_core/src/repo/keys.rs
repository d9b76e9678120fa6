//! Persisted key layout.
//!
//! - `shopping_lists` holds the ordered list sequence.
//! - `shopping_items_<listId>` holds one list's ordered item sequence.
//! - `checked_items_<listId>` holds one list's checked-state mapping.

use crate::model::shopping::ListId;

pub const LISTS_KEY: &str = "shopping_lists";

const ITEMS_KEY_PREFIX: &str = "shopping_items_";
const CHECKED_KEY_PREFIX: &str = "checked_items_";

/// Item sequence key for a normalized list id string.
pub fn items_key(list_id: &str) -> String {
    format!("{ITEMS_KEY_PREFIX}{list_id}")
}

/// Checked-state key for a normalized list id string.
pub fn checked_key(list_id: &str) -> String {
    format!("{CHECKED_KEY_PREFIX}{list_id}")
}

/// Both child keys owned by a list, in cleanup order.
pub fn derived_keys(list_id: ListId) -> [String; 2] {
    let id = list_id.to_string();
    [items_key(&id), checked_key(&id)]
}
