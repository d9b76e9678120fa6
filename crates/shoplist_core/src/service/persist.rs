//! JSON mirroring between in-memory collections and the key-value store.
//!
//! # Invariants
//! - Each save serializes one whole collection and writes it under one key.
//! - A value that fails to decode is reported, never partially applied.

use crate::repo::{KvStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while mirroring a collection to or from the store.
#[derive(Debug)]
pub enum PersistError {
    /// Store read failed.
    Read { key: String, source: StoreError },
    /// Stored value is not valid JSON for the expected shape.
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// Collection could not be serialized.
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// Store write failed.
    Write { key: String, source: StoreError },
    /// Store removal failed.
    Remove {
        keys: Vec<String>,
        source: StoreError,
    },
}

impl PersistError {
    /// Returns whether this error happened on the read path.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Decode { .. })
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { key, source } => write!(f, "failed to read `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Write { key, source } => write!(f, "failed to write `{key}`: {source}"),
            Self::Remove { keys, source } => {
                write!(f, "failed to remove `{}`: {source}", keys.join(","))
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Remove { source, .. } => Some(source),
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

/// Reads and decodes the value under `key`. `Ok(None)` when absent.
pub fn load_json<T: DeserializeOwned>(store: &impl KvStore, key: &str) -> PersistResult<Option<T>> {
    let raw = store.get_item(key).map_err(|source| PersistError::Read {
        key: key.to_string(),
        source,
    })?;
    match raw {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PersistError::Decode {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serializes `value` and overwrites the whole value under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &impl KvStore,
    key: &str,
    value: &T,
) -> PersistResult<()> {
    let text = serde_json::to_string(value).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })?;
    store
        .set_item(key, &text)
        .map_err(|source| PersistError::Write {
            key: key.to_string(),
            source,
        })
}

/// Removes every key in `keys` in one store call.
pub fn remove_keys(store: &impl KvStore, keys: &[String]) -> PersistResult<()> {
    store
        .multi_remove(keys)
        .map_err(|source| PersistError::Remove {
            keys: keys.to_vec(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{load_json, save_json, PersistError};
    use crate::model::shopping::{default_lists, ShoppingList};
    use crate::repo::memory_store::MemoryKvStore;
    use crate::repo::KvStore;

    #[test]
    fn save_then_load_returns_equal_collection() {
        let store = MemoryKvStore::new();
        let lists = default_lists();
        save_json(&store, "shopping_lists", &lists).expect("save");
        let loaded: Option<Vec<ShoppingList>> =
            load_json(&store, "shopping_lists").expect("load");
        assert_eq!(loaded, Some(lists));
    }

    #[test]
    fn saved_lists_use_id_name_shape() {
        let store = MemoryKvStore::new();
        save_json(&store, "k", &default_lists()[..1]).expect("save");
        let raw = store.get_item("k").expect("get").expect("value present");
        assert_eq!(raw, r#"[{"id":1,"name":"今日の買い物"}]"#);
    }

    #[test]
    fn malformed_json_is_a_decode_failure() {
        let store = MemoryKvStore::new();
        store.set_item("k", "{not json").expect("set");
        let err = load_json::<Vec<ShoppingList>>(&store, "k").expect_err("decode must fail");
        assert!(matches!(err, PersistError::Decode { .. }));
        assert!(err.is_read_failure());
    }
}
