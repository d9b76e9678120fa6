//! Persistent key-value store contracts and implementations.
//!
//! # Responsibility
//! - Define the string-keyed store every state manager mirrors into.
//! - Isolate SQLite details from manager/business orchestration.
//! - Own the persisted key layout (`shopping_lists`, per-list derived keys).
//!
//! # Invariants
//! - Values are opaque text; the store never inspects their schema.
//! - `set_item` overwrites the whole value for a key.
//! - `multi_remove` is best effort and not transactional across keys.
//! - Failures are returned, never swallowed.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keys;
pub mod memory_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by a key-value store operation.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Key is empty after trimming.
    InvalidKey(String),
    /// Connection does not carry the key-value schema.
    NotReady(&'static str),
    /// Failure reported by a `KvStore` backend other than SQLite, such as a
    /// platform storage bridge, which can only describe its error as text.
    /// The bundled stores never return it.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid store key: `{key}`"),
            Self::NotReady(details) => write!(f, "store connection not ready: {details}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-keyed store.
pub trait KvStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes every key in `keys`. Absent keys are ignored.
    fn multi_remove(&self, keys: &[String]) -> StoreResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn multi_remove(&self, keys: &[String]) -> StoreResult<()> {
        (**self).multi_remove(keys)
    }
}

pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
