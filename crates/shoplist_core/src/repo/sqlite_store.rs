//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist opaque text values in `kv_entries`, one row per key.
//!
//! # Invariants
//! - `set_item` is an upsert; readers never observe a half-written value.
//! - `multi_remove` deletes keys one by one; an early failure leaves the
//!   remaining keys in place.

use super::{validate_key, KvStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, schema_version, KV_SCHEMA_VERSION};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Instant;

/// Key-value store owning one SQLite connection with the kv schema.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) the database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an existing connection after checking the schema is present.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_kv_table_ready(&conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let started_at = Instant::now();
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| {
                error!(
                    "event=kv_get module=store status=error key={} error={}",
                    key, err
                );
                StoreError::from(err)
            })?;
        debug!(
            "event=kv_get module=store status=ok key={} hit={} duration_ms={}",
            key,
            value.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let started_at = Instant::now();
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map_err(|err| {
                error!(
                    "event=kv_set module=store status=error key={} error={}",
                    key, err
                );
                StoreError::from(err)
            })?;
        debug!(
            "event=kv_set module=store status=ok key={} bytes={} duration_ms={}",
            key,
            value.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn multi_remove(&self, keys: &[String]) -> StoreResult<()> {
        for key in keys {
            validate_key(key)?;
        }
        for key in keys {
            self.conn
                .execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])
                .map_err(|err| {
                    error!(
                        "event=kv_remove module=store status=error key={} error={}",
                        key, err
                    );
                    StoreError::from(err)
                })?;
        }
        debug!(
            "event=kv_remove module=store status=ok count={}",
            keys.len()
        );
        Ok(())
    }
}

fn ensure_kv_table_ready(conn: &Connection) -> StoreResult<()> {
    if schema_version(conn)? != KV_SCHEMA_VERSION {
        return Err(StoreError::NotReady("kv schema has not been created"));
    }
    Ok(())
}
