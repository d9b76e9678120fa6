//! Connection bootstrap for the key-value database.
//!
//! # Invariants
//! - Returned connections carry the `kv_entries` table at `KV_SCHEMA_VERSION`.
//! - A busy timeout is set so the home and detail screens can share one file.

use super::{DbError, DbResult, KV_SCHEMA_VERSION};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const KV_SCHEMA_SQL: &str = include_str!("kv_schema.sql");

/// Opens the database file, creating the key-value table on first use.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory database with the key-value table.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Reads `PRAGMA user_version`; `0` means the schema was never created.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    ensure_kv_schema(conn)
}

fn ensure_kv_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > KV_SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }
    if found == KV_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    tx.commit()?;
    info!(
        "event=kv_schema_create module=db status=ok from_version={} to_version={}",
        found, KV_SCHEMA_VERSION
    );
    Ok(())
}
