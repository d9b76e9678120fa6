//! Persistence and state-synchronization core for the shopping list app.
//!
//! The presentation layer drives a [`ListManager`] for the home screen and an
//! [`ItemManager`] per opened list; both mirror every mutation into a
//! [`KvStore`].

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::route::RouteParam;
pub use model::shopping::{
    CheckedState, ItemId, ListId, MoveDirection, ShoppingItem, ShoppingList,
};
pub use repo::memory_store::MemoryKvStore;
pub use repo::sqlite_store::SqliteKvStore;
pub use repo::{KvStore, StoreError, StoreResult};
pub use service::command::{ItemCommand, ListCommand, SyncOutcome};
pub use service::item_service::ItemManager;
pub use service::list_service::{ListManager, ListRoute};
pub use service::persist::{PersistError, PersistResult};
pub use service::session::{EditDraft, EditSession};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
