//! Screen-level state managers.
//!
//! # Responsibility
//! - Hold the in-memory lists/items/checked-state a screen renders.
//! - Mirror every committed mutation into the key-value store.
//! - Enforce the viewing/editing and normal/sort mode rules.
//!
//! # Invariants
//! - In-memory state is the source of truth for the session; store failures
//!   are logged and reported through `SyncOutcome`, never propagated.
//! - A save always writes the whole collection as it stands after the mutation.

pub mod command;
pub mod item_service;
pub mod list_service;
pub mod persist;
pub mod session;
