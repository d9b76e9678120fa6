//! Shopping list domain model.
//!
//! # Responsibility
//! - Define the persisted record shapes for lists, items and checked-state.
//! - Provide positional helpers shared by the list and item managers.
//!
//! # Invariants
//! - Ids are unique within their collection; new ids are `max + 1`.
//! - Order of a collection is significant and independent of ids.

pub mod route;
pub mod shopping;
