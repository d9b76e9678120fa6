//! Flutter bridge for the shopping list core.

pub mod api;
