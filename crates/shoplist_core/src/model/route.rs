//! Normalization of the list id handed over by the navigation layer.
//!
//! A route parameter may arrive missing, as one string, or as several values.
//! The normalized form is total: first value of a multi-valued parameter,
//! the single value as-is, and the empty string when the parameter is missing.
//! A multi-valued parameter with no values yields `undefined`, the id that
//! earlier releases of the app stored such a list's items under.

/// Normalized id of a multi-valued parameter that carries no values.
pub const EMPTY_MULTI_ID: &str = "undefined";

/// Raw list id as supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteParam {
    Missing,
    Single(String),
    Multi(Vec<String>),
}

impl RouteParam {
    /// Collapses the parameter to exactly one string.
    pub fn normalize(&self) -> String {
        match self {
            Self::Multi(values) => values
                .first()
                .cloned()
                .unwrap_or_else(|| EMPTY_MULTI_ID.to_string()),
            Self::Single(value) => value.clone(),
            Self::Missing => String::new(),
        }
    }
}

impl From<Option<String>> for RouteParam {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Missing, Self::Single)
    }
}

impl From<Vec<String>> for RouteParam {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<i64> for RouteParam {
    fn from(value: i64) -> Self {
        Self::Single(value.to_string())
    }
}
