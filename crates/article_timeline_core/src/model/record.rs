//! Article record model.
//!
//! # Responsibility
//! - Represent one row of the source table without interpreting it.
//! - Carry passthrough columns in source column order.
//!
//! # Invariants
//! - `date` keeps the raw cell; normalization happens at assignment time so a
//!   malformed value can be reported with the record's position.
//! - `extra` never contains the reserved keys `date`, `title`, `link`, `ordinal`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Output keys owned by the record itself; passthrough columns may not reuse them.
pub const RESERVED_KEYS: [&str; 4] = ["date", "title", "link", "ordinal"];

/// Raw date cell as read from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawDate {
    /// Textual date or date-time, e.g. `2024-01-02 10:30`.
    Text(String),
    /// Spreadsheet serial day number (days since 1899-12-30, fraction = time).
    Serial(f64),
    /// Empty cell or absent column value.
    Missing,
}

impl Display for RawDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Serial(value) => write!(f, "{value}"),
            Self::Missing => write!(f, "<empty>"),
        }
    }
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawDate {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawDate {
    fn from(value: f64) -> Self {
        Self::Serial(value)
    }
}

/// One article metadata row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Publication date cell, normalized later by the ordinal assigner.
    pub date: RawDate,
    /// Display title. Empty when the source cell is empty.
    pub title: String,
    /// Article URI. Empty when the source cell is empty.
    pub link: String,
    /// Uninterpreted passthrough columns, e.g. the article body text.
    #[serde(default)]
    pub extra: IndexMap<String, Value>,
}

impl ArticleRecord {
    /// Creates a record with no passthrough fields.
    pub fn new(date: impl Into<RawDate>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            link: link.into(),
            extra: IndexMap::new(),
        }
    }

    /// Adds one passthrough field, keeping insertion order.
    ///
    /// Reserved keys are ignored so exported objects never carry duplicate keys.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_key(&key) {
            self.extra.entry(key).or_insert_with(|| value.into());
        }
        self
    }
}

/// Returns whether `key` collides with a field owned by the record itself.
pub fn is_reserved_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    RESERVED_KEYS.contains(&normalized.as_str())
}
