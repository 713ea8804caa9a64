//! Derived stacking position for one record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Zero-based position of a record among records sharing its calendar date.
///
/// # Invariants
/// - `ordinal` values within one `date` are distinct and dense from 0.
/// - `source_index` points back into the record sequence the assignment was
///   derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrdinalAssignment {
    /// Normalized publication date.
    pub date: NaiveDate,
    /// Stack position within `date`.
    pub ordinal: u32,
    /// Input position of the source record.
    pub source_index: usize,
}
