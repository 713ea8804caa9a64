//! Structured data export.
//!
//! # Invariants
//! - Object keys appear as `date`, `title`, `link`, `ordinal`, then
//!   passthrough fields in source column order.
//! - `date` is an ISO-8601 calendar date (`YYYY-MM-DD`).
//! - Rows follow assignment order (ascending date, stable).

use super::RenderResult;
use crate::model::assignment::OrdinalAssignment;
use crate::model::record::ArticleRecord;
use crate::service::ordinal::stack_records;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// One exported object, borrowing text from its source record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    pub date: NaiveDate,
    pub title: &'a str,
    pub link: &'a str,
    pub ordinal: u32,
    #[serde(flatten)]
    pub extra: &'a IndexMap<String, Value>,
}

/// Joins assignments with records into export rows.
pub fn build_export_rows<'a>(
    records: &'a [ArticleRecord],
    assignments: &[OrdinalAssignment],
) -> Vec<ExportRow<'a>> {
    stack_records(records, assignments)
        .into_iter()
        .map(|item| ExportRow {
            date: item.assignment.date,
            title: item.record.title.as_str(),
            link: item.record.link.as_str(),
            ordinal: item.assignment.ordinal,
            extra: &item.record.extra,
        })
        .collect()
}

/// Serializes rows as one JSON array.
pub fn export_json(rows: &[ExportRow<'_>], pretty: bool) -> RenderResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(rows)?
    } else {
        serde_json::to_vec(rows)?
    };
    Ok(bytes)
}
