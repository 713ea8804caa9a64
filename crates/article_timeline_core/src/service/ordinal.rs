//! Within-day ordinal assignment.
//!
//! # Responsibility
//! - Normalize record dates and stack same-day records deterministically.
//! - Report malformed dates with the offending record's identity.
//!
//! # Invariants
//! - Output is ordered by a stable sort on date; same-date records keep input
//!   order, so earlier input always gets the smaller ordinal.
//! - Ordinals per date are exactly `0..k` for `k` records on that date.
//! - Assignment is pure: no I/O, no clock, no logging.

use crate::model::assignment::OrdinalAssignment;
use crate::model::date::{normalize_date, DateParseError};
use crate::model::record::{ArticleRecord, RawDate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What to do with a record whose date cannot be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedDatePolicy {
    /// Fail the whole assignment on the first malformed date.
    #[default]
    Abort,
    /// Leave the record out and report it in `OrdinalPlan::skipped`.
    Skip,
}

/// A record's date cell could not be normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedDateError {
    /// Zero-based position of the record in the input sequence.
    pub position: usize,
    /// Record title, for human identification.
    pub title: String,
    /// Raw date cell as loaded.
    pub value: RawDate,
    /// Why normalization failed.
    pub reason: DateParseError,
}

impl Display for MalformedDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {} (`{}`) has malformed date `{}`: {}",
            self.position, self.title, self.value, self.reason
        )
    }
}

impl Error for MalformedDateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.reason)
    }
}

/// Result of one assignment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdinalPlan {
    /// Assignments in stable date order.
    pub assignments: Vec<OrdinalAssignment>,
    /// Records left out under `MalformedDatePolicy::Skip`, in input order.
    pub skipped: Vec<MalformedDateError>,
}

/// Assigns each record its stack position among same-day records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOrdinalAssigner {
    policy: MalformedDatePolicy,
}

impl RecordOrdinalAssigner {
    /// Creates an assigner that aborts on malformed dates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assigner with an explicit malformed-date policy.
    pub fn with_policy(policy: MalformedDatePolicy) -> Self {
        Self { policy }
    }

    /// Returns how malformed dates are handled.
    pub fn policy(&self) -> MalformedDatePolicy {
        self.policy
    }

    /// Normalizes dates, stable-sorts by date and numbers same-day records.
    ///
    /// # Errors
    /// - Returns the first `MalformedDateError` under `MalformedDatePolicy::Abort`.
    pub fn assign(&self, records: &[ArticleRecord]) -> Result<OrdinalPlan, MalformedDateError> {
        let mut dated: Vec<(NaiveDate, usize)> = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for (position, record) in records.iter().enumerate() {
            match normalize_date(&record.date) {
                Ok(date) => dated.push((date, position)),
                Err(reason) => {
                    let err = MalformedDateError {
                        position,
                        title: record.title.clone(),
                        value: record.date.clone(),
                        reason,
                    };
                    match self.policy {
                        MalformedDatePolicy::Abort => return Err(err),
                        MalformedDatePolicy::Skip => skipped.push(err),
                    }
                }
            }
        }

        // `sort_by_key` is stable: equal dates keep input order.
        dated.sort_by_key(|(date, _)| *date);

        let mut counters: HashMap<NaiveDate, u32> = HashMap::new();
        let assignments = dated
            .into_iter()
            .map(|(date, source_index)| {
                let counter = counters.entry(date).or_insert(0);
                let ordinal = *counter;
                *counter += 1;
                OrdinalAssignment {
                    date,
                    ordinal,
                    source_index,
                }
            })
            .collect();

        Ok(OrdinalPlan {
            assignments,
            skipped,
        })
    }
}

/// Assigns ordinals with the default abort-on-malformed-date policy.
pub fn assign(records: &[ArticleRecord]) -> Result<Vec<OrdinalAssignment>, MalformedDateError> {
    RecordOrdinalAssigner::new()
        .assign(records)
        .map(|plan| plan.assignments)
}

/// Maps assignments back to input positions.
///
/// Positions without an assignment (skipped records) are `None`.
pub fn ordinals_by_position(
    assignments: &[OrdinalAssignment],
    record_count: usize,
) -> Vec<Option<u32>> {
    let mut ordinals = vec![None; record_count];
    for assignment in assignments {
        if let Some(slot) = ordinals.get_mut(assignment.source_index) {
            *slot = Some(assignment.ordinal);
        }
    }
    ordinals
}

/// One assignment joined with the record it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedRecord<'a> {
    pub assignment: OrdinalAssignment,
    pub record: &'a ArticleRecord,
}

/// Joins assignments with their source records, keeping assignment order.
///
/// Assignments whose `source_index` is out of bounds for `records` are dropped.
pub fn stack_records<'a>(
    records: &'a [ArticleRecord],
    assignments: &[OrdinalAssignment],
) -> Vec<StackedRecord<'a>> {
    assignments
        .iter()
        .filter_map(|assignment| {
            records
                .get(assignment.source_index)
                .map(|record| StackedRecord {
                    assignment: *assignment,
                    record,
                })
        })
        .collect()
}
