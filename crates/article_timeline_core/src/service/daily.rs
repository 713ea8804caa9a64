//! Per-day record counts for the daily bar chart.

use crate::model::assignment::OrdinalAssignment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of records published on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Counts assignments per distinct date, ascending by date.
///
/// Empty input yields no entries.
pub fn daily_counts(assignments: &[OrdinalAssignment]) -> Vec<DailyCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for assignment in assignments {
        *counts.entry(assignment.date).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}
