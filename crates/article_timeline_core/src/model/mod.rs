//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical input row (`ArticleRecord`) shared by every consumer.
//! - Normalize raw date cells into calendar dates.
//! - Define the derived per-record stacking position (`OrdinalAssignment`).
//!
//! # Invariants
//! - Records are immutable once loaded; derived state lives in separate types.
//! - A normalized date never carries a time-of-day component.

pub mod assignment;
pub mod date;
pub mod record;
