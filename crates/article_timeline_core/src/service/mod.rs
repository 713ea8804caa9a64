//! Derivations over loaded records.
//!
//! # Responsibility
//! - Assign within-day ordinals (the stacking core).
//! - Aggregate per-day counts.
//!
//! # Invariants
//! - Services never touch the filesystem; loading and writing belong to
//!   `source` and `output`.

pub mod daily;
pub mod ordinal;
