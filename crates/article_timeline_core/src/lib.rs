//! Core logic for article timeline charts.
//! This crate is the single source of truth for loading, stacking and
//! rendering article publication data.

pub mod config;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod service;
pub mod source;

pub use config::PipelineConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::assignment::OrdinalAssignment;
pub use model::date::{normalize_date, DateParseError};
pub use model::record::{ArticleRecord, RawDate};
pub use output::{write_atomically, OutputWriteError};
pub use pipeline::{
    run, run_all, run_daily_counts, run_export, run_timeline, Artifact, PipelineError,
    RunSummary,
};
pub use render::RenderError;
pub use service::daily::{daily_counts, DailyCount};
pub use service::ordinal::{
    assign, ordinals_by_position, MalformedDateError, MalformedDatePolicy, OrdinalPlan,
    RecordOrdinalAssigner,
};
pub use source::{load_records, records_from_table, Cell, SourceError, SourceTable};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
