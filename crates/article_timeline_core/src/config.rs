//! Pipeline configuration.
//!
//! Defaults mirror the historical script layout: one `.ods` source under
//! `./data` and three outputs next to it.

use crate::render::bar_chart::BarChartOptions;
use crate::render::timeline::TimelineOptions;
use crate::service::ordinal::MalformedDatePolicy;
use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "./data/straipsniai_src.ods";
pub const DEFAULT_TIMELINE_OUTPUT: &str = "articles_horizontal_lines.html";
pub const DEFAULT_EXPORT_OUTPUT: &str = "./data/output_data.json";
pub const DEFAULT_DAILY_COUNTS_OUTPUT: &str = "id_count_per_day_chart.html";

/// Everything one pipeline run needs; no environment lookups happen later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub timeline_output: PathBuf,
    pub export_output: PathBuf,
    pub daily_counts_output: PathBuf,
    pub timeline: TimelineOptions,
    pub bar_chart: BarChartOptions,
    /// Indent the JSON export.
    pub pretty_json: bool,
    pub malformed_dates: MalformedDatePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            timeline_output: PathBuf::from(DEFAULT_TIMELINE_OUTPUT),
            export_output: PathBuf::from(DEFAULT_EXPORT_OUTPUT),
            daily_counts_output: PathBuf::from(DEFAULT_DAILY_COUNTS_OUTPUT),
            timeline: TimelineOptions::default(),
            bar_chart: BarChartOptions::default(),
            pretty_json: false,
            malformed_dates: MalformedDatePolicy::Abort,
        }
    }
}

impl PipelineConfig {
    /// Creates a default configuration reading from `input`.
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }
}
