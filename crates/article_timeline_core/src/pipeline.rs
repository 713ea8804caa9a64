//! End-to-end runs: load → assign → render/export → write.
//!
//! # Responsibility
//! - Wire the I/O boundaries (`source`, `output`) around the pure core.
//! - Classify failures into source, malformed-date, render and write errors.
//!
//! # Invariants
//! - Every artifact is rendered fully in memory before any file is touched.
//! - A failed run leaves previously written targets unchanged.

use crate::config::PipelineConfig;
use crate::model::record::ArticleRecord;
use crate::output::{write_atomically, OutputWriteError};
use crate::render::bar_chart::{build_bar_chart, render_bar_chart_html};
use crate::render::json_export::{build_export_rows, export_json};
use crate::render::timeline::{build_timeline, render_timeline_html};
use crate::render::RenderError;
use crate::service::daily::daily_counts;
use crate::service::ordinal::{MalformedDateError, OrdinalPlan, RecordOrdinalAssigner};
use crate::source::{load_records, SourceError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Any failure that aborts a pipeline run.
#[derive(Debug)]
pub enum PipelineError {
    Source(SourceError),
    MalformedDate(MalformedDateError),
    Render(RenderError),
    OutputWrite(OutputWriteError),
}

impl PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source(_) => "source_failed",
            Self::MalformedDate(_) => "malformed_date",
            Self::Render(_) => "render_failed",
            Self::OutputWrite(_) => "output_write_failed",
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::MalformedDate(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
            Self::OutputWrite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::MalformedDate(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::OutputWrite(err) => Some(err),
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<MalformedDateError> for PipelineError {
    fn from(value: MalformedDateError) -> Self {
        Self::MalformedDate(value)
    }
}

impl From<RenderError> for PipelineError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

impl From<OutputWriteError> for PipelineError {
    fn from(value: OutputWriteError) -> Self {
        Self::OutputWrite(value)
    }
}

/// Output artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Timeline,
    Export,
    DailyCounts,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [Self::Timeline, Self::Export, Self::DailyCounts];

    /// Target path for this artifact in `config`.
    pub fn output_path(self, config: &PipelineConfig) -> &Path {
        match self {
            Self::Timeline => &config.timeline_output,
            Self::Export => &config.export_output,
            Self::DailyCounts => &config.daily_counts_output,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Export => "export",
            Self::DailyCounts => "daily_counts",
        }
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeline => write!(f, "Timeline chart"),
            Self::Export => write!(f, "Data"),
            Self::DailyCounts => write!(f, "Daily count chart"),
        }
    }
}

/// Outcome of one written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub artifact: Artifact,
    pub output: PathBuf,
    /// Records loaded from the source.
    pub records: usize,
    /// Records that received an ordinal.
    pub assigned: usize,
    /// Records skipped for malformed dates.
    pub skipped: usize,
}

/// Loaded records with their ordinal plan, shared by every renderer.
#[derive(Debug, Clone)]
pub struct PreparedRecords {
    pub records: Vec<ArticleRecord>,
    pub plan: OrdinalPlan,
}

/// Loads the configured source and assigns ordinals.
///
/// # Side effects
/// - Reads `config.input`.
/// - Logs one `date_normalize` warning per skipped record.
pub fn prepare(config: &PipelineConfig) -> Result<PreparedRecords, PipelineError> {
    let records = load_records(&config.input)?;
    let plan = RecordOrdinalAssigner::with_policy(config.malformed_dates).assign(&records)?;
    for skipped in &plan.skipped {
        warn!(
            "event=date_normalize module=pipeline status=skip position={} reason={}",
            skipped.position, skipped.reason
        );
    }
    Ok(PreparedRecords { records, plan })
}

/// Renders one artifact fully in memory.
pub fn render_artifact(
    artifact: Artifact,
    config: &PipelineConfig,
    prepared: &PreparedRecords,
) -> Result<Vec<u8>, RenderError> {
    let assignments = &prepared.plan.assignments;
    match artifact {
        Artifact::Timeline => {
            let chart = build_timeline(&prepared.records, assignments, &config.timeline);
            render_timeline_html(&chart).map(String::into_bytes)
        }
        Artifact::Export => {
            let rows = build_export_rows(&prepared.records, assignments);
            export_json(&rows, config.pretty_json)
        }
        Artifact::DailyCounts => {
            let chart = build_bar_chart(&daily_counts(assignments), &config.bar_chart);
            render_bar_chart_html(&chart).map(String::into_bytes)
        }
    }
}

/// Runs the given artifacts against one load of the source.
///
/// All artifacts are rendered before the first write, so a render failure
/// leaves every target untouched.
pub fn run(config: &PipelineConfig, artifacts: &[Artifact]) -> Result<Vec<RunSummary>, PipelineError> {
    let started_at = Instant::now();
    info!(
        "event=pipeline_run module=pipeline status=start artifacts={}",
        artifacts.len()
    );

    match run_inner(config, artifacts) {
        Ok(summaries) => {
            info!(
                "event=pipeline_run module=pipeline status=ok artifacts={} duration_ms={}",
                summaries.len(),
                started_at.elapsed().as_millis()
            );
            Ok(summaries)
        }
        Err(err) => {
            error!(
                "event=pipeline_run module=pipeline status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.error_code()
            );
            Err(err)
        }
    }
}

/// Writes the timeline chart.
pub fn run_timeline(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    run_single(config, Artifact::Timeline)
}

/// Writes the JSON export.
pub fn run_export(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    run_single(config, Artifact::Export)
}

/// Writes the daily bar chart.
pub fn run_daily_counts(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    run_single(config, Artifact::DailyCounts)
}

/// Writes all three artifacts from a single load.
pub fn run_all(config: &PipelineConfig) -> Result<Vec<RunSummary>, PipelineError> {
    run(config, &Artifact::ALL)
}

fn run_single(config: &PipelineConfig, artifact: Artifact) -> Result<RunSummary, PipelineError> {
    let mut summaries = run(config, &[artifact])?;
    Ok(summaries.remove(0))
}

fn run_inner(config: &PipelineConfig, artifacts: &[Artifact]) -> Result<Vec<RunSummary>, PipelineError> {
    let prepared = prepare(config)?;

    let mut rendered = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let bytes = render_artifact(*artifact, config, &prepared)?;
        rendered.push((*artifact, bytes));
    }

    let mut summaries = Vec::with_capacity(rendered.len());
    for (artifact, bytes) in rendered {
        let output = artifact.output_path(config);
        write_atomically(output, &bytes)?;
        info!(
            "event=artifact_write module=pipeline status=ok artifact={} records={} skipped={}",
            artifact.as_str(),
            prepared.plan.assignments.len(),
            prepared.plan.skipped.len()
        );
        summaries.push(RunSummary {
            artifact,
            output: output.to_path_buf(),
            records: prepared.records.len(),
            assigned: prepared.plan.assignments.len(),
            skipped: prepared.plan.skipped.len(),
        });
    }

    Ok(summaries)
}
