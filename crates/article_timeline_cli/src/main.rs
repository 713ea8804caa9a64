//! `article-timeline` command line entry point.
//!
//! # Responsibility
//! - Map flags onto a `PipelineConfig` and run the requested artifacts.
//! - Report `<artifact> saved to <path>` on success, the error on failure.

use article_timeline_core::config::{
    DEFAULT_DAILY_COUNTS_OUTPUT, DEFAULT_EXPORT_OUTPUT, DEFAULT_INPUT_PATH,
    DEFAULT_TIMELINE_OUTPUT,
};
use article_timeline_core::{
    default_log_level, init_logging, run, Artifact, MalformedDatePolicy, PipelineConfig,
    RunSummary,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

const STDERR_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "article-timeline")]
#[command(about = "Stacked publication timelines and exports from an article spreadsheet")]
#[command(version)]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write rolling log files here instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the stacked article timeline
    Timeline {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = DEFAULT_TIMELINE_OUTPUT)]
        output: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Write records with their ordinals as a JSON array
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = DEFAULT_EXPORT_OUTPUT)]
        output: PathBuf,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Render the per-day article count bar chart
    DailyCounts {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = DEFAULT_DAILY_COUNTS_OUTPUT)]
        output: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Produce all three artifacts from one load
    All {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = DEFAULT_TIMELINE_OUTPUT)]
        timeline_output: PathBuf,
        #[arg(long, default_value = DEFAULT_EXPORT_OUTPUT)]
        export_output: PathBuf,
        #[arg(long, default_value = DEFAULT_DAILY_COUNTS_OUTPUT)]
        daily_counts_output: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Spreadsheet (.ods/.xlsx/.xls/.xlsb) or .csv with date, title, link columns
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Drop records with unparseable dates instead of aborting
    #[arg(long)]
    skip_malformed_dates: bool,
}

impl SourceArgs {
    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::for_input(&self.input);
        if self.skip_malformed_dates {
            config.malformed_dates = MalformedDatePolicy::Skip;
        }
        config
    }
}

impl Command {
    fn plan(self) -> (PipelineConfig, Vec<Artifact>) {
        match self {
            Self::Timeline {
                source,
                output,
                title,
            } => {
                let mut config = source.config();
                config.timeline_output = output;
                if let Some(title) = title {
                    config.timeline.title = title;
                }
                (config, vec![Artifact::Timeline])
            }
            Self::Export {
                source,
                output,
                pretty,
            } => {
                let mut config = source.config();
                config.export_output = output;
                config.pretty_json = pretty;
                (config, vec![Artifact::Export])
            }
            Self::DailyCounts {
                source,
                output,
                title,
            } => {
                let mut config = source.config();
                config.daily_counts_output = output;
                if let Some(title) = title {
                    config.bar_chart.title = title;
                }
                (config, vec![Artifact::DailyCounts])
            }
            Self::All {
                source,
                timeline_output,
                export_output,
                daily_counts_output,
                pretty,
            } => {
                let mut config = source.config();
                config.timeline_output = timeline_output;
                config.export_output = export_output;
                config.daily_counts_output = daily_counts_output;
                config.pretty_json = pretty;
                (config, Artifact::ALL.to_vec())
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(cli.log_level.as_deref(), cli.log_dir.as_ref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let (config, artifacts) = cli.command.plan();
    match run(&config, &artifacts) {
        Ok(summaries) => {
            for summary in &summaries {
                println!("{}", saved_message(summary));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(level: Option<&str>, log_dir: Option<&PathBuf>) -> Result<(), String> {
    match log_dir {
        Some(dir) => {
            let absolute = std::path::absolute(dir)
                .map_err(|err| format!("invalid log directory `{}`: {err}", dir.display()))?;
            let dir_str = absolute
                .to_str()
                .ok_or_else(|| format!("log directory `{}` is not UTF-8", absolute.display()))?;
            init_logging(level.unwrap_or(default_log_level()), Some(dir_str))
        }
        None => init_logging(level.unwrap_or(STDERR_LOG_LEVEL), None),
    }
}

fn saved_message(summary: &RunSummary) -> String {
    format!("{} saved to {}", summary.artifact, summary.output.display())
}
