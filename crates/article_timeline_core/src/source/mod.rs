//! Source table loading.
//!
//! # Responsibility
//! - Read the first worksheet of a spreadsheet, or a CSV file, into one
//!   in-memory `SourceTable`.
//! - Convert a table into `ArticleRecord`s without interpreting dates.
//!
//! # Invariants
//! - The input file handle is scoped to the load call and released on every
//!   exit path.
//! - Required columns are `date`, `title`, `link`; header matching trims
//!   whitespace and ignores case.
//! - Fully empty rows are ignored; every other row becomes one record.

mod csv_file;
mod spreadsheet;
mod table;

pub use table::{records_from_table, Cell, SourceTable};

use crate::model::record::ArticleRecord;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type SourceResult<T> = Result<T, SourceError>;

/// Input-side failure. All variants are fatal for a run.
#[derive(Debug)]
pub enum SourceError {
    /// The input path does not exist.
    NotFound { path: PathBuf },
    /// The input exists but cannot be opened or decoded.
    Unreadable { path: PathBuf, message: String },
    /// The file extension is not a supported table format.
    UnsupportedFormat { path: PathBuf },
    /// A required column is absent from the header row.
    MissingColumn { column: &'static str },
}

impl SourceError {
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::unreadable(path, err)
        }
    }

    pub(crate) fn unreadable(path: &Path, err: impl Display) -> Self {
        Self::Unreadable {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "source_not_found",
            Self::Unreadable { .. } => "source_unreadable",
            Self::UnsupportedFormat { .. } => "source_unsupported_format",
            Self::MissingColumn { .. } => "source_missing_column",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "source file not found: {}", path.display()),
            Self::Unreadable { path, message } => {
                write!(f, "cannot read source file {}: {message}", path.display())
            }
            Self::UnsupportedFormat { path } => write!(
                f,
                "unsupported source format for {}; expected .ods, .xlsx, .xlsm, .xls, .xlsb or .csv",
                path.display()
            ),
            Self::MissingColumn { column } => {
                write!(f, "source table has no `{column}` column")
            }
        }
    }
}

impl Error for SourceError {}

/// Supported table formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Csv,
}

impl SourceFormat {
    /// Detects the table format from the path extension (case-insensitive).
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ods" | "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam") => Ok(Self::Spreadsheet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Csv => "csv",
        }
    }
}

/// Reads the source file into an in-memory table.
///
/// # Errors
/// - `NotFound` when `path` does not exist.
/// - `Unreadable` when `path` is not a regular file or cannot be decoded.
/// - `UnsupportedFormat` for unknown extensions.
pub fn load_table(path: impl AsRef<Path>) -> SourceResult<SourceTable> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|err| SourceError::from_io(path, err))?;
    if !metadata.is_file() {
        return Err(SourceError::unreadable(path, "not a regular file"));
    }

    match SourceFormat::from_path(path)? {
        SourceFormat::Spreadsheet => spreadsheet::read_spreadsheet_table(path),
        SourceFormat::Csv => csv_file::read_csv_table(path),
    }
}

/// Loads article records from a spreadsheet or CSV file.
///
/// # Side effects
/// - Emits `source_load` logging events with row counts and duration.
pub fn load_records(path: impl AsRef<Path>) -> SourceResult<Vec<ArticleRecord>> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let format = SourceFormat::from_path(path)
        .map(SourceFormat::as_str)
        .unwrap_or("unknown");
    info!("event=source_load module=source status=start format={format}");

    let result = load_table(path).and_then(|table| records_from_table(&table));
    match &result {
        Ok(records) => info!(
            "event=source_load module=source status=ok format={} rows={} duration_ms={}",
            format,
            records.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=source_load module=source status=error format={} duration_ms={} error_code={}",
            format,
            started_at.elapsed().as_millis(),
            err.error_code()
        ),
    }
    result
}
