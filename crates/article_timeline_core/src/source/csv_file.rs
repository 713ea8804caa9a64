//! CSV reader.

use super::table::{Cell, SourceTable};
use super::{SourceError, SourceResult};
use std::fs::File;
use std::path::Path;

/// Reads a CSV file with a header row. Rows may have ragged lengths.
pub(crate) fn read_csv_table(path: &Path) -> SourceResult<SourceTable> {
    let file = File::open(path).map_err(|err| SourceError::from_io(path, err))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| SourceError::unreadable(path, err))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| SourceError::unreadable(path, err))?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(SourceTable { headers, rows })
}
