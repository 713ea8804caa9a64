//! Spreadsheet reader for `.ods` and Excel workbooks.

use super::table::{Cell, SourceTable};
use super::{SourceError, SourceResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first worksheet; its first row is the header.
pub(crate) fn read_spreadsheet_table(path: &Path) -> SourceResult<SourceTable> {
    let mut workbook = open_workbook_auto(path).map_err(|err| SourceError::unreadable(path, err))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::unreadable(path, "workbook has no worksheets"))?
        .map_err(|err| SourceError::unreadable(path, err))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(SourceTable { headers, rows })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Cell::from_text(value)
        }
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => Cell::Float(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::DateSerial(value.as_f64()),
        Data::Error(err) => Cell::Text(err.to_string()),
    }
}
