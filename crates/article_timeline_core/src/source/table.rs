//! Format-independent table shape and record conversion.

use super::{SourceError, SourceResult};
use crate::model::date::serial_to_datetime;
use crate::model::record::{is_reserved_key, ArticleRecord, RawDate};
use serde_json::{Number, Value};

/// One decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet date-typed cell, as a serial day number.
    DateSerial(f64),
}

impl Cell {
    /// Builds a cell from text; blank text is `Empty`.
    pub fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn to_raw_date(&self) -> RawDate {
        match self {
            Self::Empty => RawDate::Missing,
            Self::Text(value) => RawDate::Text(value.trim().to_string()),
            Self::Int(value) => RawDate::Serial(*value as f64),
            Self::Float(value) | Self::DateSerial(value) => RawDate::Serial(*value),
            Self::Bool(value) => RawDate::Text(value.to_string()),
        }
    }

    fn to_display_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(value) => value.trim().to_string(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => format_float(*value),
            Self::Bool(value) => value.to_string(),
            Self::DateSerial(value) => format_serial(*value),
        }
    }

    fn to_json_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Text(value) => Value::String(value.clone()),
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Bool(value) => Value::Bool(*value),
            Self::DateSerial(value) => Value::String(format_serial(*value)),
        }
    }
}

/// Header row plus data rows, as read from any supported format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

struct ColumnMap {
    date: usize,
    title: usize,
    link: usize,
    passthrough: Vec<(usize, String)>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> SourceResult<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(column))
                .ok_or(SourceError::MissingColumn { column })
        };
        let date = find("date")?;
        let title = find("title")?;
        let link = find("link")?;

        // Unnamed columns carry no key to export under.
        let passthrough = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.trim().is_empty() && !is_reserved_key(header))
            .map(|(index, header)| (index, header.trim().to_string()))
            .collect();

        Ok(Self {
            date,
            title,
            link,
            passthrough,
        })
    }
}

/// Converts a decoded table into article records, one per non-empty row.
///
/// Dates are carried raw; the ordinal assigner normalizes and validates them.
///
/// # Errors
/// - `MissingColumn` when `date`, `title` or `link` is absent.
pub fn records_from_table(table: &SourceTable) -> SourceResult<Vec<ArticleRecord>> {
    let columns = ColumnMap::resolve(&table.headers)?;
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        let mut record = ArticleRecord::new(
            row.get(columns.date)
                .map_or(RawDate::Missing, Cell::to_raw_date),
            row.get(columns.title)
                .map(Cell::to_display_string)
                .unwrap_or_default(),
            row.get(columns.link)
                .map(Cell::to_display_string)
                .unwrap_or_default(),
        );
        for (index, name) in &columns.passthrough {
            let value = row.get(*index).map_or(Value::Null, Cell::to_json_value);
            record = record.with_extra(name.as_str(), value);
        }
        records.push(record);
    }

    Ok(records)
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_serial(serial: f64) -> String {
    serial_to_datetime(serial)
        .map(|value| value.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| format_float(serial))
}
