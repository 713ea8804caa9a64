use article_timeline_core::{
    assign, load_records, records_from_table, Cell, RawDate, SourceError, SourceTable,
};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn csv_rows_become_records_with_ordered_passthrough_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("articles.csv");
    fs::write(
        &path,
        "id,Date,title,link,article\n\
         7,2024-01-02 09:00,First,https://example.com/1,Body one\n\
         8,2024-01-01,\"Second, with comma\",https://example.com/2,\n",
    )
    .unwrap();

    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, RawDate::Text("2024-01-02 09:00".to_string()));
    assert_eq!(records[1].title, "Second, with comma");

    let keys: Vec<&str> = records[0].extra.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "article"]);
    assert_eq!(records[0].extra["article"], Value::String("Body one".to_string()));
    assert_eq!(records[1].extra["article"], Value::Null);
}

#[test]
fn missing_source_file_is_reported_as_not_found() {
    let dir = tempdir().unwrap();
    let err = load_records(dir.path().join("absent.ods")).unwrap_err();
    assert!(matches!(err, SourceError::NotFound { .. }));
    assert!(err.to_string().contains("absent.ods"));
}

#[test]
fn directory_and_unknown_extension_are_rejected() {
    let dir = tempdir().unwrap();
    let err = load_records(dir.path()).unwrap_err();
    assert!(matches!(err, SourceError::Unreadable { .. }));

    let path = dir.path().join("articles.txt");
    fs::write(&path, "date,title,link\n").unwrap();
    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, SourceError::UnsupportedFormat { .. }));
}

#[test]
fn corrupt_spreadsheet_is_unreadable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.ods");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, SourceError::Unreadable { .. }));
}

#[test]
fn missing_required_column_is_named() {
    let table = SourceTable {
        headers: headers(&["date", "title"]),
        rows: vec![],
    };
    let err = records_from_table(&table).unwrap_err();
    assert!(matches!(err, SourceError::MissingColumn { column: "link" }));
}

#[test]
fn spreadsheet_cells_convert_to_raw_dates_and_text() {
    let table = SourceTable {
        headers: headers(&[" Title ", "LINK", "date", "", "ordinal", "views"]),
        rows: vec![
            vec![
                Cell::Text("Serial dated".to_string()),
                Cell::Text("https://example.com/a".to_string()),
                Cell::DateSerial(45_293.5),
                Cell::Text("unnamed".to_string()),
                Cell::Int(99),
                Cell::Float(12.0),
            ],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
            vec![Cell::Int(2024), Cell::Empty, Cell::Text(" 2024-01-03 ".to_string())],
        ],
    };

    let records = records_from_table(&table).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].date, RawDate::Serial(45_293.5));
    assert_eq!(records[0].title, "Serial dated");
    let keys: Vec<&str> = records[0].extra.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["views"]);
    assert_eq!(records[0].extra["views"], serde_json::json!(12.0));

    assert_eq!(records[1].title, "2024");
    assert_eq!(records[1].link, "");
    assert_eq!(records[1].date, RawDate::Text("2024-01-03".to_string()));
    assert_eq!(records[1].extra["views"], Value::Null);
}

#[test]
fn short_rows_get_missing_dates() {
    let table = SourceTable {
        headers: headers(&["title", "link", "date"]),
        rows: vec![vec![Cell::Text("No date".to_string())]],
    };
    let records = records_from_table(&table).unwrap();
    assert_eq!(records[0].date, RawDate::Missing);
}

#[test]
fn ods_first_sheet_loads_with_iso_dates_and_passthrough() {
    let records = load_records(fixture("articles.ods")).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, RawDate::Text("2024-01-02T09:30:00".to_string()));
    assert_eq!(records[0].title, "Second <day>");
    assert_eq!(records[0].link, "https://example.com/2");
    let keys: Vec<&str> = records[0].extra.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["article", "views"]);
    assert_eq!(records[0].extra["article"], Value::String("Body two".to_string()));
    assert_eq!(records[0].extra["views"].as_f64(), Some(12.0));

    assert_eq!(records[1].date, RawDate::Text("2024-01-01".to_string()));
    assert_eq!(records[1].title, "First day");
    assert_eq!(records[1].extra["views"].as_f64(), Some(3.5));

    let assignments = assign(&records).unwrap();
    let order: Vec<(NaiveDate, usize)> = assignments
        .iter()
        .map(|a| (a.date, a.source_index))
        .collect();
    assert_eq!(
        order,
        vec![
            (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1),
            (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 0),
        ]
    );
}

#[test]
fn xlsx_date_cells_become_serials() {
    let records = load_records(fixture("articles.xlsx")).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, RawDate::Serial(45_293.75));
    assert_eq!(records[0].title, "Serial dated");
    assert_eq!(records[0].link, "https://example.com/x");
    assert_eq!(records[0].extra["views"].as_f64(), Some(7.0));

    assert_eq!(records[1].date, RawDate::Text("2024-01-03".to_string()));
    assert_eq!(records[1].link, "");
    assert_eq!(records[1].extra["views"].as_f64(), Some(1.25));

    let dates: Vec<NaiveDate> = assign(&records).unwrap().iter().map(|a| a.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ]
    );
}
