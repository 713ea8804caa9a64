use article_timeline_core::{
    assign, daily_counts, ordinals_by_position, ArticleRecord, DateParseError,
    MalformedDatePolicy, RawDate, RecordOrdinalAssigner,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(date: &str, title: &str) -> ArticleRecord {
    ArticleRecord::new(date, title, format!("https://example.com/{title}"))
}

#[test]
fn worked_example_sorts_by_date_and_keeps_input_order_within_a_day() {
    let records = vec![
        record("2024-01-02", "a"),
        record("2024-01-01", "b"),
        record("2024-01-02", "c"),
    ];

    let assignments = assign(&records).unwrap();
    let triples: Vec<(NaiveDate, u32, usize)> = assignments
        .iter()
        .map(|a| (a.date, a.ordinal, a.source_index))
        .collect();
    assert_eq!(
        triples,
        vec![
            (ymd(2024, 1, 1), 0, 1),
            (ymd(2024, 1, 2), 0, 0),
            (ymd(2024, 1, 2), 1, 2),
        ]
    );
    assert_eq!(
        ordinals_by_position(&assignments, records.len()),
        vec![Some(0), Some(0), Some(1)]
    );
}

#[test]
fn empty_input_yields_empty_output_and_no_daily_bars() {
    let assignments = assign(&[]).unwrap();
    assert!(assignments.is_empty());
    assert!(daily_counts(&assignments).is_empty());
}

#[test]
fn single_record_on_a_date_gets_ordinal_zero() {
    let assignments = assign(&[record("2023-12-31T23:59:59", "only")]).unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].date, ymd(2023, 12, 31));
    assert_eq!(assignments[0].ordinal, 0);
}

#[test]
fn empty_title_and_link_pass_through_unvalidated() {
    let records = vec![ArticleRecord::new("2024-05-05", "", "")];
    let assignments = assign(&records).unwrap();
    assert_eq!(assignments.len(), 1);
}

#[test]
fn malformed_date_aborts_and_identifies_the_record() {
    let records = vec![
        record("2024-01-01", "fine"),
        record("not-a-date", "broken"),
        record("also bad", "later"),
    ];

    let err = assign(&records).unwrap_err();
    assert_eq!(err.position, 1);
    assert_eq!(err.title, "broken");
    assert_eq!(err.value, RawDate::Text("not-a-date".to_string()));
    assert_eq!(
        err.reason,
        DateParseError::UnrecognizedFormat("not-a-date".to_string())
    );
    assert!(err.to_string().contains("record 1"));
}

#[test]
fn skip_policy_keeps_good_rows_and_lists_every_bad_row() {
    let records = vec![
        record("bad-1", "x"),
        record("2024-01-01", "y"),
        ArticleRecord::new(RawDate::Missing, "z", ""),
    ];
    let assigner = RecordOrdinalAssigner::with_policy(MalformedDatePolicy::Skip);
    assert_eq!(assigner.policy(), MalformedDatePolicy::Skip);

    let plan = assigner.assign(&records).unwrap();
    assert_eq!(plan.assignments.len(), 1);
    assert_eq!(plan.assignments[0].source_index, 1);
    let positions: Vec<usize> = plan.skipped.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 2]);
}

#[test]
fn spreadsheet_serials_and_text_dates_share_a_day() {
    let records = vec![
        ArticleRecord::new(RawDate::Serial(45_293.25), "serial", ""),
        record("2024-01-02 20:00", "text"),
    ];
    let assignments = assign(&records).unwrap();
    assert_eq!(assignments[0].ordinal, 0);
    assert_eq!(assignments[1].ordinal, 1);
    assert_eq!(assignments[1].date, ymd(2024, 1, 2));
}

fn records_from_days(days: &[u32]) -> Vec<ArticleRecord> {
    days.iter()
        .enumerate()
        .map(|(index, day)| {
            ArticleRecord::new(format!("2024-03-{day:02}"), format!("r{index}"), "")
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_one_assignment_per_record(days in proptest::collection::vec(1u32..=28, 0..60)) {
        let records = records_from_days(&days);
        let assignments = assign(&records).unwrap();
        prop_assert_eq!(assignments.len(), records.len());

        let sources: BTreeSet<usize> = assignments.iter().map(|a| a.source_index).collect();
        prop_assert_eq!(sources.len(), records.len());
    }

    #[test]
    fn prop_ordinals_are_dense_per_date(days in proptest::collection::vec(1u32..=28, 0..60)) {
        let records = records_from_days(&days);
        let assignments = assign(&records).unwrap();

        let mut by_date: BTreeMap<NaiveDate, Vec<u32>> = BTreeMap::new();
        for a in &assignments {
            by_date.entry(a.date).or_default().push(a.ordinal);
        }
        for (date, mut ordinals) in by_date {
            let expected_len = days.iter().filter(|d| ymd(2024, 3, **d) == date).count();
            ordinals.sort_unstable();
            let expected: Vec<u32> = (0..expected_len as u32).collect();
            prop_assert_eq!(ordinals, expected);
        }
    }

    #[test]
    fn prop_same_day_input_order_is_preserved(days in proptest::collection::vec(1u32..=5, 0..40)) {
        let records = records_from_days(&days);
        let assignments = assign(&records).unwrap();
        let ordinals: Vec<u32> = ordinals_by_position(&assignments, records.len())
            .into_iter()
            .map(|ordinal| ordinal.unwrap())
            .collect();

        for i in 0..days.len() {
            for j in (i + 1)..days.len() {
                if days[i] == days[j] {
                    prop_assert!(ordinals[i] < ordinals[j]);
                }
            }
        }
    }

    #[test]
    fn prop_assignment_is_idempotent_and_sorted(days in proptest::collection::vec(1u32..=28, 0..60)) {
        let records = records_from_days(&days);
        let first = assign(&records).unwrap();
        let second = assign(&records).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }
}
