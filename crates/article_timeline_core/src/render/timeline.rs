//! Timeline chart: one stacked mark per article.
//!
//! Columns are distinct publication dates in ascending order (a category
//! axis, so gaps between dates take no space). Within a column, marks stack
//! upward by ordinal.

use super::{label_stride_keeps, AxisLabel, RenderError, RenderResult};
use crate::model::assignment::OrdinalAssignment;
use crate::model::record::ArticleRecord;
use crate::service::ordinal::stack_records;
use askama::Template;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 110;
const ROW_GAP: u32 = 2;
const MIN_ROW_HEIGHT: u32 = 3;
const LABEL_OFFSET: u32 = 12;
const CLICKABLE_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Layout and text settings for the timeline document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineOptions {
    pub title: String,
    pub x_axis_title: String,
    /// Preferred plot width; grows when columns would get narrower than
    /// `min_column_pitch`.
    pub plot_width: u32,
    /// Preferred plot height; grows when rows would get shorter than 3px.
    pub plot_height: u32,
    pub min_column_pitch: u32,
    pub max_row_height: u32,
    /// Upper bound on drawn date labels; first and last are always drawn.
    pub max_labels: usize,
    /// Passthrough column whose text is shown on hover; `None` disables it.
    pub body_column: Option<String>,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            title: "Articles Published Over Time".to_string(),
            x_axis_title: "Publication Date".to_string(),
            plot_width: 1700,
            plot_height: 480,
            min_column_pitch: 12,
            max_row_height: 24,
            max_labels: 60,
            body_column: Some("article".to_string()),
        }
    }
}

/// One article mark, positioned in SVG user units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineMark {
    pub date: NaiveDate,
    pub ordinal: u32,
    pub title: String,
    pub link: String,
    /// Whether `link` is drawn as a hyperlink. Only `http`, `https` and
    /// `mailto` links are.
    pub clickable: bool,
    /// Article body from `TimelineOptions::body_column`, shown on hover.
    pub body: Option<String>,
    /// Long-form date shown on hover, e.g. `January 02, 2024`.
    pub date_label: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TimelineMark {
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Hover body text, empty when the record has none.
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Complete drawable timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineChart {
    pub title: String,
    pub x_axis_title: String,
    pub width: u32,
    pub height: u32,
    pub plot_left: u32,
    pub plot_right: u32,
    pub baseline_y: u32,
    pub marks: Vec<TimelineMark>,
    pub labels: Vec<AxisLabel>,
}

impl TimelineChart {
    /// Number of distinct date columns.
    pub fn column_count(&self) -> usize {
        self.marks
            .iter()
            .map(|mark| mark.date)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[derive(Template)]
#[template(path = "timeline.html")]
struct TimelineTemplate<'a> {
    chart: &'a TimelineChart,
}

/// Builds timeline primitives from records and their ordinal assignments.
pub fn build_timeline(
    records: &[ArticleRecord],
    assignments: &[OrdinalAssignment],
    options: &TimelineOptions,
) -> TimelineChart {
    let stacked = stack_records(records, assignments);

    let dates: BTreeSet<NaiveDate> = stacked.iter().map(|item| item.assignment.date).collect();
    let column_of: HashMap<NaiveDate, u32> = dates
        .iter()
        .enumerate()
        .map(|(index, date)| (*date, index as u32))
        .collect();
    let column_count = dates.len() as u32;
    let rows = stacked
        .iter()
        .map(|item| item.assignment.ordinal + 1)
        .max()
        .unwrap_or(1);

    let pitch = if column_count == 0 {
        options.plot_width
    } else {
        (options.plot_width / column_count).max(options.min_column_pitch.max(1))
    };
    let plot_width = if column_count == 0 {
        options.plot_width
    } else {
        pitch * column_count
    };
    let mark_width = (pitch * 9 / 10).max(1);
    let row_height = (options.plot_height / rows)
        .clamp(MIN_ROW_HEIGHT, options.max_row_height.max(MIN_ROW_HEIGHT));
    let plot_height = options.plot_height.max(row_height * rows);
    let baseline_y = MARGIN_TOP + plot_height;

    let marks = stacked
        .iter()
        .map(|item| {
            let column = column_of[&item.assignment.date];
            TimelineMark {
                date: item.assignment.date,
                ordinal: item.assignment.ordinal,
                title: item.record.title.clone(),
                link: item.record.link.clone(),
                clickable: is_clickable_link(&item.record.link),
                body: options
                    .body_column
                    .as_deref()
                    .and_then(|column| item.record.extra.get(column))
                    .and_then(hover_body),
                date_label: item.assignment.date.format("%B %d, %Y").to_string(),
                x: MARGIN_LEFT + column * pitch + (pitch - mark_width) / 2,
                y: baseline_y - (item.assignment.ordinal + 1) * row_height,
                width: mark_width,
                height: row_height.saturating_sub(ROW_GAP).max(1),
            }
        })
        .collect();

    let labels = dates
        .iter()
        .enumerate()
        .filter(|(index, _)| label_stride_keeps(*index, dates.len(), options.max_labels))
        .map(|(index, date)| AxisLabel {
            x: MARGIN_LEFT + index as u32 * pitch + pitch / 2,
            y: baseline_y + LABEL_OFFSET,
            text: date.format("%Y-%m-%d").to_string(),
        })
        .collect();

    TimelineChart {
        title: options.title.clone(),
        x_axis_title: options.x_axis_title.clone(),
        width: MARGIN_LEFT + plot_width + MARGIN_RIGHT,
        height: baseline_y + MARGIN_BOTTOM,
        plot_left: MARGIN_LEFT,
        plot_right: MARGIN_LEFT + plot_width,
        baseline_y,
        marks,
        labels,
    }
}

/// Renders the timeline as a self-contained HTML document.
pub fn render_timeline_html(chart: &TimelineChart) -> RenderResult<String> {
    TimelineTemplate { chart }.render().map_err(RenderError::from)
}

/// Accepts only link schemes that cannot run script in the document.
fn is_clickable_link(link: &str) -> bool {
    let link = link.trim().to_ascii_lowercase();
    CLICKABLE_SCHEMES
        .iter()
        .any(|scheme| link.len() > scheme.len() && link.starts_with(scheme))
}

fn hover_body(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_timeline, is_clickable_link, TimelineOptions};
    use crate::model::record::ArticleRecord;
    use crate::service::ordinal::assign;

    #[test]
    fn same_day_marks_share_a_column_and_stack_upward() {
        let records = vec![
            ArticleRecord::new("2024-01-02", "first", "https://a.example"),
            ArticleRecord::new("2024-01-01", "other", "https://b.example"),
            ArticleRecord::new("2024-01-02", "second", "https://c.example"),
        ];
        let assignments = assign(&records).unwrap();
        let chart = build_timeline(&records, &assignments, &TimelineOptions::default());

        assert_eq!(chart.marks.len(), 3);
        assert_eq!(chart.column_count(), 2);
        let first = chart.marks.iter().find(|m| m.title == "first").unwrap();
        let second = chart.marks.iter().find(|m| m.title == "second").unwrap();
        let other = chart.marks.iter().find(|m| m.title == "other").unwrap();
        assert_eq!(first.x, second.x);
        assert!(other.x < first.x);
        assert!(second.y < first.y);
        assert_eq!(first.date_label, "January 02, 2024");
        assert!(first.clickable);
    }

    #[test]
    fn only_web_and_mail_links_are_clickable() {
        assert!(is_clickable_link("https://example.com/a"));
        assert!(is_clickable_link(" HTTP://example.com "));
        assert!(is_clickable_link("mailto:desk@example.com"));
        assert!(!is_clickable_link("javascript:alert(1)"));
        assert!(!is_clickable_link(" JavaScript:alert(1)"));
        assert!(!is_clickable_link("data:text/html,<b>x</b>"));
        assert!(!is_clickable_link("https://"));
        assert!(!is_clickable_link(""));
    }

    #[test]
    fn body_column_feeds_hover_text() {
        let records = vec![
            ArticleRecord::new("2024-01-02", "with body", "").with_extra("article", "Body text"),
            ArticleRecord::new("2024-01-02", "blank body", "").with_extra("article", "  "),
            ArticleRecord::new("2024-01-02", "numeric", "").with_extra("article", 7),
        ];
        let assignments = assign(&records).unwrap();

        let chart = build_timeline(&records, &assignments, &TimelineOptions::default());
        let bodies: Vec<Option<&str>> = chart.marks.iter().map(|m| m.body.as_deref()).collect();
        assert_eq!(bodies, vec![Some("Body text"), None, Some("7")]);

        let options = TimelineOptions {
            body_column: None,
            ..TimelineOptions::default()
        };
        let chart = build_timeline(&records, &assignments, &options);
        assert!(chart.marks.iter().all(|mark| mark.body.is_none()));
    }

    #[test]
    fn many_columns_widen_the_plot_instead_of_collapsing_marks() {
        let records: Vec<ArticleRecord> = (1..=28)
            .map(|day| ArticleRecord::new(format!("2024-02-{day:02}"), "t", ""))
            .collect();
        let assignments = assign(&records).unwrap();
        let options = TimelineOptions {
            plot_width: 100,
            min_column_pitch: 10,
            ..TimelineOptions::default()
        };
        let chart = build_timeline(&records, &assignments, &options);

        assert_eq!(chart.plot_right - chart.plot_left, 280);
        assert!(chart.marks.iter().all(|mark| mark.width == 9));
    }

    #[test]
    fn empty_input_builds_an_empty_chart() {
        let chart = build_timeline(&[], &[], &TimelineOptions::default());
        assert!(chart.marks.is_empty());
        assert!(chart.labels.is_empty());
        assert_eq!(chart.column_count(), 0);
    }
}
