//! Daily bar chart: one bar per distinct date, height = record count.

use super::{label_stride_keeps, AxisLabel, RenderError, RenderResult};
use crate::service::daily::DailyCount;
use askama::Template;
use chrono::NaiveDate;

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 110;
const LABEL_OFFSET: u32 = 12;
const MAX_TICKS: usize = 10;

/// Layout and text settings for the daily bar chart document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChartOptions {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub plot_width: u32,
    pub plot_height: u32,
    pub min_bar_pitch: u32,
    pub max_labels: usize,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            title: "Count of IDs per Day".to_string(),
            x_axis_title: "Date".to_string(),
            y_axis_title: "Count of IDs".to_string(),
            plot_width: 1200,
            plot_height: 400,
            min_bar_pitch: 8,
            max_labels: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub date: NaiveDate,
    pub count: usize,
    /// ISO date shown on hover.
    pub label: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Horizontal grid line with its count label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YTick {
    pub y: u32,
    pub value: usize,
}

/// Complete drawable bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub width: u32,
    pub height: u32,
    pub plot_left: u32,
    pub plot_right: u32,
    pub baseline_y: u32,
    pub bars: Vec<Bar>,
    pub ticks: Vec<YTick>,
    pub labels: Vec<AxisLabel>,
}

#[derive(Template)]
#[template(path = "daily_counts.html")]
struct BarChartTemplate<'a> {
    chart: &'a BarChart,
}

/// Builds bar primitives from per-day counts, in the order given.
pub fn build_bar_chart(counts: &[DailyCount], options: &BarChartOptions) -> BarChart {
    let bar_count = counts.len() as u32;
    let max_count = counts.iter().map(|entry| entry.count).max().unwrap_or(0);
    let step = tick_step(max_count);
    let axis_max = max_count.div_ceil(step).max(1) * step;

    let pitch = if bar_count == 0 {
        options.plot_width
    } else {
        (options.plot_width / bar_count).max(options.min_bar_pitch.max(1))
    };
    let plot_width = if bar_count == 0 {
        options.plot_width
    } else {
        pitch * bar_count
    };
    let bar_width = (pitch * 8 / 10).max(1);
    let plot_height = options.plot_height.max(1);
    let baseline_y = MARGIN_TOP + plot_height;
    let scale = |value: usize| -> u32 {
        (value as u64 * u64::from(plot_height) / axis_max as u64) as u32
    };

    let bars = counts
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let height = scale(entry.count);
            Bar {
                date: entry.date,
                count: entry.count,
                label: entry.date.format("%Y-%m-%d").to_string(),
                x: MARGIN_LEFT + index as u32 * pitch + (pitch - bar_width) / 2,
                y: baseline_y - height,
                width: bar_width,
                height,
            }
        })
        .collect();

    let ticks = (0..=axis_max)
        .step_by(step)
        .map(|value| YTick {
            y: baseline_y - scale(value),
            value,
        })
        .collect();

    let labels = counts
        .iter()
        .enumerate()
        .filter(|(index, _)| label_stride_keeps(*index, counts.len(), options.max_labels))
        .map(|(index, entry)| AxisLabel {
            x: MARGIN_LEFT + index as u32 * pitch + pitch / 2,
            y: baseline_y + LABEL_OFFSET,
            text: entry.date.format("%Y-%m-%d").to_string(),
        })
        .collect();

    BarChart {
        title: options.title.clone(),
        x_axis_title: options.x_axis_title.clone(),
        y_axis_title: options.y_axis_title.clone(),
        width: MARGIN_LEFT + plot_width + MARGIN_RIGHT,
        height: baseline_y + MARGIN_BOTTOM,
        plot_left: MARGIN_LEFT,
        plot_right: MARGIN_LEFT + plot_width,
        baseline_y,
        bars,
        ticks,
        labels,
    }
}

/// Renders the bar chart as a self-contained HTML document.
pub fn render_bar_chart_html(chart: &BarChart) -> RenderResult<String> {
    BarChartTemplate { chart }.render().map_err(RenderError::from)
}

/// Tick spacing on a 1-2-5 ladder giving at most ten intervals.
fn tick_step(max_count: usize) -> usize {
    if max_count <= MAX_TICKS {
        return 1;
    }
    let raw = max_count.div_ceil(MAX_TICKS);
    let magnitude = 10usize.pow(raw.ilog10());
    [1, 2, 5, 10]
        .into_iter()
        .map(|multiplier| multiplier * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10 * magnitude)
}
