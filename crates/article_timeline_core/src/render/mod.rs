//! Chart and export rendering.
//!
//! # Responsibility
//! - Build immutable drawable primitives from ordinal assignments.
//! - Hand the complete primitive list to a template (or serializer) in one call.
//!
//! # Invariants
//! - Builders are pure and never touch the filesystem.
//! - Rendered documents are self-contained: inline SVG and CSS only.
//! - All record text reaching HTML is escaped by the template engine.

pub mod bar_chart;
pub mod json_export;
pub mod timeline;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RenderResult<T> = Result<T, RenderError>;

/// Failure while producing an in-memory document.
#[derive(Debug)]
pub enum RenderError {
    Template(askama::Error),
    Json(serde_json::Error),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(err) => write!(f, "template rendering failed: {err}"),
            Self::Json(err) => write!(f, "json serialization failed: {err}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<askama::Error> for RenderError {
    fn from(value: askama::Error) -> Self {
        Self::Template(value)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Rotated x-axis label anchored at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabel {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Picks every n-th column label so at most `max_labels` are drawn.
///
/// The first and last columns are always labelled.
pub(crate) fn label_stride_keeps(index: usize, count: usize, max_labels: usize) -> bool {
    if count == 0 {
        return false;
    }
    let stride = count.div_ceil(max_labels.max(1)).max(1);
    index == 0 || index + 1 == count || index % stride == 0
}

#[cfg(test)]
mod tests {
    use super::label_stride_keeps;

    #[test]
    fn stride_keeps_all_labels_when_few_columns() {
        assert!((0..5).all(|index| label_stride_keeps(index, 5, 40)));
    }

    #[test]
    fn stride_thins_labels_but_keeps_edges() {
        let kept: Vec<usize> = (0..100)
            .filter(|index| label_stride_keeps(*index, 100, 10))
            .collect();
        assert_eq!(kept.first(), Some(&0));
        assert_eq!(kept.last(), Some(&99));
        assert!(kept.len() <= 11);
    }
}
