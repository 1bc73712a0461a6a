//! Per-series display style.

use serde::{Deserialize, Serialize};

use crate::render::{Color, LineStyle};

/// Stroke configuration for a series.
///
/// Every recognized field is listed here; unknown keys are rejected when the
/// style is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeriesStyle {
    /// Stroke color.
    pub stroke_color: Color,
    /// Stroke width in pixels.
    pub line_width: f32,
}

impl SeriesStyle {
    /// Create a style with the given color and the default width.
    pub fn with_color(stroke_color: Color) -> Self {
        Self {
            stroke_color,
            ..Self::default()
        }
    }

    /// Line style used when stroking at the configured width.
    pub fn line(&self) -> LineStyle {
        LineStyle {
            color: self.stroke_color,
            width: self.line_width,
        }
    }

    /// Line style scaled by `factor`, used for emphasis redraws.
    pub fn emphasized(&self, factor: f32) -> LineStyle {
        LineStyle {
            color: self.stroke_color,
            width: self.line_width * factor,
        }
    }
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            line_width: 1.0,
        }
    }
}
