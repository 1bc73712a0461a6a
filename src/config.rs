//! View configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::{Color, LineStyle};

/// Configuration for a [`View`](crate::view::View).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Color used to clear the surface before a full render.
    pub background: Color,
    /// Pointer guide color.
    pub guide_color: Color,
    /// Pointer guide width in pixels.
    pub guide_width: f32,
    /// Radius of the per-series pointer markers.
    pub marker_radius: f32,
    /// Stroke width of the pointer markers.
    pub marker_width: f32,
    /// Half-width, in pixels, of the time window searched under the pointer.
    pub pointer_window_px: f32,
    /// Width multiplier for highlighted series.
    pub emphasis_width_factor: f32,
}

impl ViewConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Line style for the pointer guide.
    pub fn guide_style(&self) -> LineStyle {
        LineStyle {
            color: self.guide_color,
            width: self.guide_width,
        }
    }

    /// Horizontal reach of the pointer overlay around its column: the lookup
    /// window plus a marker and its stroke, plus one pixel of slack.
    pub fn overlay_half_width(&self) -> f32 {
        self.pointer_window_px
            + self.marker_radius
            + self.marker_width.max(self.guide_width)
            + 1.0
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            guide_color: Color::rgb8(128, 128, 128),
            guide_width: 1.0,
            marker_radius: 2.0,
            marker_width: 1.0,
            pointer_window_px: 1.0,
            emphasis_width_factor: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ViewConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ViewConfig::from_toml_str(
            r#"
            marker_radius = 4.0
            emphasis_width_factor = 3.0

            [guide_color]
            r = 1.0
            g = 0.0
            b = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.marker_radius, 4.0);
        assert_eq!(config.emphasis_width_factor, 3.0);
        assert_eq!(config.guide_color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(config.guide_width, 1.0);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = ViewConfig::from_toml_str("marker_radius = \"big\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid view config"));
    }

    #[test]
    fn overlay_reach_covers_markers() {
        let config = ViewConfig::default();
        assert_eq!(config.overlay_half_width(), 5.0);
    }
}
