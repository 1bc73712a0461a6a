//! Coordinate transforms between data and screen space.
//!
//! The time axis is shared by every group in a view, the value axis is local
//! to one group. A [`Transform`] binds one of each to the surface size.

use crate::geom::ScreenPoint;
use crate::range::Range;

/// Affine map from `(time, value)` into surface pixels.
///
/// Larger values map to smaller pixel rows, so "up" on screen means a larger
/// value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    time: Range,
    value: Range,
    width: f64,
    height: f64,
    time_scale: f64,
    value_scale: f64,
}

impl Transform {
    /// Create a transform for the given extents and surface size.
    ///
    /// Returns `None` when either extent has zero (or non-finite) span or the
    /// surface has no area. Callers treat that as "nothing drawable".
    pub fn new(time: Range, value: Range, width: u32, height: u32) -> Option<Self> {
        if !time.is_valid() || !value.is_valid() || width == 0 || height == 0 {
            return None;
        }
        let width = f64::from(width);
        let height = f64::from(height);
        Some(Self {
            time,
            value,
            width,
            height,
            time_scale: width / (time.max - time.min),
            value_scale: height / (value.min - value.max),
        })
    }

    /// Access the time extent.
    pub fn time_range(&self) -> Range {
        self.time
    }

    /// Access the value extent.
    pub fn value_range(&self) -> Range {
        self.value
    }

    /// Surface size as `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Map a timestamp to a pixel column.
    pub fn time_to_x(&self, time: f64) -> f64 {
        (time - self.time.min) * self.time_scale
    }

    /// Map a value to a pixel row.
    pub fn value_to_y(&self, value: f64) -> f64 {
        (value - self.value.max) * self.value_scale
    }

    /// Map a pixel column back to a timestamp.
    pub fn x_to_time(&self, x: f64) -> f64 {
        x / self.time_scale + self.time.min
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, time: f64, value: f64) -> ScreenPoint {
        ScreenPoint::new(self.time_to_x(time) as f32, self.value_to_y(value) as f32)
    }

    /// Half-open time window `[x - half_px, x + half_px)` around a pixel column.
    pub fn time_window(&self, x: f64, half_px: f64) -> (f64, f64) {
        (self.x_to_time(x - half_px), self.x_to_time(x + half_px))
    }
}
