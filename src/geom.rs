//! Geometric primitives used by the rendering pipeline.
//!
//! Data-space coordinates are plain `(time, value)` pairs carried by
//! [`Sample`](crate::series::Sample). The types here live in screen space.

/// A point in screen space (pixel coordinates, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

/// An integer pixel rectangle, used for pixel block readback and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new pixel rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a full `width` x `height` surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clamp the rectangle to a `width` x `height` surface.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.x.saturating_add(self.width).min(width);
        let bottom = self.y.saturating_add(self.height).min(height);
        Self::new(x, y, right - x, bottom - y)
    }

    /// Columns `[center - half, center + half]` spanning the full height,
    /// clamped to the surface.
    pub fn column_strip(center: f32, half: f32, width: u32, height: u32) -> Self {
        let left = (center - half).floor().max(0.0) as u32;
        let right = ((center + half).ceil().max(0.0) as u32).saturating_add(1);
        Self::new(left, 0, right.saturating_sub(left), height).clamped(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_trims_overhang() {
        let rect = PixelRect::new(8, 2, 10, 10).clamped(12, 6);
        assert_eq!(rect, PixelRect::new(8, 2, 4, 4));
    }

    #[test]
    fn column_strip_stays_inside_surface() {
        let strip = PixelRect::column_strip(1.0, 4.0, 20, 10);
        assert_eq!(strip.x, 0);
        assert_eq!(strip.width, 6);
        assert_eq!(strip.height, 10);

        let edge = PixelRect::column_strip(19.0, 4.0, 20, 10);
        assert_eq!(edge.x + edge.width, 20);
    }
}
