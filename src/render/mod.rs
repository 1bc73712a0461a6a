//! Rendering primitives, the drawing surface abstraction, and clipping helpers.
//!
//! Series and views draw exclusively through [`Surface`], an immediate-mode
//! stroking API with pixel readback. Two implementations ship with the crate:
//! [`RasterSurface`] rasterizes into an RGBA8 buffer and [`RecordingSurface`]
//! logs every call for assertions.

mod raster;
mod record;

pub use raster::RasterSurface;
pub use record::RecordingSurface;

use serde::{Deserialize, Serialize};

use crate::geom::{PixelRect, ScreenPoint, ScreenRect};

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Line stroke styling.
///
/// The width is expressed in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// A block of RGBA8 pixels read back from (or written to) a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBlock {
    /// Create a zeroed block.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an RGBA8 buffer, or `None` if its length does not match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Block width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Block height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let mut out = [0; 4];
        out.copy_from_slice(&self.data[offset..offset + 4]);
        Some(out)
    }

    /// Write one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        self.data[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Copy out the sub-block at `rect` (block-relative, clamped).
    pub fn crop(&self, rect: PixelRect) -> Self {
        let rect = rect.clamped(self.width, self.height);
        let mut out = Self::new(rect.width, rect.height);
        let row_bytes = rect.width as usize * 4;
        for row in 0..rect.height {
            let src = self.offset(rect.x, rect.y + row);
            let dst = row as usize * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Immediate-mode 2D stroking surface with pixel readback.
///
/// The path model matches an HTML-style canvas: `begin_path` discards the
/// current path, `move_to` starts a subpath, `line_to` extends it, `arc`
/// appends a closed circle, and `stroke` paints the whole path without
/// clearing it.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;
    /// Surface height in pixels.
    fn height(&self) -> u32;
    /// Discard the current path.
    fn begin_path(&mut self);
    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f32, y: f32);
    /// Extend the current subpath to `(x, y)`.
    fn line_to(&mut self, x: f32, y: f32);
    /// Append a full circle centered at `(x, y)`.
    fn arc(&mut self, x: f32, y: f32, radius: f32);
    /// Stroke the current path.
    fn stroke(&mut self, style: LineStyle);
    /// Fill a region with a solid color.
    fn clear_rect(&mut self, rect: PixelRect, color: Color);
    /// Read back the pixels under `rect`.
    fn get_pixels(&self, rect: PixelRect) -> PixelBlock;
    /// Write `block` with its top-left corner at `(x, y)`.
    fn put_pixels(&mut self, block: &PixelBlock, x: u32, y: u32);
}

/// One surface call, as logged by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// `begin_path`.
    BeginPath,
    /// `move_to`.
    MoveTo(ScreenPoint),
    /// `line_to`.
    LineTo(ScreenPoint),
    /// `arc`.
    Arc {
        /// Circle center.
        center: ScreenPoint,
        /// Circle radius.
        radius: f32,
    },
    /// `stroke`.
    Stroke(LineStyle),
    /// `clear_rect`.
    ClearRect {
        /// Cleared region.
        rect: PixelRect,
        /// Fill color.
        color: Color,
    },
    /// `put_pixels`.
    PutPixels {
        /// Region written.
        rect: PixelRect,
    },
}

/// Clip a segment to `rect` (Cohen-Sutherland).
pub(crate) fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
    let mut out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f32, 0.0_f32);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
        } else {
            end = new_point;
            out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);
        }
    }
}

fn region_code(
    point: ScreenPoint,
    rect: ScreenRect,
    left: u8,
    right: u8,
    top: u8,
    bottom: u8,
) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= left;
    } else if point.x > rect.max.x {
        code |= right;
    }
    if point.y < rect.min.y {
        code |= top;
    } else if point.y > rect.max.y {
        code |= bottom;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0))
    }

    #[test]
    fn clip_segment_inside() {
        let start = ScreenPoint::new(2.0, 2.0);
        let end = ScreenPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect()).expect("segment should clip");
        assert_eq!(clipped.0, start);
        assert_eq!(clipped.1, end);
    }

    #[test]
    fn clip_segment_crossing_edge() {
        let clipped = clip_segment(
            ScreenPoint::new(-5.0, 5.0),
            ScreenPoint::new(5.0, 5.0),
            rect(),
        )
        .expect("segment crosses the rect");
        assert_eq!(clipped.0, ScreenPoint::new(0.0, 5.0));
        assert_eq!(clipped.1, ScreenPoint::new(5.0, 5.0));
    }

    #[test]
    fn clip_segment_outside() {
        let clipped = clip_segment(
            ScreenPoint::new(12.0, 1.0),
            ScreenPoint::new(15.0, 9.0),
            rect(),
        );
        assert!(clipped.is_none());
    }

    #[test]
    fn crop_copies_sub_block() {
        let mut block = PixelBlock::new(4, 3);
        block.set_pixel(2, 1, [9, 8, 7, 6]);
        let cropped = block.crop(PixelRect::new(1, 1, 2, 2));
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.pixel(1, 0), Some([9, 8, 7, 6]));
        assert_eq!(cropped.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn color_quantizes_to_rgba8() {
        assert_eq!(Color::rgb8(128, 128, 128).to_rgba8(), [128, 128, 128, 255]);
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }
}
