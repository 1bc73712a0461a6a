//! Call-recording surface for tests and debugging.

use crate::geom::{PixelRect, ScreenPoint};

use super::{Color, DrawCall, LineStyle, PixelBlock, Surface};

/// Surface that records every call instead of rasterizing.
///
/// Pixel readback returns zeroed blocks of the requested size.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Create a recording surface with the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Returns the recorded calls in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Clears all recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Path calls only (`MoveTo`, `LineTo`, `Arc`), in order.
    pub fn path_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|call| {
            matches!(
                call,
                DrawCall::MoveTo(_) | DrawCall::LineTo(_) | DrawCall::Arc { .. }
            )
        })
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::MoveTo(ScreenPoint::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::LineTo(ScreenPoint::new(x, y)));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32) {
        self.calls.push(DrawCall::Arc {
            center: ScreenPoint::new(x, y),
            radius,
        });
    }

    fn stroke(&mut self, style: LineStyle) {
        self.calls.push(DrawCall::Stroke(style));
    }

    fn clear_rect(&mut self, rect: PixelRect, color: Color) {
        self.calls.push(DrawCall::ClearRect { rect, color });
    }

    fn get_pixels(&self, rect: PixelRect) -> PixelBlock {
        let rect = rect.clamped(self.width, self.height);
        PixelBlock::new(rect.width, rect.height)
    }

    fn put_pixels(&mut self, block: &PixelBlock, x: u32, y: u32) {
        self.calls.push(DrawCall::PutPixels {
            rect: PixelRect::new(x, y, block.width(), block.height()),
        });
    }
}
