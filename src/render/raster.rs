//! Software RGBA8 surface.

use crate::geom::{PixelRect, ScreenPoint, ScreenRect};

use super::{Color, LineStyle, PixelBlock, Surface, clip_segment};

const ARC_SEGMENTS: usize = 32;

/// CPU raster surface backed by an RGBA8 buffer.
///
/// Strokes are drawn with an opaque square pen and no antialiasing, so
/// stroking the same path twice yields the same pixels as stroking it once.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: PixelBlock,
    path: Vec<Vec<ScreenPoint>>,
}

impl RasterSurface {
    /// Create a surface filled with white.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color::WHITE)
    }

    /// Create a surface filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let mut surface = Self {
            pixels: PixelBlock::new(width, height),
            path: Vec::new(),
        };
        surface.clear_rect(PixelRect::full(width, height), background);
        surface
    }

    /// Access the full pixel buffer.
    pub fn pixels(&self) -> &PixelBlock {
        &self.pixels
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.pixel(x, y)
    }

    /// Encode the buffer as a binary PPM (P6) image, dropping alpha.
    pub fn to_ppm(&self) -> Vec<u8> {
        let (width, height) = (self.pixels.width(), self.pixels.height());
        let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
        out.reserve(width as usize * height as usize * 3);
        for rgba in self.pixels.data().chunks_exact(4) {
            out.extend_from_slice(&rgba[..3]);
        }
        out
    }

    fn bounds(&self, pad: f32) -> ScreenRect {
        ScreenRect::new(
            ScreenPoint::new(-pad, -pad),
            ScreenPoint::new(
                self.pixels.width() as f32 + pad,
                self.pixels.height() as f32 + pad,
            ),
        )
    }

    fn stroke_segment(&mut self, start: ScreenPoint, end: ScreenPoint, pen: i64, rgba: [u8; 4]) {
        let Some((start, end)) = clip_segment(start, end, self.bounds(pen as f32)) else {
            return;
        };
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp(
                ScreenPoint::new(start.x + dx * t, start.y + dy * t),
                pen,
                rgba,
            );
        }
    }

    fn stamp(&mut self, center: ScreenPoint, pen: i64, rgba: [u8; 4]) {
        let half = pen as f32 / 2.0;
        let x0 = (center.x - half + 0.5).floor() as i64;
        let y0 = (center.y - half + 0.5).floor() as i64;
        for y in y0..y0 + pen {
            for x in x0..x0 + pen {
                if x < 0 || y < 0 {
                    continue;
                }
                self.pixels.set_pixel(x as u32, y as u32, rgba);
            }
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(vec![ScreenPoint::new(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        match self.path.last_mut() {
            Some(subpath) => subpath.push(ScreenPoint::new(x, y)),
            None => self.path.push(vec![ScreenPoint::new(x, y)]),
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32) {
        let circle = (0..=ARC_SEGMENTS)
            .map(|k| {
                let theta = std::f32::consts::TAU * k as f32 / ARC_SEGMENTS as f32;
                ScreenPoint::new(x + radius * theta.cos(), y + radius * theta.sin())
            })
            .collect();
        self.path.push(circle);
    }

    fn stroke(&mut self, style: LineStyle) {
        let limit = i64::from(self.pixels.width().max(self.pixels.height())).max(1);
        let pen = (style.width.round() as i64).clamp(1, limit);
        let rgba = style.color.to_rgba8();
        let path = std::mem::take(&mut self.path);
        for subpath in &path {
            for pair in subpath.windows(2) {
                self.stroke_segment(pair[0], pair[1], pen, rgba);
            }
        }
        self.path = path;
    }

    fn clear_rect(&mut self, rect: PixelRect, color: Color) {
        let rect = rect.clamped(self.pixels.width(), self.pixels.height());
        let rgba = color.to_rgba8();
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.pixels.set_pixel(x, y, rgba);
            }
        }
    }

    fn get_pixels(&self, rect: PixelRect) -> PixelBlock {
        self.pixels.crop(rect)
    }

    fn put_pixels(&mut self, block: &PixelBlock, x: u32, y: u32) {
        for row in 0..block.height() {
            for col in 0..block.width() {
                if let Some(rgba) = block.pixel(col, row) {
                    self.pixels
                        .set_pixel(x.saturating_add(col), y.saturating_add(row), rgba);
                }
            }
        }
    }
}
