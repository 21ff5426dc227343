//! Raster drawing primitives
//!
//! Coordinates passed in are logical; the canvas applies its scale.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use std::io::Cursor;

use super::composition::Rect;
use super::font::{missing_advance, FontSet};
use crate::error::RenderError;

/// Largest side, in physical pixels, of any exported image
pub const MAX_CANVAS_SIDE: u32 = 8192;

/// Smallest text size, in logical pixels, that text is shrunk to when it
/// does not fit its box
pub const MIN_TEXT_SIZE: f32 = 8.0;

pub struct Canvas {
    image: RgbaImage,
    scale: u32,
}

impl Canvas {
    /// Blank canvas of `width` x `height` logical pixels at `scale`
    pub fn new(width: u32, height: u32, scale: u32) -> Result<Self, RenderError> {
        let physical_width = width.saturating_mul(scale);
        let physical_height = height.saturating_mul(scale);
        if physical_width == 0
            || physical_height == 0
            || physical_width > MAX_CANVAS_SIDE
            || physical_height > MAX_CANVAS_SIDE
        {
            return Err(RenderError::CanvasTooLarge {
                width: physical_width,
                height: physical_height,
            });
        }

        Ok(Self {
            image: RgbaImage::new(physical_width, physical_height),
            scale,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// 135 degree linear gradient from the top-left to the bottom-right
    pub fn fill_gradient(&mut self, from: Rgba<u8>, to: Rgba<u8>) {
        let span = (self.image.width() + self.image.height()).saturating_sub(2).max(1) as f32;
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let t = (x + y) as f32 / span;
            *pixel = lerp(from, to, t);
        }
    }

    /// Alpha-blend `color` over `rect`
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let x0 = rect.x * self.scale;
        let y0 = rect.y * self.scale;
        let x1 = (rect.right() * self.scale).min(self.image.width());
        let y1 = (rect.bottom() * self.scale).min(self.image.height());

        for y in y0..y1 {
            for x in x0..x1 {
                self.image.get_pixel_mut(x, y).blend(&color);
            }
        }
    }

    /// Draw `text` starting at logical `x` with its baseline at logical
    /// `baseline`, `size` logical pixels high. Characters no font has are
    /// skipped.
    pub fn draw_text(
        &mut self,
        fonts: &FontSet,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        color: Rgba<u8>,
    ) {
        let scale = self.scale as f32;
        let px = size * scale;
        let baseline = (baseline * scale).round() as i64;
        let mut pen = x * scale;

        for c in text.chars() {
            let Some((metrics, coverage)) = fonts.rasterize(c, px) else {
                pen += missing_advance(px);
                continue;
            };

            let left = pen.round() as i64 + metrics.xmin as i64;
            let top = baseline - metrics.ymin as i64 - metrics.height as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let (px_x, px_y) = (left + col as i64, top + row as i64);
                    if px_x < 0
                        || px_y < 0
                        || px_x >= self.image.width() as i64
                        || px_y >= self.image.height() as i64
                    {
                        continue;
                    }
                    let mut ink = color;
                    ink[3] = ((color[3] as u32 * alpha as u32) / 255) as u8;
                    self.image.get_pixel_mut(px_x as u32, px_y as u32).blend(&ink);
                }
            }
            pen += metrics.advance_width;
        }
    }

    /// Draw `text` centered in `rect`, shrinking it down to
    /// [`MIN_TEXT_SIZE`] when it is wider than the box
    pub fn draw_text_centered(
        &mut self,
        fonts: &FontSet,
        text: &str,
        rect: Rect,
        size: f32,
        color: Rgba<u8>,
    ) {
        let available = rect.width as f32;
        let mut size = size;
        let mut width = fonts.text_width(text, size);
        if width > available && width > 0.0 {
            size = (size * available / width).max(MIN_TEXT_SIZE);
            width = fonts.text_width(text, size);
        }

        let (ascent, descent) = fonts.line_metrics(size);
        let x = rect.x as f32 + (available - width).max(0.0) / 2.0;
        let baseline = rect.y as f32 + rect.height as f32 / 2.0 + (ascent + descent) / 2.0;
        self.draw_text(fonts, text, x, baseline, size, color);
    }

    /// Scale `sprite` to fit inside `rect`, keeping its aspect ratio, and
    /// draw it centered
    pub fn draw_sprite(&mut self, sprite: &DynamicImage, rect: Rect) {
        let box_width = rect.width * self.scale;
        let box_height = rect.height * self.scale;
        let fitted = sprite.resize(box_width, box_height, FilterType::Triangle).to_rgba8();

        let x = rect.x * self.scale + (box_width - fitted.width().min(box_width)) / 2;
        let y = rect.y * self.scale + (box_height - fitted.height().min(box_height)) / 2;
        imageops::overlay(&mut self.image, &fitted, x as i64, y as i64);
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn lerp(from: Rgba<u8>, to: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgba([
        mix(from[0], to[0]),
        mix(from[1], to[1]),
        mix(from[2], to[2]),
        mix(from[3], to[3]),
    ])
}
