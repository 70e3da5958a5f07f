use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use super::image::Image;
use crate::paint::Color;
use crate::text::{FontId, FontSystem};

/// Straight-alpha RGBA8 pixel buffer, row 0 at the top.
///
/// Every draw is clipped to the buffer and blended source-over.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocates to a new size if it differs; contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        } else {
            self.clear();
        }
    }

    /// Resets every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn blend(&mut self, x: u32, y: u32, src: Color) {
        if src.a == 0 {
            return;
        }
        let i = self.index(x, y);
        let dst = &mut self.pixels[i..i + 4];

        if src.a == 255 {
            dst.copy_from_slice(&src.to_array());
            return;
        }

        let sa = src.a as f32 / 255.0;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            dst.fill(0);
            return;
        }

        let s = src.to_array();
        for c in 0..3 {
            let sc = s[c] as f32 / 255.0;
            let dc = dst[c] as f32 / 255.0;
            let oc = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            dst[c] = (oc * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Clips `[x, x + w) × [y, y + h)` to the canvas.
    fn clip(&self, x: i64, y: i64, w: i64, h: i64) -> Option<(u32, u32, u32, u32)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i64);
        let y1 = (y + h).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x as i64, y as i64, w as i64, h as i64) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    /// Draws `image` scaled nearest-neighbour into `[x, x + w) × [y, y + h)`.
    pub fn draw_image(&mut self, image: &Image, x: i32, y: i32, w: u32, h: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(x as i64, y as i64, w as i64, h as i64) else {
            return;
        };
        for py in y0..y1 {
            let sy = ((py as i64 - y as i64) as u64 * image.height() as u64 / h as u64) as u32;
            for px in x0..x1 {
                let sx = ((px as i64 - x as i64) as u64 * image.width() as u64 / w as u64) as u32;
                if let Some(src) = image.pixel(sx, sy) {
                    self.blend(px, py, src);
                }
            }
        }
    }

    /// Draws one line of text with its layout box's top-left at `(x, y)`.
    ///
    /// An unknown font draws nothing.
    pub fn draw_text(&mut self, fonts: &FontSystem, font: FontId, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(f) = fonts.get(font) else {
            log::debug!("draw_text: unknown font {font:?}");
            return;
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x,
            y,
            ..LayoutSettings::default()
        });
        layout.append(&[f], &TextStyle::new(text, size, 0));

        for g in layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let (metrics, coverage) = f.rasterize_config(g.key);
            let gx = g.x.round() as i64;
            let gy = g.y.round() as i64;
            let Some((x0, y0, x1, y1)) = self.clip(gx, gy, metrics.width as i64, metrics.height as i64) else {
                continue;
            };
            for py in y0..y1 {
                for px in x0..x1 {
                    let cx = (px as i64 - gx) as usize;
                    let cy = (py as i64 - gy) as usize;
                    let a = coverage[cy * metrics.width + cx];
                    if a > 0 {
                        self.blend(px, py, color.with_coverage(a as f32 / 255.0));
                    }
                }
            }
        }
    }
}
