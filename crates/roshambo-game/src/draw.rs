//! Overlay drawing for screens.
//!
//! Screens lay out in base units (the configured base resolution); [`Frame`]
//! scales them to the canvas. The background a screen names is rendered
//! before the canvas is composited.

use roshambo_engine::canvas::{Canvas, Image};
use roshambo_engine::paint::Color;
use roshambo_engine::render::SharedBackground;
use roshambo_engine::text::{FontId, FontSystem};

use crate::button::ButtonList;

pub const TEXT: Color = Color::WHITE;
pub const SELECTED: Color = Color::rgb(255, 255, 0);
pub const UNSELECTED: Color = Color::rgb(200, 200, 200);
pub const PANEL: Color = Color::rgba(0, 0, 0, 150);

pub const TITLE_SIZE: f32 = 40.0;
pub const BUTTON_SIZE: f32 = 36.0;
pub const SELECTOR_SIZE: f32 = 25.0;

/// One frame's overlay plus the background request.
pub struct Frame<'a> {
    canvas: &'a mut Canvas,
    fonts: &'a FontSystem,
    font: Option<FontId>,
    scale: f32,
    background: Option<SharedBackground>,
}

impl<'a> Frame<'a> {
    /// Without a font, text calls are skipped.
    pub fn new(canvas: &'a mut Canvas, fonts: &'a FontSystem, font: Option<FontId>, scale: f32) -> Self {
        Self {
            canvas,
            fonts,
            font,
            scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 },
            background: None,
        }
    }

    /// Canvas width in base units.
    pub fn width(&self) -> f32 {
        self.canvas.width() as f32 / self.scale
    }

    /// Canvas height in base units.
    pub fn height(&self) -> f32 {
        self.canvas.height() as f32 / self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Names the background drawn under this frame.
    pub fn set_background(&mut self, background: &SharedBackground) {
        self.background = Some(background.clone());
    }

    pub fn take_background(&mut self) -> Option<SharedBackground> {
        self.background.take()
    }

    pub fn canvas(&self) -> &Canvas {
        &*self.canvas
    }

    pub fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let s = self.scale;
        self.canvas.fill_rect(
            (x * s).round() as i32,
            (y * s).round() as i32,
            (w * s).round().max(0.0) as u32,
            (h * s).round().max(0.0) as u32,
            color,
        );
    }

    /// Draws `image` fitted inside the box, keeping its aspect and centred.
    pub fn image(&mut self, image: &Image, x: f32, y: f32, w: f32, h: f32) {
        let fit = (w / image.width() as f32).min(h / image.height() as f32);
        let (iw, ih) = (image.width() as f32 * fit, image.height() as f32 * fit);
        let (ix, iy) = (x + (w - iw) / 2.0, y + (h - ih) / 2.0);
        let s = self.scale;
        self.canvas.draw_image(
            image,
            (ix * s).round() as i32,
            (iy * s).round() as i32,
            (iw * s).round().max(0.0) as u32,
            (ih * s).round().max(0.0) as u32,
        );
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(font) = self.font else { return };
        let s = self.scale;
        self.canvas.draw_text(self.fonts, font, text, x * s, y * s, size * s, color);
    }

    /// Text width in base units.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => self.fonts.measure_text(text, font, size * self.scale).0 / self.scale,
            None => 0.0,
        }
    }

    /// Panel-backed labels at 60-unit spacing from `(x, y)`, the selected one highlighted.
    pub fn button_column(&mut self, buttons: &ButtonList, x: f32, y: f32, width: f32) {
        let selected = buttons.selected_index();
        for (i, b) in buttons.iter().enumerate() {
            let top = y + i as f32 * 60.0;
            self.fill(x, top, width, 50.0, PANEL);
            let color = if i == selected { SELECTED } else { UNSELECTED };
            self.text(&b.label, x + 10.0, top + 10.0, BUTTON_SIZE, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Button;

    #[test]
    fn base_units_scale_to_canvas() {
        let mut canvas = Canvas::new(1280, 720);
        let fonts = FontSystem::new();
        let mut frame = Frame::new(&mut canvas, &fonts, None, 2.0);
        assert_eq!((frame.width(), frame.height()), (640.0, 360.0));

        frame.fill(10.0, 10.0, 5.0, 5.0, Color::WHITE);
        assert_eq!(frame.canvas().pixel(20, 20), Some(Color::WHITE));
        assert_eq!(frame.canvas().pixel(29, 29), Some(Color::WHITE));
        assert_eq!(frame.canvas().pixel(30, 30), Some(Color::TRANSPARENT));
    }

    #[test]
    fn image_keeps_aspect_inside_its_box() {
        let mut canvas = Canvas::new(100, 100);
        let fonts = FontSystem::new();
        let mut frame = Frame::new(&mut canvas, &fonts, None, 1.0);
        let wide = Image::from_rgba8(2, 1, vec![255; 8]).unwrap();
        frame.image(&wide, 0.0, 0.0, 40.0, 40.0);

        // 40x20, centred vertically in the 40x40 box.
        assert_eq!(frame.canvas().pixel(0, 9), Some(Color::TRANSPARENT));
        assert_eq!(frame.canvas().pixel(0, 10), Some(Color::WHITE));
        assert_eq!(frame.canvas().pixel(39, 29), Some(Color::WHITE));
        assert_eq!(frame.canvas().pixel(39, 30), Some(Color::TRANSPARENT));
    }

    #[test]
    fn button_column_draws_one_panel_per_button() {
        let mut canvas = Canvas::new(640, 360);
        let fonts = FontSystem::new();
        let mut frame = Frame::new(&mut canvas, &fonts, None, 1.0);
        let list = ButtonList::new(vec![Button::new("a", None), Button::new("b", None)]);
        frame.button_column(&list, 50.0, 150.0, 200.0);

        assert_eq!(frame.canvas().pixel(60, 160), Some(PANEL));
        assert_eq!(frame.canvas().pixel(60, 220), Some(PANEL));
        assert_eq!(frame.canvas().pixel(60, 205), Some(Color::TRANSPARENT));
    }
}
