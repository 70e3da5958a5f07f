/// Straight-alpha sRGB colour, one byte per channel.
///
/// Invariant: `r`, `g`, `b` are not multiplied by `a`. The overlay texture
/// is blended with `SrcAlpha, OneMinusSrcAlpha`, which expects exactly that.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the colour with its alpha scaled by `coverage` in `[0, 1]`.
    #[inline]
    pub fn with_coverage(self, coverage: f32) -> Self {
        let a = (self.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear-space clear colour for render passes.
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: srgb_to_linear(self.r) as f64,
            g: srgb_to_linear(self.g) as f64,
            b: srgb_to_linear(self.b) as f64,
            a: self.a as f64 / 255.0,
        }
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_scales_alpha_only() {
        let c = Color::rgba(10, 20, 30, 200).with_coverage(0.5);
        assert_eq!(c, Color::rgba(10, 20, 30, 100));
    }

    #[test]
    fn linear_endpoints() {
        let w = Color::WHITE.to_wgpu();
        let b = Color::BLACK.to_wgpu();
        assert!((w.r - 1.0).abs() < 1e-6 && b.r == 0.0);
        assert_eq!(w.a, 1.0);
    }
}
