/// Drawable size in physical pixels.
///
/// Renderers use it to clamp their own viewport rectangles to the render target.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clamps `(w, h)` so the rectangle anchored at the origin fits inside `self`.
    #[inline]
    pub fn clamp_size(self, w: u32, h: u32) -> (u32, u32) {
        (w.min(self.width), h.min(self.height))
    }
}
