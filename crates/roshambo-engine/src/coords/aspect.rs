/// Aspect-ratio lock applied to window resizes.
///
/// The window may only take sizes on the line `w / h == aspect` inside
/// `[min, max]` on both axes. `constrain` maps an arbitrary request onto that
/// line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AspectLock {
    pub aspect: f32,
    pub min_w: u32,
    pub min_h: u32,
    pub max_w: u32,
    pub max_h: u32,
}

impl AspectLock {
    /// Lock to the aspect of `base_w × base_h`, using the base size as the minimum.
    pub fn from_base(base_w: u32, base_h: u32, max_w: u32, max_h: u32) -> Self {
        let base_h = base_h.max(1);
        Self {
            aspect: base_w as f32 / base_h as f32,
            min_w: base_w,
            min_h: base_h,
            max_w: max_w.max(base_w),
            max_h: max_h.max(base_h),
        }
    }

    /// Constrains a requested size to the lock.
    ///
    /// The requested size is clamped to the bounds. Height is then fitted to the
    /// width unless that overflows the requested height, in which case width is
    /// fitted to the height instead. A result that leaves the bounds is moved
    /// along the aspect line until it is back inside.
    ///
    /// When the bounds admit no aspect-correct size the maxima win.
    pub fn constrain(&self, w: u32, h: u32) -> (u32, u32) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 { self.aspect } else { 1.0 };

        let w = w.clamp(self.min_w, self.max_w.max(self.min_w));
        let h = h.clamp(self.min_h, self.max_h.max(self.min_h));

        let h_from_w = (w as f32 / aspect).round() as u32;
        let (mut w, mut h) = if h_from_w <= h {
            (w, h_from_w)
        } else {
            ((h as f32 * aspect).round() as u32, h)
        };

        // Smallest and largest widths whose aspect-correct height stays in bounds.
        let lo_w = self.min_w.max((self.min_h as f32 * aspect).ceil() as u32);
        let hi_w = self.max_w.min((self.max_h as f32 * aspect).floor() as u32);

        if w < lo_w {
            w = lo_w;
            h = (w as f32 / aspect).round() as u32;
        }
        if w > hi_w {
            w = hi_w;
            h = (w as f32 / aspect).round() as u32;
        }

        (w.max(1), h.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: f32 = 640.0 / 360.0;

    fn lock() -> AspectLock {
        AspectLock::from_base(640, 360, 3840, 2160)
    }

    fn assert_locked(l: &AspectLock, (w, h): (u32, u32)) {
        assert!(w >= l.min_w && w <= l.max_w, "width {w} out of bounds");
        assert!(h >= l.min_h && h <= l.max_h, "height {h} out of bounds");
        let ratio = w as f32 / h as f32;
        assert!((ratio - l.aspect).abs() <= 0.01, "{w}x{h} has ratio {ratio}");
    }

    // ── fitting ───────────────────────────────────────────────────────────

    #[test]
    fn exact_aspect_is_unchanged() {
        assert_eq!(lock().constrain(1280, 720), (1280, 720));
    }

    #[test]
    fn tall_request_fits_height_to_width() {
        assert_eq!(lock().constrain(1280, 1000), (1280, 720));
    }

    #[test]
    fn wide_request_fits_width_to_height() {
        assert_eq!(lock().constrain(2000, 720), (1280, 720));
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn tiny_request_is_raised_to_minimum() {
        assert_eq!(lock().constrain(10, 10), (640, 360));
    }

    #[test]
    fn huge_request_is_lowered_to_maximum() {
        assert_eq!(lock().constrain(10_000, 10_000), (3840, 2160));
    }

    #[test]
    fn inconsistent_minimum_still_keeps_aspect() {
        let l = AspectLock { aspect: 16.0 / 9.0, min_w: 200, min_h: 150, max_w: 3840, max_h: 2160 };
        let out = l.constrain(200, 150);
        assert_locked(&l, out);
    }

    #[test]
    fn sweep_always_respects_bounds_and_aspect() {
        let l = lock();
        for w in (0..5000).step_by(97) {
            for h in (0..3000).step_by(89) {
                assert_locked(&l, l.constrain(w, h));
            }
        }
        assert!((l.aspect - WIDE).abs() < f32::EPSILON);
    }
}
