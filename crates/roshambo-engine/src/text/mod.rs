//! Font loading and text measurement.
//!
//! Rasterization happens on the CPU overlay; see [`crate::canvas::Canvas::draw_text`].

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
