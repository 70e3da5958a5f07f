//! CPU-side 2D overlay surface.

mod buffer;
mod image;

pub use buffer::Canvas;
pub use image::Image;
