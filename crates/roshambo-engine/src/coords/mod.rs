//! Size and aspect helpers shared by the runtime and renderers.
//!
//! Sizes are physical pixels. Renderers receive the drawable size through
//! [`Viewport`]; window resizes pass through [`AspectLock`] first.

mod aspect;
mod viewport;

pub use aspect::AspectLock;
pub use viewport::Viewport;
