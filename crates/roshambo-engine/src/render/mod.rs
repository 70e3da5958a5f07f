//! GPU rendering subsystem.
//!
//! Two renderers draw each frame, in order:
//! - [`BackgroundRenderer`]: one shader program over a full-window quad, fed
//!   per-frame uniforms through the [`UniformSink`] protocol.
//! - [`OverlayCompositor`]: uploads a CPU [`crate::canvas::Canvas`] and blends
//!   it over whatever is already in the target.

mod background;
mod ctx;
mod overlay;
mod reflect;
mod shader;
mod uniform;

pub use background::{Background, BackgroundRenderer, BackgroundUniforms, SharedBackground};
pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::OverlayCompositor;
pub use reflect::UniformLayout;
pub use shader::{ShaderError, ShaderProgram, ShaderStage, compile_stage, link};
pub use uniform::{UniformBlock, UniformError, UniformKind, UniformLocation, UniformSink, UniformValue, upload_uniform};
