//! GPU device and window surface.
//!
//! One [`Gpu`] per window: instance, adapter, device and queue, plus the
//! surface configuration that follows the window size.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
