use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the game layer.
pub trait App {
    /// Called after a resize, with the aspect-constrained size in physical
    /// pixels, before the next `on_frame`.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// The error that made the app return [`AppControl::Exit`], if any.
    ///
    /// Polled once after an exit; `Runtime::run` returns it.
    fn take_error(&mut self) -> Option<anyhow::Error> {
        None
    }
}
