use roshambo_engine::render::{SharedBackground, UniformValue};

use crate::screen::ScreenError;

/// What a screen asks for when it wants a shader background.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundDesc {
    /// Shader asset name; resolved by the source.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub uniforms: Vec<(String, UniformValue)>,
}

/// Creates backgrounds. The client backs this with the GPU and asset store.
pub trait BackgroundSource {
    fn create(&mut self, desc: BackgroundDesc) -> Result<SharedBackground, ScreenError>;
}
