/// Device and surface preferences, fixed for the window's lifetime.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one is offered. The overlay is
    /// uploaded as sRGB bytes, so this keeps UI colours exact.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Used only when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    /// Raised to the adapter's texture resolution limits before use.
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    /// Vsync'd, sRGB, downlevel limits: one fullscreen shader and one texture
    /// upload per frame need nothing more.
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: None,
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
