use std::cell::RefCell;
use std::rc::Rc;

use roshambo_engine::render::{BackgroundRenderer, SharedBackground};
use roshambo_game::{BackgroundDesc, BackgroundSource, ScreenError};

use crate::assets::AssetStore;

/// Builds shader backgrounds on the window's device.
pub struct GpuBackgrounds {
    device: wgpu::Device,
    format: wgpu::TextureFormat,
    assets: Rc<AssetStore>,
}

impl GpuBackgrounds {
    pub fn new(device: wgpu::Device, format: wgpu::TextureFormat, assets: Rc<AssetStore>) -> Self {
        Self { device, format, assets }
    }
}

impl BackgroundSource for GpuBackgrounds {
    fn create(&mut self, desc: BackgroundDesc) -> Result<SharedBackground, ScreenError> {
        let sources = self.assets.shader_sources(&desc.name)?;
        let renderer = BackgroundRenderer::new(
            &self.device,
            self.format,
            desc.width,
            desc.height,
            &sources.vertex,
            &sources.fragment,
            desc.uniforms,
        )
        .inspect_err(|err| log::error!("background `{}`: {err}", desc.name))?;

        log::info!("background `{}` created at {}x{}", desc.name, desc.width, desc.height);
        Ok(Rc::new(RefCell::new(renderer)))
    }
}

#[cfg(test)]
mod tests {
    use roshambo_engine::render::{ShaderStage, UniformLayout, compile_stage, link};

    const VERTEX: &str = include_str!("../../../assets/shaders/main_menu_background.vert.wgsl");
    const FRAGMENT: &str = include_str!("../../../assets/shaders/main_menu_background.frag.wgsl");

    #[test]
    fn bundled_menu_background_compiles_and_links() {
        let vs = compile_stage(VERTEX, ShaderStage::Vertex).unwrap();
        let fs = compile_stage(FRAGMENT, ShaderStage::Fragment).unwrap();
        link(&vs, &fs).unwrap();

        let layout = UniformLayout::reflect(&[&vs, &fs]);
        let offset = |name: &str| layout.location(name).map(|l| l.offset);
        assert_eq!(offset("iTime"), Some(0));
        assert_eq!(offset("iResolution"), Some(8));
        assert_eq!(offset("colour_1"), Some(16));
        assert_eq!(offset("colour_2"), Some(32));
        assert_eq!(offset("colour_3"), Some(48));
    }
}
