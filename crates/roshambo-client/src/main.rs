use std::rc::Rc;

use anyhow::{Context, Result};
use roshambo_engine::device::GpuInit;
use roshambo_engine::logging::{LoggingConfig, init_logging};
use roshambo_engine::text::FontSystem;
use roshambo_engine::window::Runtime;

mod app;
mod assets;
mod backgrounds;
mod config;
mod tally;

use app::GameApp;
use assets::AssetStore;
use config::ClientConfig;

fn main() -> Result<()> {
    let loaded = ClientConfig::load();
    init_logging(LoggingConfig::with_filter(loaded.config.log_filter.clone()));

    match &loaded.path {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config.toml found, using defaults"),
    }
    for warning in &loaded.warnings {
        log::warn!("config: {warning}");
    }
    let config = loaded.config;

    let assets = Rc::new(AssetStore::new(config.assets_dir.clone(), config.font.clone()));
    log::info!("assets from {}", assets.root().display());

    let mut fonts = FontSystem::new();
    let (font_path, bytes) = assets.load_font().context("no usable font")?;
    let font = fonts
        .load_font(&bytes)
        .with_context(|| format!("failed to parse font {}", font_path.display()))?;

    let mut settings = config.game_settings();
    settings.hands = Rc::new(assets.load_hand_sprites());

    let app = GameApp::new(settings, assets, fonts, Some(font));
    Runtime::run(config.runtime_config(), GpuInit::default(), app)
}
