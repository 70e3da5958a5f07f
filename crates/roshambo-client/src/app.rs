use std::rc::Rc;

use anyhow::anyhow;
use rand::SeedableRng;
use rand::rngs::StdRng;
use roshambo_engine::canvas::Canvas;
use roshambo_engine::core::{App, AppControl, FrameCtx};
use roshambo_engine::paint::Color;
use roshambo_engine::render::OverlayCompositor;
use roshambo_engine::text::{FontId, FontSystem};
use roshambo_game::draw::Frame;
use roshambo_game::screens::main_menu;
use roshambo_game::{GameSettings, ScreenManager};

use crate::assets::AssetStore;
use crate::backgrounds::GpuBackgrounds;
use crate::tally::SessionTally;

/// Glue between the engine runtime and the screen manager.
///
/// The manager needs the GPU device for its first background, so it is
/// created on the first frame rather than up front.
pub struct GameApp {
    settings: GameSettings,
    assets: Rc<AssetStore>,
    manager: Option<ScreenManager>,

    fonts: FontSystem,
    font: Option<FontId>,
    canvas: Canvas,
    compositor: OverlayCompositor,

    error: Option<anyhow::Error>,
}

impl GameApp {
    pub fn new(settings: GameSettings, assets: Rc<AssetStore>, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            settings,
            assets,
            manager: None,
            fonts,
            font,
            canvas: Canvas::new(1, 1),
            compositor: OverlayCompositor::new(),
            error: None,
        }
    }

    fn fail(&mut self, err: anyhow::Error) -> AppControl {
        log::error!("{err:#}");
        self.error = Some(err);
        AppControl::Exit
    }
}

impl App for GameApp {
    fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(manager) = self.manager.as_mut() {
            manager.update_size(width, height);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (width, height) = ctx.window.physical_size();

        if self.manager.is_none() {
            let backgrounds = GpuBackgrounds::new(
                ctx.gpu.device().clone(),
                ctx.gpu.surface_format(),
                self.assets.clone(),
            );
            match ScreenManager::new(
                main_menu::factory(),
                self.settings.clone(),
                Box::new(backgrounds),
                Box::new(SessionTally::default()),
                StdRng::from_os_rng(),
                (width, height),
            ) {
                Ok(manager) => self.manager = Some(manager),
                Err(err) => return self.fail(anyhow!(err).context("failed to build the main menu")),
            }
        }
        let Some(manager) = self.manager.as_mut() else {
            return AppControl::Exit;
        };

        // Round timers follow the wall clock, so stalls are not clamped away.
        let stepped = manager
            .handle_input(&ctx.input_frame.key_presses)
            .and_then(|()| manager.update(ctx.time.wall_dt.as_secs_f32()));
        if let Err(err) = stepped {
            return self.fail(anyhow!(err).context("screen change failed"));
        }
        if manager.quit_requested() {
            log::info!("quitting");
            return AppControl::Exit;
        }

        // Resizing also clears.
        self.canvas.resize(width, height);
        let scale = manager.settings().ui_scale(height);
        let mut frame = Frame::new(&mut self.canvas, &self.fonts, self.font, scale);
        manager.draw(&mut frame);
        let background = frame.take_background();

        let (canvas, compositor) = (&self.canvas, &mut self.compositor);
        ctx.render(Color::BLACK, |rctx, target| {
            if let Some(bg) = &background {
                bg.borrow_mut().render(rctx, target);
            }
            compositor.composite(rctx, target, canvas);
        })
    }

    fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}
