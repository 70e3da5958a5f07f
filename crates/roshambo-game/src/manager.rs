use rand::rngs::StdRng;
use roshambo_engine::input::Key;

use crate::background::BackgroundSource;
use crate::draw::Frame;
use crate::score::ScoreReporter;
use crate::screen::{BuildCtx, Command, Screen, ScreenCtx, ScreenError, ScreenFactory};
use crate::settings::GameSettings;

/// Holds the single active screen and swaps it on request.
///
/// Screens never reach the manager directly: they queue commands on a
/// [`ScreenCtx`], applied in order once the callback returns.
pub struct ScreenManager {
    current: Box<dyn Screen>,
    settings: GameSettings,
    backgrounds: Box<dyn BackgroundSource>,
    reporter: Box<dyn ScoreReporter>,
    rng: StdRng,
    size: (u32, u32),
    quit: bool,
}

impl ScreenManager {
    pub fn new(
        initial: ScreenFactory,
        settings: GameSettings,
        mut backgrounds: Box<dyn BackgroundSource>,
        reporter: Box<dyn ScoreReporter>,
        mut rng: StdRng,
        size: (u32, u32),
    ) -> Result<Self, ScreenError> {
        let current = initial(&mut BuildCtx {
            settings: &settings,
            backgrounds: backgrounds.as_mut(),
            rng: &mut rng,
            size,
        })?;
        log::info!("starting on {:?}", current.kind());

        Ok(Self {
            current,
            settings,
            backgrounds,
            reporter,
            rng,
            size,
            quit: false,
        })
    }

    /// Builds the next screen and makes it active.
    ///
    /// On error the current screen stays active.
    pub fn change(&mut self, factory: &ScreenFactory) -> Result<(), ScreenError> {
        let next = factory(&mut BuildCtx {
            settings: &self.settings,
            backgrounds: self.backgrounds.as_mut(),
            rng: &mut self.rng,
            size: self.size,
        })?;
        log::info!("screen {:?} -> {:?}", self.current.kind(), next.kind());
        self.current = next;
        Ok(())
    }

    pub fn handle_input(&mut self, keys: &[Key]) -> Result<(), ScreenError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut ctx = ScreenCtx::default();
        self.current.handle_input(keys, &mut ctx);
        self.apply(ctx)
    }

    pub fn update(&mut self, dt: f32) -> Result<(), ScreenError> {
        let mut ctx = ScreenCtx::default();
        self.current.update(dt, &mut ctx);
        self.apply(ctx)
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        self.current.draw(frame);
    }

    pub fn update_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.current.update_size(width, height);
    }

    fn apply(&mut self, mut ctx: ScreenCtx) -> Result<(), ScreenError> {
        for cmd in ctx.drain() {
            match cmd {
                Command::Change(factory) => self.change(&factory)?,
                Command::Quit => {
                    log::info!("quit requested");
                    self.quit = true;
                }
                Command::Report(result) => self.reporter.record(&result),
            }
        }
        Ok(())
    }

    pub fn active(&self) -> &dyn Screen {
        self.current.as_ref()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use roshambo_engine::render::{ShaderError, ShaderStage};

    use super::*;
    use crate::screen::ScreenKind;
    use crate::testing::manager_with;

    /// Screen that counts drops and requests whatever it was told to.
    struct Probe {
        kind: ScreenKind,
        drops: Rc<Cell<u32>>,
        on_input: Option<ScreenFactory>,
        quit_on_update: bool,
        sizes: Rc<Cell<(u32, u32)>>,
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl Screen for Probe {
        fn kind(&self) -> ScreenKind {
            self.kind
        }

        fn handle_input(&mut self, _keys: &[Key], ctx: &mut ScreenCtx) {
            if let Some(f) = self.on_input.clone() {
                ctx.change(f);
            }
        }

        fn update(&mut self, _dt: f32, ctx: &mut ScreenCtx) {
            if self.quit_on_update {
                ctx.quit();
            }
        }

        fn draw(&mut self, _frame: &mut Frame<'_>) {}

        fn update_size(&mut self, width: u32, height: u32) {
            self.sizes.set((width, height));
        }
    }

    #[derive(Default, Clone)]
    struct Counters {
        drops: Rc<Cell<u32>>,
        sizes: Rc<Cell<(u32, u32)>>,
    }

    fn probe(kind: ScreenKind, c: &Counters, on_input: Option<ScreenFactory>, quit_on_update: bool) -> ScreenFactory {
        let c = c.clone();
        Rc::new(move |_: &mut BuildCtx<'_>| -> Result<Box<dyn Screen>, ScreenError> {
            Ok(Box::new(Probe {
                kind,
                drops: c.drops.clone(),
                on_input: on_input.clone(),
                quit_on_update,
                sizes: c.sizes.clone(),
            }))
        })
    }

    fn failing() -> ScreenFactory {
        Rc::new(|_: &mut BuildCtx<'_>| -> Result<Box<dyn Screen>, ScreenError> {
            Err(ScreenError::Shader(ShaderError::Compile {
                stage: ShaderStage::Fragment,
                log: "boom".into(),
            }))
        })
    }

    // ── transitions ───────────────────────────────────────────────────────

    #[test]
    fn change_drops_the_previous_screen() {
        let c = Counters::default();
        let (mut m, _, _) = manager_with(probe(ScreenKind::MainMenu, &c, None, false), GameSettings::default());

        m.change(&probe(ScreenKind::ModeSelect, &c, None, false)).unwrap();
        assert_eq!(m.active().kind(), ScreenKind::ModeSelect);
        assert_eq!(c.drops.get(), 1);
    }

    #[test]
    fn failed_change_keeps_the_current_screen() {
        let c = Counters::default();
        let (mut m, _, _) = manager_with(probe(ScreenKind::MainMenu, &c, None, false), GameSettings::default());

        let err = m.change(&failing()).unwrap_err();
        assert!(matches!(err, ScreenError::Shader(ShaderError::Compile { .. })));
        assert_eq!(m.active().kind(), ScreenKind::MainMenu);
        assert_eq!(c.drops.get(), 0);
    }

    #[test]
    fn queued_change_is_applied_after_input() {
        let c = Counters::default();
        let next = probe(ScreenKind::Match, &c, None, false);
        let (mut m, _, _) = manager_with(probe(ScreenKind::MainMenu, &c, Some(next), false), GameSettings::default());

        m.handle_input(&[Key::Enter]).unwrap();
        assert_eq!(m.active().kind(), ScreenKind::Match);
    }

    #[test]
    fn queued_failure_surfaces_from_input() {
        let c = Counters::default();
        let (mut m, _, _) = manager_with(probe(ScreenKind::MainMenu, &c, Some(failing()), false), GameSettings::default());

        assert!(m.handle_input(&[Key::Enter]).is_err());
        assert_eq!(m.active().kind(), ScreenKind::MainMenu);
    }

    // ── forwarding ────────────────────────────────────────────────────────

    #[test]
    fn quit_and_resize_are_forwarded() {
        let c = Counters::default();
        let (mut m, _, _) = manager_with(probe(ScreenKind::MainMenu, &c, None, true), GameSettings::default());

        assert!(!m.quit_requested());
        m.update(0.016).unwrap();
        assert!(m.quit_requested());

        m.update_size(1280, 720);
        assert_eq!(c.sizes.get(), (1280, 720));
        assert_eq!(m.size(), (1280, 720));
    }
}
