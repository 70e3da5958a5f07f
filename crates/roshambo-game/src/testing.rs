//! Test doubles shared by the screen and manager tests.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use roshambo_engine::render::{Background, RenderCtx, RenderTarget, SharedBackground, UniformValue};

use crate::background::{BackgroundDesc, BackgroundSource};
use crate::manager::ScreenManager;
use crate::match_engine::MatchResult;
use crate::score::ScoreReporter;
use crate::screen::{ScreenError, ScreenFactory};
use crate::settings::GameSettings;

/// Background that only records what it was told.
#[derive(Default)]
pub struct StubBackground {
    pub size: (u32, u32),
    pub uniforms: Vec<(String, UniformValue)>,
}

impl Background for StubBackground {
    fn render(&mut self, _ctx: &RenderCtx<'_>, _target: &mut RenderTarget<'_>) {}

    fn update_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.push((name.to_owned(), value));
    }
}

/// Hands out stub backgrounds and keeps every one it created.
#[derive(Clone, Default)]
pub struct StubBackgrounds {
    pub created: Rc<RefCell<Vec<(BackgroundDesc, Rc<RefCell<StubBackground>>)>>>,
}

impl BackgroundSource for StubBackgrounds {
    fn create(&mut self, desc: BackgroundDesc) -> Result<SharedBackground, ScreenError> {
        let bg = Rc::new(RefCell::new(StubBackground {
            size: (desc.width, desc.height),
            uniforms: desc.uniforms.clone(),
        }));
        self.created.borrow_mut().push((desc, bg.clone()));
        Ok(bg)
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    pub results: Rc<RefCell<Vec<MatchResult>>>,
}

impl ScoreReporter for Recorder {
    fn record(&mut self, result: &MatchResult) {
        self.results.borrow_mut().push(*result);
    }
}

pub fn manager_with(
    initial: ScreenFactory,
    settings: GameSettings,
) -> (ScreenManager, StubBackgrounds, Recorder) {
    let backgrounds = StubBackgrounds::default();
    let recorder = Recorder::default();
    let manager = ScreenManager::new(
        initial,
        settings,
        Box::new(backgrounds.clone()),
        Box::new(recorder.clone()),
        StdRng::seed_from_u64(42),
        (640, 360),
    )
    .unwrap();
    (manager, backgrounds, recorder)
}
