//! Screen contract and the context screens talk to the manager through.

use std::path::PathBuf;
use std::rc::Rc;

use rand::rngs::StdRng;
use roshambo_engine::input::Key;
use roshambo_engine::render::{ShaderError, SharedBackground};
use thiserror::Error;

use crate::background::BackgroundSource;
use crate::draw::Frame;
use crate::match_engine::{MatchEngine, MatchResult};
use crate::settings::GameSettings;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScreenKind {
    MainMenu,
    ModeSelect,
    Match,
}

/// Failure to build a screen.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("missing asset {}: {source}", path.display())]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One navigable unit of the UI.
pub trait Screen {
    fn kind(&self) -> ScreenKind;

    /// Consumes this tick's key presses in arrival order, stopping at the
    /// first one that leaves the screen.
    fn handle_input(&mut self, keys: &[Key], ctx: &mut ScreenCtx);

    /// `dt` is wall-clock seconds since the previous tick.
    fn update(&mut self, dt: f32, ctx: &mut ScreenCtx);

    fn draw(&mut self, frame: &mut Frame<'_>);

    fn update_size(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    fn background(&self) -> Option<&SharedBackground> {
        None
    }

    fn match_engine(&self) -> Option<&MatchEngine> {
        None
    }
}

/// Everything a factory may draw on while building a screen.
pub struct BuildCtx<'a> {
    pub settings: &'a GameSettings,
    pub backgrounds: &'a mut dyn BackgroundSource,
    pub rng: &'a mut StdRng,
    /// Current drawable size in physical pixels.
    pub size: (u32, u32),
}

/// Builds a screen on demand. Captures only what the new screen needs.
pub type ScreenFactory = Rc<dyn Fn(&mut BuildCtx<'_>) -> Result<Box<dyn Screen>, ScreenError>>;

pub(crate) enum Command {
    Change(ScreenFactory),
    Quit,
    Report(MatchResult),
}

/// Requests from a screen, applied by the manager after the callback returns.
#[derive(Default)]
pub struct ScreenCtx {
    commands: Vec<Command>,
}

impl ScreenCtx {
    /// Replaces the active screen with what `factory` builds.
    pub fn change(&mut self, factory: ScreenFactory) {
        self.commands.push(Command::Change(factory));
    }

    pub fn quit(&mut self) {
        self.commands.push(Command::Quit);
    }

    /// Hands a finished round to the score reporter.
    pub fn report(&mut self, result: MatchResult) {
        self.commands.push(Command::Report(result));
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True once a screen change or quit is queued. Later keys of the same
    /// tick are dropped rather than handled by the outgoing screen.
    pub fn is_leaving(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::Change(_) | Command::Quit))
    }
}
