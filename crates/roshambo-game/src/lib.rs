//! Roshambo game layer.
//!
//! Screens, the screen manager and the round state machine, on top of
//! `roshambo-engine`. Nothing here touches the GPU directly: backgrounds come
//! from a [`BackgroundSource`] and screens draw into a CPU [`draw::Frame`].
//!
//! ```rust,ignore
//! let mut manager = ScreenManager::new(
//!     screens::main_menu::factory(),
//!     settings,
//!     Box::new(backgrounds),
//!     Box::new(tally),
//!     StdRng::from_os_rng(),
//!     (640, 360),
//! )?;
//! manager.handle_input(&frame.key_presses)?;
//! manager.update(dt)?;
//! ```

pub mod background;
pub mod button;
pub mod draw;
pub mod gesture;
pub mod hands;
pub mod keys;
pub mod manager;
pub mod match_engine;
pub mod score;
pub mod screen;
pub mod screens;
pub mod settings;

#[cfg(test)]
mod testing;

pub use background::{BackgroundDesc, BackgroundSource};
pub use hands::HandSprites;
pub use manager::ScreenManager;
pub use match_engine::{MatchEngine, MatchResult};
pub use score::ScoreReporter;
pub use screen::{BuildCtx, Screen, ScreenCtx, ScreenError, ScreenFactory, ScreenKind};
pub use settings::GameSettings;
