use std::rc::Rc;

use roshambo_engine::render::UniformValue;

use crate::hands::HandSprites;
use crate::match_engine::MatchTimings;

/// Game-level configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Layout reference size; UI scale is `height / base_height`.
    pub base_width: u32,
    pub base_height: u32,
    pub timings: MatchTimings,
    /// Applied over the main-menu background's generated uniforms.
    pub menu_uniforms: Vec<(String, UniformValue)>,
    /// Hand artwork shared by every match.
    pub hands: Rc<HandSprites>,
}

impl GameSettings {
    pub fn ui_scale(&self, height: u32) -> f32 {
        height as f32 / self.base_height.max(1) as f32
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            base_width: 640,
            base_height: 360,
            timings: MatchTimings::default(),
            menu_uniforms: Vec::new(),
            hands: Rc::default(),
        }
    }
}
