use std::rc::Rc;

use rand::seq::IndexedRandom;
use roshambo_engine::input::Key;
use roshambo_engine::render::{SharedBackground, UniformValue};

use crate::background::BackgroundDesc;
use crate::button::{Button, ButtonList};
use crate::draw::{Frame, TEXT, TITLE_SIZE};
use crate::keys::{MenuAction, main_menu_action};
use crate::screen::{BuildCtx, Screen, ScreenCtx, ScreenError, ScreenFactory, ScreenKind};
use crate::screens::mode_select;

/// Shader asset the menus draw behind themselves.
pub const BACKGROUND: &str = "main_menu_background";

/// Saturated colours the background picks its three tints from.
pub const PALETTE: [[f32; 4]; 8] = [
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [0.5, 0.0, 0.5, 1.0], // purple
    [1.0, 0.5, 0.0, 1.0], // orange
    [0.6, 0.0, 1.0, 1.0], // violet
    [0.0, 1.0, 1.0, 1.0], // cyan
    [1.0, 1.0, 0.0, 1.0], // yellow
];

pub fn factory() -> ScreenFactory {
    Rc::new(|ctx: &mut BuildCtx<'_>| -> Result<Box<dyn Screen>, ScreenError> {
        Ok(Box::new(MainMenu::new(ctx)?))
    })
}

pub struct MainMenu {
    background: SharedBackground,
    buttons: ButtonList,
}

impl MainMenu {
    pub fn new(ctx: &mut BuildCtx<'_>) -> Result<Self, ScreenError> {
        let mut uniforms: Vec<(String, UniformValue)> = PALETTE
            .choose_multiple(&mut *ctx.rng, 3)
            .enumerate()
            .map(|(i, c)| (format!("colour_{}", i + 1), UniformValue::from(*c)))
            .collect();

        for (name, value) in &ctx.settings.menu_uniforms {
            match uniforms.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value.clone(),
                None => uniforms.push((name.clone(), value.clone())),
            }
        }

        let (width, height) = ctx.size;
        let background = ctx.backgrounds.create(BackgroundDesc {
            name: BACKGROUND.to_owned(),
            width,
            height,
            uniforms,
        })?;

        let buttons = ButtonList::new(vec![
            Button::new(
                "Start Game",
                Some(mode_select::factory(background.clone(), Some(factory()))),
            ),
            Button::new("Quit", None),
        ]);

        Ok(Self { background, buttons })
    }
}

impl Screen for MainMenu {
    fn kind(&self) -> ScreenKind {
        ScreenKind::MainMenu
    }

    fn handle_input(&mut self, keys: &[Key], ctx: &mut ScreenCtx) {
        for key in keys {
            if ctx.is_leaving() {
                break;
            }
            match main_menu_action(*key) {
                Some(MenuAction::Up) => self.buttons.prev(),
                Some(MenuAction::Down) => self.buttons.next(),
                Some(MenuAction::Confirm) => match self.buttons.selected().and_then(|b| b.target.clone()) {
                    Some(target) => ctx.change(target),
                    None => ctx.quit(),
                },
                None => {}
            }
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut ScreenCtx) {}

    fn draw(&mut self, frame: &mut Frame<'_>) {
        frame.set_background(&self.background);
        frame.text("Rock Paper Scissors", 50.0, 50.0, TITLE_SIZE, TEXT);
        frame.button_column(&self.buttons, 50.0, 150.0, 200.0);
    }

    fn update_size(&mut self, width: u32, height: u32) {
        self.background.borrow_mut().update_size(width, height);
    }

    fn background(&self) -> Option<&SharedBackground> {
        Some(&self.background)
    }
}
