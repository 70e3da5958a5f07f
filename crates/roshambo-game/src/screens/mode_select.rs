use std::rc::Rc;

use roshambo_engine::input::Key;
use roshambo_engine::render::SharedBackground;

use crate::button::{Button, ButtonList};
use crate::draw::{Frame, TEXT, TITLE_SIZE};
use crate::keys::{MenuAction, menu_action};
use crate::screen::{BuildCtx, Screen, ScreenCtx, ScreenError, ScreenFactory, ScreenKind};
use crate::screens::match_screen;

/// Mode choice, drawn over the background it was handed.
pub fn factory(background: SharedBackground, back: Option<ScreenFactory>) -> ScreenFactory {
    Rc::new(move |_: &mut BuildCtx<'_>| -> Result<Box<dyn Screen>, ScreenError> {
        Ok(Box::new(ModeSelect::new(background.clone(), back.clone())))
    })
}

pub struct ModeSelect {
    background: SharedBackground,
    buttons: ButtonList,
}

impl ModeSelect {
    pub fn new(background: SharedBackground, back: Option<ScreenFactory>) -> Self {
        let buttons = ButtonList::new(vec![
            Button::new(
                "VS Computer",
                Some(match_screen::factory(true, background.clone(), back.clone())),
            ),
            Button::new(
                "VS Player",
                Some(match_screen::factory(false, background.clone(), back.clone())),
            ),
            Button::new("Back to Main Menu", back),
        ]);
        Self { background, buttons }
    }
}

impl Screen for ModeSelect {
    fn kind(&self) -> ScreenKind {
        ScreenKind::ModeSelect
    }

    fn handle_input(&mut self, keys: &[Key], ctx: &mut ScreenCtx) {
        for key in keys {
            if ctx.is_leaving() {
                break;
            }
            match menu_action(*key) {
                Some(MenuAction::Up) => self.buttons.prev(),
                Some(MenuAction::Down) => self.buttons.next(),
                Some(MenuAction::Confirm) => match self.buttons.selected().and_then(|b| b.target.clone()) {
                    Some(target) => ctx.change(target),
                    // Only reachable without a back target.
                    None => ctx.quit(),
                },
                None => {}
            }
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut ScreenCtx) {}

    fn draw(&mut self, frame: &mut Frame<'_>) {
        frame.set_background(&self.background);
        frame.text("Choose Game Mode", 50.0, 50.0, TITLE_SIZE, TEXT);
        frame.button_column(&self.buttons, 50.0, 150.0, 300.0);
    }

    fn update_size(&mut self, width: u32, height: u32) {
        self.background.borrow_mut().update_size(width, height);
    }

    fn background(&self) -> Option<&SharedBackground> {
        Some(&self.background)
    }
}
