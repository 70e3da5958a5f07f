//! Per-screen key bindings.

use roshambo_engine::input::Key;

use crate::match_engine::MatchInput;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MenuAction {
    Up,
    Down,
    Confirm,
}

/// Main menu: arrows and Enter only.
pub fn main_menu_action(key: Key) -> Option<MenuAction> {
    match key {
        Key::ArrowUp => Some(MenuAction::Up),
        Key::ArrowDown => Some(MenuAction::Down),
        Key::Enter => Some(MenuAction::Confirm),
        _ => None,
    }
}

/// Mode select and the pause menu. Z/S are up/down, by legend or position.
pub fn menu_action(key: Key) -> Option<MenuAction> {
    match key {
        Key::ArrowUp | Key::Z | Key::W => Some(MenuAction::Up),
        Key::ArrowDown | Key::S | Key::Tab => Some(MenuAction::Down),
        Key::Enter | Key::Space => Some(MenuAction::Confirm),
        _ => None,
    }
}

/// Gesture selector during a match. Q/D are left/right, by legend or position.
pub fn selector_input(key: Key) -> Option<MatchInput> {
    match key {
        Key::ArrowLeft | Key::Q | Key::A => Some(MatchInput::Previous),
        Key::ArrowRight | Key::D | Key::Tab => Some(MatchInput::Next),
        Key::Enter | Key::Space => Some(MatchInput::Confirm),
        _ => None,
    }
}

pub fn is_pause_toggle(key: Key) -> bool {
    key == Key::Escape
}
