//! The closed set of screens and their factories.

pub mod main_menu;
pub mod match_screen;
pub mod mode_select;

pub use main_menu::MainMenu;
pub use match_screen::MatchScreen;
pub use mode_select::ModeSelect;
