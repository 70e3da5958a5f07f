use crate::screen::ScreenFactory;

/// A labelled menu entry. No target means the owning screen decides
/// (quit, resume, ...).
#[derive(Clone)]
pub struct Button {
    pub label: String,
    pub target: Option<ScreenFactory>,
}

impl Button {
    pub fn new(label: impl Into<String>, target: Option<ScreenFactory>) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// Vertical menu with a wrapping selection.
#[derive(Clone)]
pub struct ButtonList {
    buttons: Vec<Button>,
    selected: usize,
}

impl ButtonList {
    pub fn new(buttons: Vec<Button>) -> Self {
        Self { buttons, selected: 0 }
    }

    pub fn next(&mut self) {
        if !self.buttons.is_empty() {
            self.selected = (self.selected + 1) % self.buttons.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.buttons.is_empty() {
            self.selected = (self.selected + self.buttons.len() - 1) % self.buttons.len();
        }
    }

    pub fn selected(&self) -> Option<&Button> {
        self.buttons.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
