use super::types::{InputEvent, Key, KeyState};

/// Input collected during one frame.
///
/// Screens consume `key_presses`: discrete presses in the order they arrived.
/// Releases and OS key-repeats are kept in `events` only.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Fresh key presses, in arrival order.
    pub key_presses: Vec<Key>,

    /// Whether the window currently has keyboard focus.
    pub focused: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.key_presses.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        match &ev {
            InputEvent::Key { key, state: KeyState::Pressed, repeat: false } => {
                self.key_presses.push(*key);
            }
            InputEvent::Focused(f) => self.focused = *f,
            _ => {}
        }
        self.events.push(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn presses_keep_arrival_order() {
        let mut frame = InputFrame::default();
        frame.push_event(press(Key::ArrowDown));
        frame.push_event(press(Key::Enter));
        assert_eq!(frame.key_presses, vec![Key::ArrowDown, Key::Enter]);
    }

    #[test]
    fn repeats_and_releases_are_not_presses() {
        let mut frame = InputFrame::default();
        frame.push_event(InputEvent::Key { key: Key::A, state: KeyState::Pressed, repeat: true });
        frame.push_event(InputEvent::Key { key: Key::A, state: KeyState::Released, repeat: false });
        assert!(frame.key_presses.is_empty());
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn clear_keeps_focus() {
        let mut frame = InputFrame::default();
        frame.push_event(InputEvent::Focused(true));
        frame.push_event(press(Key::Space));
        frame.clear();
        assert!(frame.key_presses.is_empty() && frame.events.is_empty());
        assert!(frame.focused);
    }
}
