use std::fmt;

/// A key the game can bind.
///
/// Navigation keys plus the letters of the WASD and ZQSD clusters. Letters
/// are physical positions named by their QWERTY legend, so the key printed Z
/// on an AZERTY board arrives as `Key::W`. Everything else arrives as
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    W,
    A,
    S,
    D,
    Z,
    Q,

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// OS key-repeat.
        repeat: bool,
    },

    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "key #{code}"),
            other => write!(f, "{other:?}"),
        }
    }
}
