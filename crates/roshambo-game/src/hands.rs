//! Per-player hand artwork for the reveal animation.

use std::rc::Rc;

use roshambo_engine::canvas::Image;

use crate::gesture::Gesture;
use crate::match_engine::Player;

/// File name of one hand image under the asset `images/` directory.
///
/// The second player's set is mirrored so both hands face the middle.
pub fn file_name(player: Player, gesture: Gesture) -> String {
    let stem = gesture.label().to_ascii_lowercase();
    match player {
        Player::First => format!("{stem}_hand.png"),
        Player::Second => format!("{stem}_hand_flipped.png"),
    }
}

/// Whatever hand images could be loaded. Missing ones draw as plain panels.
#[derive(Debug, Clone, Default)]
pub struct HandSprites {
    sprites: [[Option<Rc<Image>>; 3]; 2],
}

impl HandSprites {
    pub fn set(&mut self, player: Player, gesture: Gesture, image: Image) {
        self.sprites[slot(player)][gesture.index()] = Some(Rc::new(image));
    }

    pub fn get(&self, player: Player, gesture: Gesture) -> Option<&Image> {
        self.sprites[slot(player)][gesture.index()].as_deref()
    }

    pub fn loaded(&self) -> usize {
        self.sprites.iter().flatten().filter(|s| s.is_some()).count()
    }
}

fn slot(player: Player) -> usize {
    match player {
        Player::First => 0,
        Player::Second => 1,
    }
}
