use std::fmt;

/// One of the three hand shapes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
}

impl Gesture {
    /// Selector order.
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn index(self) -> usize {
        match self {
            Gesture::Rock => 0,
            Gesture::Paper => 1,
            Gesture::Scissors => 2,
        }
    }

    pub fn from_index(i: usize) -> Gesture {
        Self::ALL[i % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Gesture::Rock => "Rock",
            Gesture::Paper => "Paper",
            Gesture::Scissors => "Scissors",
        }
    }

    pub fn next(self) -> Gesture {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Gesture {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one round, seen from the first player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    FirstWins,
    SecondWins,
    Tie,
}

/// Cyclic comparison: each gesture beats the one before it in [`Gesture::ALL`].
pub fn winner(first: Gesture, second: Gesture) -> Outcome {
    match (first.index() as i32 - second.index() as i32).rem_euclid(3) {
        0 => Outcome::Tie,
        1 => Outcome::FirstWins,
        _ => Outcome::SecondWins,
    }
}
