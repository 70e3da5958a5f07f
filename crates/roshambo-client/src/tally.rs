use roshambo_game::gesture::Outcome;
use roshambo_game::{MatchResult, ScoreReporter};

/// Win/loss/tie counts from the first player's side.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Tally {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::FirstWins => self.wins += 1,
            Outcome::SecondWins => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

/// Keeps score for the lifetime of the process, per mode.
#[derive(Debug, Default)]
pub struct SessionTally {
    vs_machine: Tally,
    vs_player: Tally,
}

impl SessionTally {
    pub fn vs_machine(&self) -> Tally {
        self.vs_machine
    }

    pub fn vs_player(&self) -> Tally {
        self.vs_player
    }
}

impl ScoreReporter for SessionTally {
    fn record(&mut self, result: &MatchResult) {
        let (mode, tally) = if result.vs_synthetic {
            ("vs machine", &mut self.vs_machine)
        } else {
            ("vs player", &mut self.vs_player)
        };
        tally.add(result.outcome);
        log::info!(
            "{mode}: {} vs {} ({:?}); session {}W {}L {}T",
            result.first,
            result.second,
            result.outcome,
            tally.wins,
            tally.losses,
            tally.ties
        );
    }
}

#[cfg(test)]
mod tests {
    use roshambo_game::gesture::{Gesture, winner};

    use super::*;

    fn result(vs_synthetic: bool, first: Gesture, second: Gesture) -> MatchResult {
        MatchResult { vs_synthetic, first, second, outcome: winner(first, second) }
    }

    #[test]
    fn counts_per_mode() {
        let mut tally = SessionTally::default();
        tally.record(&result(true, Gesture::Rock, Gesture::Scissors));
        tally.record(&result(true, Gesture::Rock, Gesture::Paper));
        tally.record(&result(false, Gesture::Paper, Gesture::Paper));

        assert_eq!(tally.vs_machine(), Tally { wins: 1, losses: 1, ties: 0 });
        assert_eq!(tally.vs_player(), Tally { wins: 0, losses: 0, ties: 1 });
    }
}
