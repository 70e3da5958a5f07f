//! Round state machine: choice collection, outcome, reveal animation.
//!
//! Time is passed in as a [`Duration`] on the caller's match clock. Phases
//! advance by their nominal length (`phase_start += duration`), so the same
//! total time yields the same state whatever the frame rate.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use crate::gesture::{Gesture, Outcome, winner};

#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum Stage {
    AwaitingFirstChoice,
    AwaitingSecondChoice,
    ResolvingOutcome,
    RevealAnimating,
    Finished,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum RevealPhase {
    /// Hands slide in from the edges.
    Approach,
    /// Hands bob `oscillate_cycles` times.
    Oscillate,
    /// Final gestures shown.
    Reveal,
    Done,
}

impl RevealPhase {
    fn next(self) -> RevealPhase {
        match self {
            RevealPhase::Approach => RevealPhase::Oscillate,
            RevealPhase::Oscillate => RevealPhase::Reveal,
            RevealPhase::Reveal | RevealPhase::Done => RevealPhase::Done,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MatchTimings {
    pub approach: Duration,
    pub oscillate: Duration,
    pub oscillate_cycles: u32,
    pub reveal: Duration,
    /// Delay before a tied round starts over.
    pub tie_reset: Duration,
}

impl MatchTimings {
    fn phase(&self, phase: RevealPhase) -> Duration {
        match phase {
            RevealPhase::Approach => self.approach,
            RevealPhase::Oscillate => self.oscillate,
            RevealPhase::Reveal => self.reveal,
            RevealPhase::Done => Duration::ZERO,
        }
    }

    /// Length of the whole reveal animation.
    pub fn reveal_total(&self) -> Duration {
        self.approach + self.oscillate + self.reveal
    }
}

impl Default for MatchTimings {
    fn default() -> Self {
        Self {
            approach: Duration::from_millis(600),
            oscillate: Duration::from_millis(1500),
            oscillate_cycles: 3,
            reveal: Duration::from_millis(500),
            tie_reset: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Player {
    First,
    Second,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatchInput {
    Previous,
    Next,
    Confirm,
}

/// What a finished round reports outward.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MatchResult {
    pub vs_synthetic: bool,
    pub first: Gesture,
    pub second: Gesture,
    pub outcome: Outcome,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatchEvent {
    Finished(MatchResult),
    /// A tied round was cleared for another go.
    Reset,
}

/// Where the hands are during the reveal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandPose {
    /// 0 at the screen edge, 1 fully in.
    pub approach: f32,
    /// Bob height in `[0, 1]`.
    pub lift: f32,
    /// Whether hands show the chosen gestures instead of fists.
    pub show_choice: bool,
}

impl HandPose {
    const HIDDEN: HandPose = HandPose {
        approach: 0.0,
        lift: 0.0,
        show_choice: false,
    };
}

pub struct MatchEngine {
    stage: Stage,
    first_choice: Option<Gesture>,
    second_choice: Option<Gesture>,
    selection: [Gesture; 2],
    vs_synthetic: bool,
    reveal_phase: Option<RevealPhase>,
    phase_start: Duration,
    finished_at: Option<Duration>,
    outcome: Option<Outcome>,
    timings: MatchTimings,
    rng: StdRng,
}

impl MatchEngine {
    pub fn new(vs_synthetic: bool, timings: MatchTimings, rng: StdRng) -> Self {
        Self {
            stage: Stage::AwaitingFirstChoice,
            first_choice: None,
            second_choice: None,
            selection: [Gesture::Rock; 2],
            vs_synthetic,
            reveal_phase: None,
            phase_start: Duration::ZERO,
            finished_at: None,
            outcome: None,
            timings,
            rng,
        }
    }

    fn reset(&mut self) {
        self.stage = Stage::AwaitingFirstChoice;
        self.first_choice = None;
        self.second_choice = None;
        self.selection = [Gesture::Rock; 2];
        self.reveal_phase = None;
        self.phase_start = Duration::ZERO;
        self.finished_at = None;
        self.outcome = None;
    }

    fn set_stage(&mut self, stage: Stage) {
        log::debug!("match stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// The player whose selector currently takes input, if any.
    pub fn active_player(&self) -> Option<Player> {
        match self.stage {
            Stage::AwaitingFirstChoice => Some(Player::First),
            Stage::AwaitingSecondChoice => Some(Player::Second),
            _ => None,
        }
    }

    /// Applies one gameplay input. Returns whether it was used.
    pub fn handle(&mut self, input: MatchInput) -> bool {
        let Some(player) = self.active_player() else {
            return false;
        };
        let slot = match player {
            Player::First => 0,
            Player::Second => 1,
        };

        match input {
            MatchInput::Previous => self.selection[slot] = self.selection[slot].prev(),
            MatchInput::Next => self.selection[slot] = self.selection[slot].next(),
            MatchInput::Confirm => {
                let choice = self.selection[slot];
                match player {
                    Player::First => {
                        log::debug!("player 1 chose {choice}");
                        self.first_choice = Some(choice);
                        if self.vs_synthetic {
                            let pick = Gesture::from_index(self.rng.random_range(0..Gesture::ALL.len()));
                            log::debug!("machine chose {pick}");
                            self.second_choice = Some(pick);
                            self.set_stage(Stage::ResolvingOutcome);
                        } else {
                            self.set_stage(Stage::AwaitingSecondChoice);
                        }
                    }
                    Player::Second => {
                        log::debug!("player 2 chose {choice}");
                        self.second_choice = Some(choice);
                        self.set_stage(Stage::ResolvingOutcome);
                    }
                }
            }
        }
        true
    }

    /// Moves time-driven stages forward to `now`.
    pub fn advance(&mut self, now: Duration) -> Option<MatchEvent> {
        loop {
            match self.stage {
                Stage::ResolvingOutcome => {
                    let (Some(first), Some(second)) = (self.first_choice, self.second_choice) else {
                        return None;
                    };
                    self.outcome = Some(winner(first, second));
                    self.reveal_phase = Some(RevealPhase::Approach);
                    self.phase_start = now;
                    self.set_stage(Stage::RevealAnimating);
                }

                Stage::RevealAnimating => {
                    let phase = self.reveal_phase.unwrap_or(RevealPhase::Approach);
                    if phase == RevealPhase::Done {
                        self.finished_at = Some(self.phase_start);
                        self.set_stage(Stage::Finished);
                        return self.result().map(MatchEvent::Finished);
                    }
                    let end = self.phase_start + self.timings.phase(phase);
                    if now < end {
                        return None;
                    }
                    self.phase_start = end;
                    self.reveal_phase = Some(phase.next());
                }

                Stage::Finished => {
                    let finished_at = self.finished_at?;
                    if self.outcome == Some(Outcome::Tie) && now.saturating_sub(finished_at) >= self.timings.tie_reset {
                        log::debug!("tie: starting the round over");
                        self.reset();
                        return Some(MatchEvent::Reset);
                    }
                    return None;
                }

                Stage::AwaitingFirstChoice | Stage::AwaitingSecondChoice => return None,
            }
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn reveal_phase(&self) -> Option<RevealPhase> {
        self.reveal_phase
    }

    pub fn first_choice(&self) -> Option<Gesture> {
        self.first_choice
    }

    pub fn second_choice(&self) -> Option<Gesture> {
        self.second_choice
    }

    pub fn selection(&self, player: Player) -> Gesture {
        match player {
            Player::First => self.selection[0],
            Player::Second => self.selection[1],
        }
    }

    pub fn vs_synthetic(&self) -> bool {
        self.vs_synthetic
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn finished_at(&self) -> Option<Duration> {
        self.finished_at
    }

    pub fn timings(&self) -> &MatchTimings {
        &self.timings
    }

    /// Finished with a winner; a confirm should start a new round.
    pub fn awaiting_rematch(&self) -> bool {
        self.stage == Stage::Finished && matches!(self.outcome, Some(Outcome::FirstWins | Outcome::SecondWins))
    }

    pub fn result(&self) -> Option<MatchResult> {
        Some(MatchResult {
            vs_synthetic: self.vs_synthetic,
            first: self.first_choice?,
            second: self.second_choice?,
            outcome: self.outcome?,
        })
    }

    pub fn hand_pose(&self, now: Duration) -> HandPose {
        if self.stage == Stage::Finished {
            return HandPose {
                approach: 1.0,
                lift: 0.0,
                show_choice: true,
            };
        }
        let Some(phase) = self.reveal_phase else {
            return HandPose::HIDDEN;
        };

        let len = self.timings.phase(phase).as_secs_f32();
        let t = if len > 0.0 {
            (now.saturating_sub(self.phase_start).as_secs_f32() / len).clamp(0.0, 1.0)
        } else {
            1.0
        };

        match phase {
            RevealPhase::Approach => HandPose {
                approach: t,
                lift: 0.0,
                show_choice: false,
            },
            RevealPhase::Oscillate => HandPose {
                approach: 1.0,
                lift: (t * self.timings.oscillate_cycles as f32 * TAU / 2.0).sin().abs(),
                show_choice: false,
            },
            RevealPhase::Reveal | RevealPhase::Done => HandPose {
                approach: 1.0,
                lift: 0.0,
                show_choice: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine(vs_synthetic: bool) -> MatchEngine {
        MatchEngine::new(vs_synthetic, MatchTimings::default(), StdRng::seed_from_u64(7))
    }

    /// Human round with both players picking `first` / `second`.
    fn played(first: Gesture, second: Gesture) -> MatchEngine {
        let mut m = engine(false);
        while m.selection(Player::First) != first {
            m.handle(MatchInput::Next);
        }
        m.handle(MatchInput::Confirm);
        while m.selection(Player::Second) != second {
            m.handle(MatchInput::Next);
        }
        m.handle(MatchInput::Confirm);
        m
    }

    // ── choice collection ─────────────────────────────────────────────────

    #[test]
    fn synthetic_opponent_skips_second_choice() {
        let mut m = engine(true);
        assert!(m.handle(MatchInput::Confirm));
        assert_eq!(m.stage(), Stage::ResolvingOutcome);
        assert_eq!(m.first_choice(), Some(Gesture::Rock));
        assert!(m.second_choice().is_some());
    }

    #[test]
    fn human_opponent_chooses_second() {
        let mut m = engine(false);
        m.handle(MatchInput::Next);
        m.handle(MatchInput::Confirm);
        assert_eq!(m.stage(), Stage::AwaitingSecondChoice);
        assert_eq!(m.first_choice(), Some(Gesture::Paper));
        assert_eq!(m.active_player(), Some(Player::Second));

        m.handle(MatchInput::Previous);
        m.handle(MatchInput::Confirm);
        assert_eq!(m.second_choice(), Some(Gesture::Scissors));
        assert_eq!(m.stage(), Stage::ResolvingOutcome);
    }

    #[test]
    fn input_is_ignored_outside_choice_stages() {
        let mut m = played(Gesture::Rock, Gesture::Paper);
        assert!(!m.handle(MatchInput::Next));
        m.advance(ms(0));
        assert!(!m.handle(MatchInput::Confirm));
    }

    // ── reveal timing ─────────────────────────────────────────────────────

    #[test]
    fn phases_follow_nominal_durations() {
        let mut m = played(Gesture::Rock, Gesture::Scissors);
        let t0 = ms(1000);

        assert_eq!(m.advance(t0), None);
        assert_eq!(m.stage(), Stage::RevealAnimating);
        assert_eq!(m.reveal_phase(), Some(RevealPhase::Approach));

        m.advance(t0 + ms(599));
        assert_eq!(m.reveal_phase(), Some(RevealPhase::Approach));
        m.advance(t0 + ms(600));
        assert_eq!(m.reveal_phase(), Some(RevealPhase::Oscillate));
        m.advance(t0 + ms(2100));
        assert_eq!(m.reveal_phase(), Some(RevealPhase::Reveal));

        let ev = m.advance(t0 + ms(2600));
        assert_eq!(
            ev,
            Some(MatchEvent::Finished(MatchResult {
                vs_synthetic: false,
                first: Gesture::Rock,
                second: Gesture::Scissors,
                outcome: Outcome::FirstWins,
            }))
        );
        assert_eq!(m.stage(), Stage::Finished);
        assert_eq!(m.finished_at(), Some(t0 + ms(2600)));
    }

    #[test]
    fn one_late_tick_lands_on_exact_finish_time() {
        let mut m = played(Gesture::Paper, Gesture::Scissors);
        m.advance(ms(0));
        let ev = m.advance(ms(60_000));
        assert!(matches!(ev, Some(MatchEvent::Finished(r)) if r.outcome == Outcome::SecondWins));
        assert_eq!(m.finished_at(), Some(m.timings().reveal_total()));
    }

    #[test]
    fn stages_never_go_backwards_within_a_round() {
        let mut m = engine(true);
        let mut seen = vec![m.stage()];
        m.handle(MatchInput::Confirm);
        seen.push(m.stage());
        for step in 0..400 {
            m.advance(ms(step * 10));
            seen.push(m.stage());
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
        assert!(!seen.contains(&Stage::AwaitingSecondChoice));
        assert_eq!(m.stage(), Stage::Finished);
    }

    // ── end of round ──────────────────────────────────────────────────────

    #[test]
    fn tie_resets_after_exactly_the_delay() {
        let mut m = played(Gesture::Rock, Gesture::Rock);
        m.advance(ms(0));
        let ev = m.advance(ms(10_000));
        assert!(matches!(ev, Some(MatchEvent::Finished(r)) if r.outcome == Outcome::Tie));
        let done = m.finished_at().unwrap();

        assert_eq!(m.advance(done + ms(4_999)), None);
        assert_eq!(m.stage(), Stage::Finished);
        assert!(!m.awaiting_rematch());

        assert_eq!(m.advance(done + ms(5_000)), Some(MatchEvent::Reset));
        assert_eq!(m.stage(), Stage::AwaitingFirstChoice);
        assert_eq!(m.first_choice(), None);
        assert_eq!(m.selection(Player::First), Gesture::Rock);
    }

    #[test]
    fn decided_round_waits_for_rematch() {
        let mut m = played(Gesture::Scissors, Gesture::Paper);
        m.advance(ms(0));
        m.advance(ms(3_000));
        assert_eq!(m.advance(ms(100_000)), None);
        assert_eq!(m.stage(), Stage::Finished);
        assert!(m.awaiting_rematch());
    }

    // ── pose ──────────────────────────────────────────────────────────────

    #[test]
    fn pose_tracks_phases() {
        let mut m = played(Gesture::Rock, Gesture::Paper);
        assert_eq!(m.hand_pose(ms(0)), HandPose::HIDDEN);

        m.advance(ms(0));
        let mid = m.hand_pose(ms(300));
        assert!((mid.approach - 0.5).abs() < 1e-3 && !mid.show_choice);

        m.advance(ms(700));
        let bob = m.hand_pose(ms(850));
        assert_eq!(bob.approach, 1.0);
        assert!(bob.lift > 0.0 && bob.lift <= 1.0);

        m.advance(ms(2_200));
        assert!(m.hand_pose(ms(2_200)).show_choice);
    }
}
