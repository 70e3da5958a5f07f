use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roshambo_engine::input::Key;
use roshambo_engine::paint::Color;
use roshambo_engine::render::SharedBackground;

use crate::button::{Button, ButtonList};
use crate::draw::{Frame, PANEL, SELECTED, SELECTOR_SIZE, TEXT, TITLE_SIZE, UNSELECTED};
use crate::gesture::{Gesture, Outcome};
use crate::hands::HandSprites;
use crate::keys::{MenuAction, is_pause_toggle, menu_action, selector_input};
use crate::match_engine::{MatchEngine, MatchEvent, MatchInput, MatchTimings, Player, Stage};
use crate::screen::{BuildCtx, Screen, ScreenCtx, ScreenError, ScreenFactory, ScreenKind};

const HAND_W: f32 = 120.0;
const HAND_H: f32 = 80.0;
const HAND_LIFT: f32 = 30.0;
const FIRST_HAND: Color = Color::rgba(40, 90, 200, 220);
pub(crate) const SECOND_HAND: Color = Color::rgba(200, 60, 40, 220);

/// A fresh round in the given mode over `background`.
pub fn factory(vs_synthetic: bool, background: SharedBackground, back: Option<ScreenFactory>) -> ScreenFactory {
    Rc::new(move |ctx: &mut BuildCtx<'_>| -> Result<Box<dyn Screen>, ScreenError> {
        let rng = StdRng::seed_from_u64(ctx.rng.random());
        Ok(Box::new(
            MatchScreen::new(vs_synthetic, background.clone(), back.clone(), ctx.settings.timings, rng)
                .with_hands(ctx.settings.hands.clone()),
        ))
    })
}

/// One round plus its pause menu.
///
/// Pausing only gates input; the round clock keeps running.
pub struct MatchScreen {
    engine: MatchEngine,
    background: SharedBackground,
    back: Option<ScreenFactory>,
    pause: ButtonList,
    paused: bool,
    clock: Duration,
    hands: Rc<HandSprites>,
}

impl MatchScreen {
    pub fn new(
        vs_synthetic: bool,
        background: SharedBackground,
        back: Option<ScreenFactory>,
        timings: MatchTimings,
        rng: StdRng,
    ) -> Self {
        let pause = ButtonList::new(vec![
            Button::new("Resume", None),
            Button::new(
                "Restart",
                Some(factory(vs_synthetic, background.clone(), back.clone())),
            ),
            Button::new("Quit to Main Menu", back.clone()),
        ]);

        Self {
            engine: MatchEngine::new(vs_synthetic, timings, rng),
            background,
            back,
            pause,
            paused: false,
            clock: Duration::ZERO,
            hands: Rc::default(),
        }
    }

    pub fn with_hands(mut self, hands: Rc<HandSprites>) -> Self {
        self.hands = hands;
        self
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn rematch(&self) -> ScreenFactory {
        factory(self.engine.vs_synthetic(), self.background.clone(), self.back.clone())
    }

    fn handle_pause_key(&mut self, key: Key, ctx: &mut ScreenCtx) {
        match menu_action(key) {
            Some(MenuAction::Up) => self.pause.prev(),
            Some(MenuAction::Down) => self.pause.next(),
            Some(MenuAction::Confirm) => match self.pause.selected().and_then(|b| b.target.clone()) {
                Some(target) => ctx.change(target),
                None => self.paused = false,
            },
            None => {}
        }
    }

    fn second_name(&self) -> &'static str {
        if self.engine.vs_synthetic() { "Machine" } else { "Player 2" }
    }

    fn draw_selector(&self, frame: &mut Frame<'_>, player: Player) {
        let (w, h) = (frame.width(), frame.height());
        let selected = self.engine.selection(player);
        let n = Gesture::ALL.len();
        for (i, g) in Gesture::ALL.iter().enumerate() {
            let (rect_x, label_x) = match player {
                Player::First => (15.0 + i as f32 * 100.0, 20.0 + i as f32 * 100.0),
                Player::Second => {
                    let from_right = (n - i) as f32 * 100.0;
                    (w - 15.0 - from_right, w - 10.0 - from_right)
                }
            };
            frame.fill(rect_x, h - 70.0, 90.0, 50.0, PANEL);
            let color = if *g == selected { SELECTED } else { UNSELECTED };
            frame.text(g.label(), label_x, h - 65.0, SELECTOR_SIZE, color);
        }
    }

    fn draw_hands(&self, frame: &mut Frame<'_>) {
        let (Some(first), Some(second)) = (self.engine.first_choice(), self.engine.second_choice()) else {
            return;
        };
        let pose = self.engine.hand_pose(self.clock);
        let (w, h) = (frame.width(), frame.height());
        let y = h * 0.65 - HAND_H / 2.0 - pose.lift * HAND_LIFT;

        let left_from = -HAND_W - 10.0;
        let left_to = w / 2.0 - HAND_W - 20.0;
        let right_from = w + 10.0;
        let right_to = w / 2.0 + 20.0;
        let left_x = left_from + (left_to - left_from) * pose.approach;
        let right_x = right_from + (right_to - right_from) * pose.approach;

        let (a, b) = if pose.show_choice { (first, second) } else { (Gesture::Rock, Gesture::Rock) };

        self.draw_hand(frame, Player::First, a, left_x, y);
        self.draw_hand(frame, Player::Second, b, right_x, y);
    }

    /// The player's artwork if it loaded, otherwise a tinted labelled panel.
    fn draw_hand(&self, frame: &mut Frame<'_>, player: Player, gesture: Gesture, x: f32, y: f32) {
        if let Some(image) = self.hands.get(player, gesture) {
            frame.image(image, x, y, HAND_W, HAND_H);
            return;
        }
        let tint = match player {
            Player::First => FIRST_HAND,
            Player::Second => SECOND_HAND,
        };
        frame.fill(x, y, HAND_W, HAND_H, tint);
        frame.text(gesture.label(), x + 10.0, y + 25.0, SELECTOR_SIZE, TEXT);
    }

    fn draw_result(&self, frame: &mut Frame<'_>) {
        let Some(result) = self.engine.result() else { return };
        let headline = match result.outcome {
            Outcome::Tie => "It's a Tie!".to_owned(),
            Outcome::FirstWins => "Player 1 Wins!".to_owned(),
            Outcome::SecondWins => format!("{} Wins!", self.second_name()),
        };
        frame.text(&headline, 50.0, 50.0, TITLE_SIZE, TEXT);
        frame.text(&format!("Player 1 chose: {}", result.first), 50.0, 100.0, SELECTOR_SIZE, TEXT);
        frame.text(
            &format!("{} chose: {}", self.second_name(), result.second),
            50.0,
            130.0,
            SELECTOR_SIZE,
            TEXT,
        );

        let hint = if self.engine.awaiting_rematch() {
            "Press Enter to play again"
        } else {
            "New round in a moment..."
        };
        let h = frame.height();
        frame.text(hint, 50.0, h - 50.0, SELECTOR_SIZE, UNSELECTED);
    }
}

impl Screen for MatchScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Match
    }

    fn handle_input(&mut self, keys: &[Key], ctx: &mut ScreenCtx) {
        for key in keys {
            if ctx.is_leaving() {
                break;
            }
            if is_pause_toggle(*key) {
                self.paused = !self.paused;
                log::debug!("pause toggled: {}", self.paused);
                continue;
            }
            if self.paused {
                self.handle_pause_key(*key, ctx);
                continue;
            }

            let Some(input) = selector_input(*key) else { continue };
            if self.engine.awaiting_rematch() {
                if input == MatchInput::Confirm {
                    ctx.change(self.rematch());
                }
                continue;
            }
            self.engine.handle(input);
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut ScreenCtx) {
        if let Ok(step) = Duration::try_from_secs_f32(dt) {
            self.clock = self.clock.saturating_add(step);
        }
        match self.engine.advance(self.clock) {
            Some(MatchEvent::Finished(result)) => {
                log::info!("round finished: {} vs {} -> {:?}", result.first, result.second, result.outcome);
                ctx.report(result);
            }
            Some(MatchEvent::Reset) => log::info!("tied round reset"),
            None => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        frame.set_background(&self.background);

        if self.paused {
            let (w, h) = (frame.width(), frame.height());
            frame.fill(0.0, 0.0, w, h, PANEL);
            frame.text("Game Paused", 50.0, 50.0, TITLE_SIZE, TEXT);
            frame.button_column(&self.pause, 50.0, 150.0, 300.0);
            return;
        }

        match self.engine.stage() {
            Stage::AwaitingFirstChoice => {
                frame.text("Player 1: Choose your move", 50.0, 50.0, TITLE_SIZE, TEXT);
                self.draw_selector(frame, Player::First);
            }
            Stage::AwaitingSecondChoice => {
                frame.text("Player 2: Choose your move", 50.0, 50.0, TITLE_SIZE, TEXT);
                self.draw_selector(frame, Player::Second);
            }
            Stage::ResolvingOutcome => {}
            Stage::RevealAnimating => self.draw_hands(frame),
            Stage::Finished => {
                self.draw_hands(frame);
                self.draw_result(frame);
            }
        }
    }

    fn update_size(&mut self, width: u32, height: u32) {
        self.background.borrow_mut().update_size(width, height);
    }

    fn background(&self) -> Option<&SharedBackground> {
        Some(&self.background)
    }

    fn match_engine(&self) -> Option<&MatchEngine> {
        Some(&self.engine)
    }
}
