//! Minigames.
//!
//! A minigame is a blocking, self-contained challenge run in the middle of a
//! scripted turn. It owns its prompt loop and attempt budget and reports only
//! whether the player won and how the score should change. What happens to
//! the prize afterwards is decided by the script that started the game.

use crate::repl::input::{InputEvent, LineSource};
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

use anyhow::{Context, Result};
use deadline_data::MinigameDef;
use log::info;
use rand::Rng;
use rand::rngs::StdRng;
use std::fmt::Write;

/// Result of one play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinigameOutcome {
    pub won: bool,
    pub score_delta: isize,
}

impl MinigameOutcome {
    pub fn win(points: isize) -> Self {
        Self {
            won: true,
            score_delta: points,
        }
    }

    pub fn loss() -> Self {
        Self {
            won: false,
            score_delta: 0,
        }
    }
}

/// An interactive challenge with a binary outcome.
pub trait Minigame {
    fn title(&self) -> &'static str;

    /// Run the challenge to completion.
    ///
    /// # Errors
    /// Returns an error only if reading input fails.
    fn play(&mut self, io: &mut dyn LineSource, view: &mut View, rng: &mut StdRng) -> Result<MinigameOutcome>;
}

/// Build the minigame described by `def`, hiding `item` and worth `points`.
pub fn build_minigame(def: &MinigameDef, item: &str, points: isize) -> Box<dyn Minigame> {
    match def {
        MinigameDef::ShufflingDrawers { drawers, attempts } => Box::new(ShufflingDrawers {
            item: item.to_string(),
            drawers: *drawers,
            attempts: *attempts,
            points,
        }),
        MinigameDef::TruthfulLabels { labels, answer } => Box::new(TruthfulLabels {
            item: item.to_string(),
            labels: labels.clone(),
            answer: *answer,
            points,
        }),
    }
}

/// The prize hides in one of several drawers and moves after every wrong guess.
#[derive(Debug, Clone)]
pub struct ShufflingDrawers {
    pub item: String,
    pub drawers: u32,
    pub attempts: u32,
    pub points: isize,
}

impl Minigame for ShufflingDrawers {
    fn title(&self) -> &'static str {
        "shuffling drawers"
    }

    fn play(&mut self, io: &mut dyn LineSource, view: &mut View, rng: &mut StdRng) -> Result<MinigameOutcome> {
        view.push(ViewItem::Narrative(format!(
            "The {} is in one of the {} drawers. You must guess which drawer. \
             The drawers reshuffle after each incorrect guess.",
            self.item, self.drawers
        )));
        let mut remaining = self.attempts;
        while remaining > 0 {
            let correct = rng.random_range(1..=self.drawers);
            let prompt = format!(
                "Enter guess (1-{}). You have {remaining} chance(s): ",
                self.drawers
            );
            let Some(guess) = read_choice(io, view, &prompt, |n| (1..=self.drawers).contains(&n))? else {
                view.push(ViewItem::ActionFailure("You walk away from the drawers.".into()));
                break;
            };
            if guess == correct {
                info!("{}: won with guess {guess}", self.title());
                return Ok(MinigameOutcome::win(self.points));
            }
            view.push(ViewItem::ActionFailure("Wrong! Reshuffled.".into()));
            remaining -= 1;
        }
        info!("{}: lost", self.title());
        Ok(MinigameOutcome::loss())
    }
}

/// A one-guess logic puzzle: of several labels, only one tells the truth.
///
/// Labels may mention the prize with the `{item}` placeholder.
#[derive(Debug, Clone)]
pub struct TruthfulLabels {
    pub item: String,
    pub labels: Vec<String>,
    pub answer: u32,
    pub points: isize,
}

impl Minigame for TruthfulLabels {
    fn title(&self) -> &'static str {
        "truthful labels"
    }

    fn play(&mut self, io: &mut dyn LineSource, view: &mut View, _rng: &mut StdRng) -> Result<MinigameOutcome> {
        let count = u32::try_from(self.labels.len()).context("too many labels")?;
        let mut text = format!(
            "The {} is behind one of {count} labelled choices. Only one label is telling the truth.",
            self.item
        );
        for (n, label) in self.labels.iter().enumerate() {
            let label = label.replace("{item}", &self.item);
            let _ = write!(text, "\nChoice {}: '{label}'", n + 1);
        }
        view.push(ViewItem::Narrative(text));

        let prompt = format!("Enter guess (1-{count}), you have only one chance: ");
        let guess = read_choice(io, view, &prompt, |n| (1..=count).contains(&n))?;
        if guess == Some(self.answer) {
            info!("{}: solved", self.title());
            Ok(MinigameOutcome::win(self.points))
        } else {
            info!("{}: failed with {guess:?}", self.title());
            Ok(MinigameOutcome::loss())
        }
    }
}

/// Prompt until the player enters an accepted number. Bad input re-prompts;
/// end of input or an interrupt yields `None`.
///
/// # Errors
/// Returns an error if reading input fails.
pub fn read_choice(
    io: &mut dyn LineSource,
    view: &mut View,
    prompt: &str,
    accept: impl Fn(u32) -> bool,
) -> Result<Option<u32>> {
    loop {
        view.flush();
        match io.read_line(&prompt.prompt_style().to_string()).context("reading choice")? {
            InputEvent::Line(line) => match line.trim().parse::<u32>() {
                Ok(n) if accept(n) => return Ok(Some(n)),
                _ => view.push(ViewItem::ActionFailure(format!("'{}' isn't one of the choices.", line.trim()))),
            },
            InputEvent::Eof | InputEvent::Interrupted => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::input::ScriptedInput;
    use rand::SeedableRng;

    fn labels() -> TruthfulLabels {
        TruthfulLabels {
            item: "usb drive".into(),
            labels: vec![
                "The {item} is in me!".into(),
                "The {item} is not in me!".into(),
                "The {item} is not in Backpack 1!".into(),
            ],
            answer: 2,
            points: 20,
        }
    }

    #[test]
    fn labels_right_answer_wins_points() {
        let mut io = ScriptedInput::from_lines(["2"]);
        let outcome = labels()
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(outcome, MinigameOutcome::win(20));
    }

    #[test]
    fn labels_bad_input_reprompts_without_spending_the_guess() {
        let mut io = ScriptedInput::from_lines(["banana", "7", "2"]);
        let outcome = labels()
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(outcome.won);
        assert_eq!(io.remaining(), 0);
    }

    #[test]
    fn labels_wrong_answer_loses() {
        let mut io = ScriptedInput::from_lines(["1"]);
        let outcome = labels()
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(outcome, MinigameOutcome::loss());
    }

    #[test]
    fn eof_forfeits() {
        let mut io = ScriptedInput::default();
        let outcome = labels()
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(!outcome.won);
    }

    #[test]
    fn drawers_spend_at_most_the_attempt_budget() {
        let mut game = ShufflingDrawers {
            item: "laptop charger".into(),
            drawers: 3,
            attempts: 3,
            points: 20,
        };
        let mut io = ScriptedInput::from_lines(["1", "1", "1", "1", "1"]);
        let outcome = game
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert!(io.remaining() >= 2);
        assert!(outcome.score_delta == 0 || outcome.score_delta == 20);
        assert_eq!(outcome.won, outcome.score_delta == 20);
    }

    #[test]
    fn single_drawer_always_wins() {
        // a lone drawer can't hide anything
        let mut game = ShufflingDrawers {
            item: "laptop charger".into(),
            drawers: 1,
            attempts: 1,
            points: 5,
        };
        let mut io = ScriptedInput::from_lines(["1"]);
        let outcome = game
            .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(outcome, MinigameOutcome::win(5));
    }

    #[test]
    fn seeded_rng_makes_drawers_repeatable() {
        let play = || {
            let mut game = ShufflingDrawers {
                item: "x".into(),
                drawers: 3,
                attempts: 3,
                points: 1,
            };
            let mut io = ScriptedInput::from_lines(["2", "2", "2"]);
            let outcome = game
                .play(&mut io, &mut View::new(), &mut StdRng::seed_from_u64(99))
                .unwrap();
            (outcome, io.remaining())
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn build_minigame_picks_kind() {
        let game = build_minigame(
            &MinigameDef::ShufflingDrawers { drawers: 3, attempts: 3 },
            "laptop charger",
            20,
        );
        assert_eq!(game.title(), "shuffling drawers");
    }
}
