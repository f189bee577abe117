use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Argument, Choice, Game};
use crate::types::OptionTag;

/// An option picked from a pending choice, with its argument if it takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub option: OptionTag,
    pub argument: Option<Argument>,
}

impl Decision {
    pub fn new(option: OptionTag) -> Self {
        Self {
            option,
            argument: None,
        }
    }

    pub fn with_argument(option: OptionTag, argument: Argument) -> Self {
        Self {
            option,
            argument: Some(argument),
        }
    }
}

pub trait BasePlayer {
    /// Answers the choice pending for `player_index`, or `None` to pass.
    fn decide(&self, game: &Game, player_index: usize, rng: &mut ChaCha8Rng) -> Option<Decision>;
}

/// Picks `option`, and for options with arguments one of the best-ranked
/// values at random. Returns `None` when the option is not offered or the
/// best rank falls short of `min_rank`.
pub fn choose_ranked(
    choice: &Choice,
    option: OptionTag,
    rank: impl Fn(&Argument) -> i32,
    min_rank: Option<i32>,
    rng: &mut ChaCha8Rng,
) -> Option<Decision> {
    if !choice.has_option(option) {
        return None;
    }
    let Some(args) = choice.args(option) else {
        return Some(Decision::new(option));
    };
    let ranked: Vec<(i32, Argument)> = args.iter().map(|arg| (rank(arg), *arg)).collect();
    let top = ranked.iter().map(|(score, _)| *score).max()?;
    if min_rank.is_some_and(|min| top < min) {
        return None;
    }
    let best: Vec<Argument> = ranked
        .into_iter()
        .filter(|(score, _)| *score == top)
        .map(|(_, arg)| arg)
        .collect();
    best.choose(rng)
        .map(|arg| Decision::with_argument(option, *arg))
}

/// Picks `option` with a uniformly random argument.
pub fn choose_any(choice: &Choice, option: OptionTag, rng: &mut ChaCha8Rng) -> Option<Decision> {
    choose_ranked(choice, option, |_| 0, None, rng)
}
