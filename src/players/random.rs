use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::game::Game;
use crate::players::base::{BasePlayer, Decision, choose_any};

/// Uniform over the offered options, then over that option's arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPlayer;

impl BasePlayer for RandomPlayer {
    fn decide(&self, game: &Game, player_index: usize, rng: &mut ChaCha8Rng) -> Option<Decision> {
        let choice = game.choice(player_index)?;
        let option = choice.option_tags().collect::<Vec<_>>().choose(rng).copied()?;
        choose_any(choice, option, rng)
    }
}
