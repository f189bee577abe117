pub mod base;
pub mod basic;
pub mod random;

use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::game::{Game, GameError};

pub use base::{BasePlayer, Decision};
pub use basic::BasicPlayer;
pub use random::RandomPlayer;

/// Lets bots answer pending choices until none of them can, the game has a
/// winner, or `max_actions` actions have been performed. Seats with no entry
/// in `players` are left alone. Returns the number of actions performed.
pub fn run_bots(
    game: &mut Game,
    players: &[Box<dyn BasePlayer>],
    rng: &mut ChaCha8Rng,
    max_actions: usize,
) -> Result<usize, GameError> {
    let mut performed = 0;
    while game.winner().is_none() {
        let mut progressed = false;
        for index in game.pending_players() {
            let Some(player) = players.get(index) else {
                continue;
            };
            let Some(decision) = player.decide(game, index, rng) else {
                continue;
            };
            game.perform(index, decision.option, decision.argument)?;
            performed += 1;
            progressed = true;
            break;
        }
        if !progressed {
            break;
        }
        if performed >= max_actions {
            warn!(game = %game.id, performed, "bot action cap reached");
            break;
        }
    }
    Ok(performed)
}
