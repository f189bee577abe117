use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::board::BoardLayout;
use crate::game::GameConfig;
use crate::game::choice::{Argument, Choice};
use crate::game::state::{GameError, GameState};
use crate::types::OptionTag;

/// Scratch space for a single call to [`crate::game::Game::perform`].
///
/// Works on a clone of the latest committed state. Snapshots committed along
/// the way are held back and only handed to the game once the whole action
/// has succeeded, so a failing handler leaves the history untouched.
pub struct Action<'a> {
    pub(super) state: GameState,
    pub(super) config: &'a GameConfig,
    pub(super) layout: &'a BoardLayout,
    pub(super) rng: &'a mut ChaCha8Rng,
    snapshots: Vec<GameState>,
}

impl<'a> Action<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn begin(
        latest: &GameState,
        actor: usize,
        choice: &Choice,
        option: OptionTag,
        argument: Option<Argument>,
        config: &'a GameConfig,
        layout: &'a BoardLayout,
        rng: &'a mut ChaCha8Rng,
    ) -> Self {
        let mut state = latest.clone();
        state.actor = actor;
        state.action = choice.action();
        state.option = option;
        state.argument = argument;
        state.clear_deltas();
        state.players[actor].choice = None;
        Self {
            state,
            config,
            layout,
            rng,
            snapshots: Vec::new(),
        }
    }

    pub(super) fn set_choice(&mut self, player_index: usize, choice: Choice) {
        debug_assert!(!choice.is_empty(), "choice {choice} offers nothing");
        self.state.players[player_index].choice = Some(choice);
    }

    /// Applies pending deltas and records the result as a snapshot.
    pub(super) fn commit(&mut self) -> Result<(), GameError> {
        self.state.apply_deltas()?;
        trace!(
            actor = self.state.actor,
            action = %self.state.action,
            option = %self.state.option,
            round = self.state.round,
            "commit"
        );
        self.snapshots.push(self.state.clone());
        self.state.clear_deltas();
        Ok(())
    }

    /// Final commit. Returns every snapshot the action produced, oldest first.
    pub(super) fn finish(mut self) -> Result<Vec<GameState>, GameError> {
        self.commit()?;
        Ok(self.snapshots)
    }
}
