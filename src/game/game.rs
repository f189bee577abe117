use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::board::{BoardLayout, MapType};
use crate::game::action::Action;
use crate::game::choice::{Argument, Choice};
use crate::game::rules;
use crate::game::state::{GameError, GameState, ValidationError};
use crate::types::{DevelopmentCard, OptionTag};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub map_type: MapType,
    pub vps_to_win: u32,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            map_type: MapType::Beginner,
            vps_to_win: 10,
            seed: 42,
        }
    }
}

/// One game: its board, its committed history, and the random source every
/// roll, shuffle and robbery draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub config: GameConfig,
    pub layout: BoardLayout,
    states: Vec<GameState>,
    rng: ChaCha8Rng,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Builds the board and deck from `rng`, then asks seat 0 for its first
    /// home camp.
    pub fn with_rng(config: GameConfig, mut rng: ChaCha8Rng) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(GameError::InvalidConfig {
                num_players: config.num_players,
            });
        }
        let layout = BoardLayout::build(config.map_type, &mut rng);
        let mut stack = full_deck();
        stack.shuffle(&mut rng);

        let mut state = GameState::new(config.num_players, stack, layout.desert());
        let choice = rules::setup_camp_choice(&state, true);
        state.players[0].choice = Some(choice);

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            layout,
            states: vec![state],
            rng,
        })
    }

    /// Continues play from an arbitrary snapshot.
    pub fn resume(
        config: GameConfig,
        layout: BoardLayout,
        state: GameState,
        rng: ChaCha8Rng,
    ) -> Result<Self, GameError> {
        if state.num_players() != config.num_players {
            return Err(GameError::InvalidConfig {
                num_players: state.num_players(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            config,
            layout,
            states: vec![state],
            rng,
        })
    }

    pub fn latest(&self) -> &GameState {
        // `states` is never empty: every constructor seeds it.
        &self.states[self.states.len() - 1]
    }

    pub fn history(&self) -> &[GameState] {
        &self.states
    }

    pub fn winner(&self) -> Option<usize> {
        self.latest().winner
    }

    pub fn choice(&self, player_index: usize) -> Option<&Choice> {
        self.latest()
            .players
            .get(player_index)
            .and_then(|player| player.choice.as_ref())
    }

    pub fn pending_players(&self) -> Vec<usize> {
        self.latest().pending_players().collect()
    }

    /// The single entry point for moving the game forward.
    ///
    /// Rejected input leaves the game exactly as it was; the caller may read
    /// the still-pending choice and try again.
    pub fn perform(
        &mut self,
        actor: usize,
        option: OptionTag,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        let latest = self.latest();
        let choice = match validate(latest, actor, option, argument) {
            Ok(choice) => choice,
            Err(err) => {
                debug!(actor, %option, ?argument, error = %err, "rejected action");
                return Err(err.into());
            }
        };
        debug!(actor, action = %choice.action(), %option, ?argument, "perform");

        let prompt = choice.prompt.clone();
        let mut rng = self.rng.clone();
        let mut action = Action::begin(
            latest,
            actor,
            choice,
            option,
            argument,
            &self.config,
            &self.layout,
            &mut rng,
        );
        action.dispatch(prompt, option, argument)?;
        let snapshots = action.finish()?;

        self.rng = rng;
        self.states.extend(snapshots);
        Ok(())
    }
}

fn validate(
    state: &GameState,
    actor: usize,
    option: OptionTag,
    argument: Option<Argument>,
) -> Result<&Choice, ValidationError> {
    if state.winner.is_some() {
        return Err(ValidationError::GameFinished);
    }
    let player = state
        .players
        .get(actor)
        .ok_or(ValidationError::UnknownPlayer { player: actor })?;
    let choice = player
        .choice
        .as_ref()
        .ok_or(ValidationError::NoPendingChoice { player: actor })?;
    choice.validate(option, argument)?;
    Ok(choice)
}

/// Two independent six-sided dice.
pub fn roll_dice(rng: &mut impl Rng) -> (u8, u8) {
    (rng.gen_range(1..=6), rng.gen_range(1..=6))
}

pub fn full_deck() -> Vec<DevelopmentCard> {
    let mut deck = Vec::with_capacity(25);
    deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
    for card in [
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::Monopoly,
        DevelopmentCard::YearOfPlenty,
    ] {
        deck.extend([card, card]);
    }
    deck.extend(DevelopmentCard::VICTORY);
    deck
}
