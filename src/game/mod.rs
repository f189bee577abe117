mod action;
pub mod choice;
pub mod game;
pub mod players;
pub mod resources;
mod rules;
pub mod state;

pub use choice::{Argument, Choice, ChoiceOption, Prompt};
pub use game::{Game, GameConfig, full_deck, roll_dice};
pub use players::PlayerState;
pub use rules::DISCARD_THRESHOLD;
pub use resources::{COST_CAMP, COST_CARD, COST_FORT, COST_ROAD, ResourceBundle, ResourceError};
pub use state::{GameError, GameState, ValidationError};
