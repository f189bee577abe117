#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod coords;
pub mod game;
pub mod persistence;
pub mod players;
pub mod types;
pub mod view;

pub use board::{BoardLayout, MapType, Topology};
pub use game::{Argument, Choice, Game, GameConfig, GameError, GameState, ValidationError};
pub use persistence::PersistenceError;
pub use types::{ActionTag, DevelopmentCard, OptionTag, Resource};
pub use view::{GameView, StateView};
