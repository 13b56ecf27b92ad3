pub mod config;
pub mod error;
pub mod game_state;
pub mod gameplay;

pub use config::{BotKind, GameOptions, SimulationConfig, SimulationFile};
pub use error::SimulationError;
pub use game_state::{GameState, Turn};
pub use gameplay::{run_game, MAX_ROUNDS};
