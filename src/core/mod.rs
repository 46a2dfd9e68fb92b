//! Core types: players, RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, DEFAULT_MAX_CHIPS_PER_EAT, DEFAULT_MAX_PLAYERS};
pub use error::{ConfigError, GameError, Result};
pub use player::{Hand, Player, PlayerId, PlayerMap, HAND_SIZE};
pub use rng::GameRng;
