//! Error types for configuration and game execution.

use thiserror::Error;

use super::player::PlayerId;

/// Invalid game configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Player count is zero or above the configured maximum.
    #[error("player count {count} must be between 1 and {max}")]
    PlayerCount { count: usize, max: usize },

    /// The game would play no rounds.
    #[error("a game must have at least one round")]
    ZeroRounds,
}

/// Errors raised while running a game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A draw found the deck empty.
    ///
    /// With discards recycled to the bottom of the deck this cannot happen;
    /// if it does, cards have leaked somewhere.
    #[error("conservation violation: the deck is empty, cannot draw a card")]
    DeckEmpty,

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread for {player}")]
    WorkerSpawn {
        player: PlayerId,
        #[source]
        source: std::io::Error,
    },

    /// The audit log sink could not be opened or written.
    #[error("audit log I/O failed: {0}")]
    Log(#[from] std::io::Error),
}

impl GameError {
    /// Whether this error means the card conservation invariant was broken.
    #[must_use]
    pub fn is_conservation_violation(&self) -> bool {
        matches!(self, GameError::DeckEmpty)
    }
}

/// Result alias for game operations.
pub type Result<T> = std::result::Result<T, GameError>;
