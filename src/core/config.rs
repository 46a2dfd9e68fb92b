//! Game configuration.
//!
//! The process takes three inputs (seed, player count, chips per bag);
//! everything else has a default matching the classic game.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default upper bound on the number of players.
pub const DEFAULT_MAX_PLAYERS: usize = 10;

/// Default upper bound on chips eaten per penalty.
pub const DEFAULT_MAX_CHIPS_PER_EAT: u32 = 5;

/// Configuration for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for every random stream in the game.
    pub seed: u64,

    /// Number of players (ids `1..=player_count`).
    pub player_count: usize,

    /// Chips in a freshly opened bag.
    pub chips_per_bag: u32,

    /// Upper bound on `player_count`.
    pub max_players: usize,

    /// Rounds to play. `None` plays one round per player.
    pub total_rounds: Option<u32>,

    /// Upper bound of the random chip penalty (lower bound is 1).
    pub max_chips_per_eat: u32,

    /// Return discarded cards to the bottom of the deck.
    ///
    /// Disabling this sets discards aside instead, so the deck eventually
    /// runs dry.
    pub recycle_discards: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            player_count: 2,
            chips_per_bag: 30,
            max_players: DEFAULT_MAX_PLAYERS,
            total_rounds: None,
            max_chips_per_eat: DEFAULT_MAX_CHIPS_PER_EAT,
            recycle_discards: true,
        }
    }
}

impl GameConfig {
    /// Create a config from the three process inputs.
    pub fn new(seed: u64, player_count: usize, chips_per_bag: u32) -> Self {
        Self {
            seed,
            player_count,
            chips_per_bag,
            ..Self::default()
        }
    }

    pub fn with_total_rounds(mut self, rounds: u32) -> Self {
        self.total_rounds = Some(rounds);
        self
    }

    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    pub fn with_max_chips_per_eat(mut self, max: u32) -> Self {
        self.max_chips_per_eat = max;
        self
    }

    pub fn with_recycle_discards(mut self, recycle: bool) -> Self {
        self.recycle_discards = recycle;
        self
    }

    /// Rounds this game will play.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.total_rounds.unwrap_or(self.player_count as u32)
    }

    /// Check the player count and round count.
    ///
    /// The chip counts are not range-checked: an empty bag size simply
    /// means every penalty opens a new, empty bag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.max_players.min(255);
        if self.player_count == 0 || self.player_count > max {
            return Err(ConfigError::PlayerCount {
                count: self.player_count,
                max,
            });
        }
        if self.rounds() == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.max_players, 10);
        assert_eq!(config.max_chips_per_eat, 5);
        assert!(config.recycle_discards);
        assert_eq!(config.rounds(), 2);
    }

    #[test]
    fn test_rounds_follow_player_count() {
        let config = GameConfig::new(1, 4, 10);
        assert_eq!(config.rounds(), 4);

        let config = config.with_total_rounds(9);
        assert_eq!(config.rounds(), 9);
    }

    #[test]
    fn test_validate_player_count() {
        assert!(GameConfig::new(1, 1, 10).validate().is_ok());
        assert!(GameConfig::new(1, 10, 10).validate().is_ok());

        assert_eq!(
            GameConfig::new(1, 0, 10).validate(),
            Err(ConfigError::PlayerCount { count: 0, max: 10 })
        );
        assert_eq!(
            GameConfig::new(1, 11, 10).validate(),
            Err(ConfigError::PlayerCount { count: 11, max: 10 })
        );
        assert!(GameConfig::new(1, 11, 10).with_max_players(12).validate().is_ok());
    }

    #[test]
    fn test_validate_rounds() {
        let config = GameConfig::new(1, 3, 10).with_total_rounds(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRounds));
    }

    #[test]
    fn test_chip_counts_not_range_checked() {
        assert!(GameConfig::new(1, 2, 0).validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::new(99, 3, 7).with_recycle_discards(false);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
