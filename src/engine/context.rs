//! Shared game resources.

use crate::audit::AuditLog;
use crate::chips::ChipBank;
use crate::core::{GameConfig, GameRng, Result};
use crate::rules::TurnGate;
use crate::zones::{DeckShuffler, DeckStore};

/// Everything the coordinator and the workers share for one game.
///
/// Owned by the [`RoundCoordinator`](super::RoundCoordinator) and lent by
/// reference to each round's workers. Each resource guards itself with its
/// own lock.
#[derive(Debug)]
pub struct GameContext {
    pub config: GameConfig,
    pub deck: DeckStore,
    pub chips: ChipBank,
    pub log: AuditLog,
    pub gate: TurnGate,
}

impl GameContext {
    /// Build the resources for a validated config, shuffling with the
    /// game's own seeded stream.
    pub fn new(config: GameConfig, log: AuditLog) -> Result<Self> {
        let shuffler = GameRng::new(config.seed).for_context("deck");
        Self::with_shuffler(config, log, shuffler)
    }

    /// Build the resources with a custom deck permutation.
    pub fn with_shuffler(
        config: GameConfig,
        log: AuditLog,
        shuffler: impl DeckShuffler + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let root = GameRng::new(config.seed);
        Ok(Self {
            deck: DeckStore::new(shuffler, config.recycle_discards),
            chips: ChipBank::new(
                config.chips_per_bag,
                config.max_chips_per_eat,
                root.for_context("chips"),
            ),
            log,
            gate: TurnGate::new(),
            config,
        })
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }
}
