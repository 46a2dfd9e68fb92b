//! # greasy-card
//!
//! A multithreaded simulation of the Greasy Card elimination game.
//!
//! Each player runs on its own OS thread, and players act strictly one at a
//! time by passing a turn token through a mutex/condvar monitor. The draw
//! pile, the chip bag and the audit log are shared between threads, each
//! behind its own lock.
//!
//! ## Rules
//!
//! At the start of each round the dealer draws the *greasy card* and every
//! player is dealt one card. On their turn a player draws up to two cards;
//! holding a card of the greasy value wins the round. A full hand without
//! it forces a random discard to the bottom of the deck and a penalty of
//! one to five chips from the shared bag. The dealer rotates every round and
//! the game lasts one round per player.
//!
//! ## Example
//!
//! ```
//! use greasy_card::{AuditLog, GameConfig, RoundCoordinator};
//!
//! let config = GameConfig::new(42, 3, 10);
//! let mut game = RoundCoordinator::new(config, AuditLog::in_memory()).unwrap();
//! let summary = game.run().unwrap();
//!
//! assert_eq!(summary.rounds.len(), 3);
//! assert!(summary.rounds.iter().all(|r| r.winner.is_some()));
//! ```
//!
//! ## Modules
//!
//! - `core`: player ids and records, RNG, configuration, errors
//! - `cards`: cards and their display tokens
//! - `zones`: the shared deck
//! - `chips`: the shared chip bag
//! - `audit`: the game's event log
//! - `rules`: the turn gate and the per-turn rule
//! - `engine`: workers and the round coordinator

pub mod audit;
pub mod cards;
pub mod chips;
pub mod core;
pub mod engine;
pub mod rules;
pub mod zones;

pub use crate::audit::{AuditLog, GameEvent};
pub use crate::cards::{value_token, Card, Suit, DECK_SIZE};
pub use crate::chips::ChipBank;
pub use crate::core::{
    ConfigError, GameConfig, GameError, GameRng, Player, PlayerId, PlayerMap, HAND_SIZE,
};
pub use crate::engine::{
    GameContext, GameSummary, PlayerWorker, RoundCoordinator, RoundPhase, RoundReport,
    WorkerReport,
};
pub use crate::rules::{RoundClosed, TurnDecision, TurnGate, TurnPermit};
pub use crate::zones::{DeckShuffler, DeckStore};
