//! Game engine: shared context, per-round player workers and the round
//! coordinator.
//!
//! High-level entry point: [`RoundCoordinator::run`].

pub mod context;
pub mod coordinator;
pub mod worker;

pub use context::GameContext;
pub use coordinator::{GameSummary, RoundCoordinator, RoundPhase, RoundReport};
pub use worker::{PlayerWorker, WorkerReport};
