//! Turn discipline and the per-turn rule.
//!
//! - `TurnGate`: who may act, plus the round's lock-guarded counters
//! - `policy`: what the acting player does with their hand

pub mod policy;
pub mod turn_gate;

pub use policy::{decide, needs_draw, TurnDecision};
pub use turn_gate::{RoundClosed, TurnGate, TurnPermit};
