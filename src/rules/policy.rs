//! Per-turn decision rule.
//!
//! A player whose hand already holds the greasy value wins without
//! drawing. Otherwise they draw up to capacity and then win, discard (hand
//! is full without the greasy value) or pass.

use crate::cards::Card;
use crate::core::HAND_SIZE;

/// What the acting player does after the draw step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDecision {
    /// Hand holds the greasy value.
    Win,
    /// Hand is full without the greasy value: discard one card at random
    /// and eat chips.
    Discard,
    /// Hand is below capacity without the greasy value.
    Pass,
}

/// Should the player draw before deciding?
#[must_use]
pub fn needs_draw(hand: &[Card], greasy_value: u8) -> bool {
    hand.len() < HAND_SIZE && !hand.iter().any(|c| c.value() == greasy_value)
}

/// Decide a turn from the post-draw hand.
#[must_use]
pub fn decide(hand: &[Card], greasy_value: u8) -> TurnDecision {
    if hand.iter().any(|c| c.value() == greasy_value) {
        TurnDecision::Win
    } else if hand.len() >= HAND_SIZE {
        TurnDecision::Discard
    } else {
        TurnDecision::Pass
    }
}
