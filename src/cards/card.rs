//! Playing cards and their display tokens.
//!
//! A `Card` is an immutable value/suit pair. The game only ever compares
//! values (the greasy card matches on value regardless of suit), so suits
//! exist to keep the 52 cards distinct.

use serde::{Deserialize, Serialize};

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Lowest card value (Ace).
pub const MIN_VALUE: u8 = 1;

/// Highest card value (King).
pub const MAX_VALUE: u8 = 13;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in deck-building order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// A playing card with value in `1..=13`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    value: u8,
    suit: Suit,
}

impl Card {
    /// Create a card.
    ///
    /// Panics if `value` is outside `1..=13`.
    #[must_use]
    pub fn new(value: u8, suit: Suit) -> Self {
        assert!(
            (MIN_VALUE..=MAX_VALUE).contains(&value),
            "Card value must be in 1..=13, got {value}"
        );
        Self { value, suit }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.value
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.suit
    }

    /// Build the 52 cards in suit-major order: every value of Hearts,
    /// then Diamonds, Clubs, Spades.
    ///
    /// ```
    /// use greasy_card::cards::{Card, Suit, DECK_SIZE};
    ///
    /// let deck = Card::full_deck();
    /// assert_eq!(deck.len(), DECK_SIZE);
    /// assert_eq!(deck[0], Card::new(1, Suit::Hearts));
    /// assert_eq!(deck[51], Card::new(13, Suit::Spades));
    /// ```
    #[must_use]
    pub fn full_deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| (MIN_VALUE..=MAX_VALUE).map(move |value| Card { value, suit }))
            .collect()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&value_token(self.value))
    }
}

/// Display token for a card value: `A`, `J`, `Q`, `K`, otherwise decimal.
#[must_use]
pub fn value_token(value: u8) -> String {
    match value {
        1 => "A".to_string(),
        11 => "J".to_string(),
        12 => "Q".to_string(),
        13 => "K".to_string(),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_tokens() {
        assert_eq!(value_token(1), "A");
        assert_eq!(value_token(2), "2");
        assert_eq!(value_token(10), "10");
        assert_eq!(value_token(11), "J");
        assert_eq!(value_token(12), "Q");
        assert_eq!(value_token(13), "K");
    }

    #[test]
    fn test_full_deck_is_distinct() {
        let deck = Card::full_deck();
        let unique: HashSet<_> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);

        for suit in Suit::ALL {
            let count = deck.iter().filter(|c| c.suit() == suit).count();
            assert_eq!(count, 13);
        }
    }

    #[test]
    fn test_display_uses_value_only() {
        assert_eq!(Card::new(1, Suit::Spades).to_string(), "A");
        assert_eq!(Card::new(7, Suit::Hearts).to_string(), "7");
    }

    #[test]
    #[should_panic(expected = "Card value must be in 1..=13")]
    fn test_invalid_value_panics() {
        let _ = Card::new(14, Suit::Clubs);
    }

    #[test]
    fn test_serialization() {
        let card = Card::new(12, Suit::Diamonds);
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
