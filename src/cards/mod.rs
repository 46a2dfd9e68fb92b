//! Playing cards.

pub mod card;

pub use card::{value_token, Card, Suit, DECK_SIZE, MAX_VALUE, MIN_VALUE};
