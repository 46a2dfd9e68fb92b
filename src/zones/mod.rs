//! Card locations shared between players.
//!
//! - `DeckStore`: the draw pile and set-aside pile, behind one lock
//! - `DeckShuffler`: permutation applied when the deck is rebuilt

pub mod deck;

pub use deck::{DeckShuffler, DeckStore};
