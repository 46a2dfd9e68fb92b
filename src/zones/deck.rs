//! Mutex-guarded draw pile.
//!
//! The deck is a `VecDeque` with the top at the back and the bottom at the
//! front, so both drawing and discarding to the bottom are O(1). Cards out
//! of play for the round (the greasy card, and discards when recycling is
//! off) sit in a set-aside pile so that, at every point the lock is
//! released,
//!
//! ```text
//! deck + set_aside + cards in hands == 52
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cards::{Card, DECK_SIZE};
use crate::core::{GameError, GameRng, Result};

/// Permutation applied to a freshly rebuilt deck.
pub trait DeckShuffler: Send {
    /// Reorder `cards` in place. Index 0 is the bottom, the last index the top.
    fn shuffle(&mut self, cards: &mut [Card]);
}

impl DeckShuffler for GameRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        GameRng::shuffle(self, cards);
    }
}

struct Pile {
    cards: VecDeque<Card>,
    set_aside: Vec<Card>,
    shuffler: Box<dyn DeckShuffler>,
}

/// Shared draw pile.
pub struct DeckStore {
    pile: Mutex<Pile>,
    recycle_discards: bool,
}

impl DeckStore {
    /// Create a full, unshuffled deck.
    pub fn new(shuffler: impl DeckShuffler + 'static, recycle_discards: bool) -> Self {
        Self {
            pile: Mutex::new(Pile {
                cards: Card::full_deck().into(),
                set_aside: Vec::new(),
                shuffler: Box::new(shuffler),
            }),
            recycle_discards,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pile> {
        self.pile.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and return the top card.
    ///
    /// An empty deck means the conservation invariant was broken.
    pub fn draw(&self) -> Result<Card> {
        self.lock().cards.pop_back().ok_or(GameError::DeckEmpty)
    }

    /// Draw the top card and set it aside for the rest of the round.
    pub fn draw_set_aside(&self) -> Result<Card> {
        let mut pile = self.lock();
        let card = pile.cards.pop_back().ok_or(GameError::DeckEmpty)?;
        pile.set_aside.push(card);
        Ok(card)
    }

    /// Put a discarded card at the bottom of the deck, or set it aside when
    /// recycling is disabled.
    pub fn discard_to_bottom(&self, card: Card) {
        let mut pile = self.lock();
        if self.recycle_discards {
            pile.cards.push_front(card);
        } else {
            pile.set_aside.push(card);
        }
    }

    /// Restore all 52 cards and shuffle them.
    ///
    /// Must only run between rounds, while no worker can draw.
    pub fn shuffle_and_reset(&self) {
        let mut pile = self.lock();
        let mut cards = Card::full_deck();
        pile.shuffler.shuffle(&mut cards);
        pile.cards = cards.into();
        pile.set_aside.clear();
    }

    /// Cards left to draw.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn set_aside_len(&self) -> usize {
        self.lock().set_aside.len()
    }

    /// Deck contents, bottom first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Card> {
        self.lock().cards.iter().copied().collect()
    }

    /// Check `deck + set_aside + in_hands == 52` in one observation.
    #[must_use]
    pub fn conserved(&self, in_hands: usize) -> bool {
        let pile = self.lock();
        pile.cards.len() + pile.set_aside.len() + in_hands == DECK_SIZE
    }
}

impl std::fmt::Debug for DeckStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pile = self.lock();
        f.debug_struct("DeckStore")
            .field("cards", &pile.cards.len())
            .field("set_aside", &pile.set_aside.len())
            .field("recycle_discards", &self.recycle_discards)
            .finish()
    }
}
