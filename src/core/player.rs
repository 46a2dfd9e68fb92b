//! Player identification, per-player storage and player records.
//!
//! ## PlayerId
//!
//! Player ids are the contiguous range `1..=player_count`. Turn hand-off
//! relies on this: the successor of `id` is `(id mod player_count) + 1`.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by a `Vec`, indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

use crate::cards::Card;

/// Maximum number of cards a hand may hold.
pub const HAND_SIZE: usize = 2;

/// Player identifier. The first player is `PlayerId(1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Zero-based storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// The player after this one in turn order.
    ///
    /// ```
    /// use greasy_card::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1).next(3), PlayerId::new(2));
    /// assert_eq!(PlayerId::new(3).next(3), PlayerId::new(1));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self((self.0 as usize % player_count) as u8 + 1)
    }

    /// Iterate over all player ids for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// A player's hand.
pub type Hand = SmallVec<[Card; HAND_SIZE]>;

/// A player record. Persists for the whole game; the hand is cleared at
/// the start of every round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub hand: Hand,
    /// Rounds this player won.
    pub wins: u32,
    /// Rounds this player lost.
    pub losses: u32,
    /// Cards discarded over the game.
    pub discards: u32,
    /// Chips eaten over the game.
    pub chips_eaten: u32,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_hand_full(&self) -> bool {
        self.hand.len() >= HAND_SIZE
    }

    /// Add a card. Panics if the hand is already full.
    pub fn take(&mut self, card: Card) {
        assert!(!self.is_hand_full(), "{} already holds {HAND_SIZE} cards", self.id);
        self.hand.push(card);
    }

    /// Remove and return the card at `index`, keeping the order of the rest.
    pub fn discard_at(&mut self, index: usize) -> Card {
        self.hand.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);
        let p2 = PlayerId::new(2);

        assert_eq!(p1.index(), 0);
        assert_eq!(p2.index(), 1);
        assert_eq!(format!("{}", p1), "Player 1");
    }

    #[test]
    fn test_player_id_all() {
        let players: Vec<_> = PlayerId::all(4).collect();
        assert_eq!(
            players,
            vec![PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)]
        );
    }

    #[test]
    fn test_next_wraps() {
        let order: Vec<_> = std::iter::successors(Some(PlayerId(2)), |p| Some(p.next(3)))
            .take(5)
            .collect();
        assert_eq!(
            order,
            vec![PlayerId(2), PlayerId(3), PlayerId(1), PlayerId(2), PlayerId(3)]
        );

        // Single player hands off to itself
        assert_eq!(PlayerId(1).next(1), PlayerId(1));
    }

    #[test]
    fn test_player_map_indexing() {
        let mut map: PlayerMap<u32> = PlayerMap::new(3, |p| u32::from(p.0) * 10);

        assert_eq!(map[PlayerId(1)], 10);
        assert_eq!(map[PlayerId(3)], 30);

        map[PlayerId(2)] = 7;
        assert_eq!(map[PlayerId(2)], 7);

        let pairs: Vec<_> = map.iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(pairs, vec![(PlayerId(1), 10), (PlayerId(2), 7), (PlayerId(3), 30)]);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<u32> = PlayerMap::new(0, |_| 0);
    }

    #[test]
    fn test_hand_operations() {
        let mut player = Player::new(PlayerId(1));
        player.take(Card::new(4, Suit::Clubs));
        assert!(!player.is_hand_full());
        player.take(Card::new(9, Suit::Hearts));
        assert!(player.is_hand_full());

        let card = player.discard_at(0);
        assert_eq!(card, Card::new(4, Suit::Clubs));
        assert_eq!(player.hand.as_slice(), &[Card::new(9, Suit::Hearts)]);
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn test_overfull_hand_panics() {
        let mut player = Player::new(PlayerId(1));
        for v in 1..=3 {
            player.take(Card::new(v, Suit::Spades));
        }
    }
}
