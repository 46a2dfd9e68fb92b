//! Audit events and their log-line rendering.

use serde::{Deserialize, Serialize};

use crate::cards::{value_token, Card};
use crate::core::PlayerId;

/// Something that happened during a game, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted { round: u32, dealer: PlayerId },
    GreasyCardDrawn { dealer: PlayerId, card: Card },
    CardDrawn { player: PlayerId, card: Card },
    /// Hand snapshot. `greasy` is set when the hand is shown as a winner.
    HandShown {
        player: PlayerId,
        hand: Vec<Card>,
        greasy: Option<Card>,
    },
    CardDiscarded { player: PlayerId, card: Card },
    /// Deck contents, bottom first.
    DeckContents { cards: Vec<Card> },
    ChipsEaten { player: PlayerId, amount: u32 },
    BagOpened { bag: u32 },
    BagLevel { remaining: u32 },
    RoundWon { player: PlayerId, round: u32 },
    RoundLost { player: PlayerId, round: u32 },
    RoundAborted { round: u32 },
    RoundEnded { round: u32, dealer: PlayerId },
    GameCompleted { rounds: u32 },
}

fn join_cards(cards: &[Card], sep: &str) -> String {
    cards
        .iter()
        .map(|c| value_token(c.value()))
        .collect::<Vec<_>>()
        .join(sep)
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::RoundStarted { dealer, .. } => write!(f, "Player {}: Round starts", dealer.0),
            GameEvent::GreasyCardDrawn { dealer, card } => {
                write!(f, "Player {}: draws Greasy card {card}", dealer.0)
            }
            GameEvent::CardDrawn { player, card } => write!(f, "PLAYER {}: draws {card}", player.0),
            GameEvent::HandShown { player, hand, greasy } => {
                write!(f, "PLAYER {}: hand {}", player.0, join_cards(hand, ","))?;
                if let Some(greasy) = greasy {
                    write!(f, " <> Greasy card is {greasy}")?;
                }
                Ok(())
            }
            GameEvent::CardDiscarded { player, card } => {
                write!(f, "PLAYER {}: discards {card} at random", player.0)
            }
            GameEvent::DeckContents { cards } => write!(f, "DECK: {}", join_cards(cards, " ")),
            GameEvent::ChipsEaten { player, amount } => {
                write!(f, "PLAYER {}: eats {amount} chips", player.0)
            }
            GameEvent::BagOpened { .. } => f.write_str("New bag of chips opened"),
            GameEvent::BagLevel { remaining } => write!(f, "BAG: {remaining} Chips left"),
            GameEvent::RoundWon { player, round } => {
                write!(f, "PLAYER {}: wins round {round}", player.0)
            }
            GameEvent::RoundLost { player, round } => {
                write!(f, "PLAYER {}: lost round {round}", player.0)
            }
            GameEvent::RoundAborted { round } => write!(f, "Round {round} aborted"),
            GameEvent::RoundEnded { dealer, .. } => write!(f, "Player {}: Round ends", dealer.0),
            GameEvent::GameCompleted { rounds } => write!(f, "Game completed after {rounds} rounds."),
        }
    }
}
