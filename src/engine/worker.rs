//! Per-round player task.

use serde::{Deserialize, Serialize};

use crate::audit::GameEvent;
use crate::cards::Card;
use crate::core::{GameRng, Player, PlayerId, Result};
use crate::rules::{decide, needs_draw, TurnDecision};

use super::context::GameContext;

/// What one worker did during its round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub player: PlayerId,
    pub turns: u32,
    pub discards: u32,
    pub chips_eaten: u32,
    pub won: bool,
}

/// One player's decision loop for a single round.
///
/// The worker borrows its player record mutably, so nothing else can
/// touch the hand until the worker has been joined.
pub struct PlayerWorker<'a> {
    ctx: &'a GameContext,
    player: &'a mut Player,
    greasy: Card,
    rng: GameRng,
}

impl<'a> PlayerWorker<'a> {
    pub fn new(ctx: &'a GameContext, player: &'a mut Player, greasy: Card, rng: GameRng) -> Self {
        Self {
            ctx,
            player,
            greasy,
            rng,
        }
    }

    /// Take turns until the round closes.
    ///
    /// An error (the deck ran dry) aborts the round for every player,
    /// because the turn permit is dropped without a hand-off.
    pub fn run(mut self) -> Result<WorkerReport> {
        let ctx = self.ctx;
        let id = self.player.id;
        let next = id.next(ctx.player_count());
        let mut report = WorkerReport {
            player: id,
            ..WorkerReport::default()
        };

        while let Ok(permit) = ctx.gate.wait_for_turn(id) {
            report.turns += 1;
            match self.take_turn(permit.round(), &mut report)? {
                TurnDecision::Win => {
                    report.won = true;
                    permit.close_round();
                    break;
                }
                TurnDecision::Discard | TurnDecision::Pass => permit.hand_off(next),
            }
        }

        Ok(report)
    }

    fn take_turn(&mut self, round: u32, report: &mut WorkerReport) -> Result<TurnDecision> {
        let id = self.player.id;
        let greasy = self.greasy.value();
        let ctx = self.ctx;

        if needs_draw(&self.player.hand, greasy) {
            let card = ctx.deck.draw()?;
            self.player.take(card);
            ctx.log.record(GameEvent::CardDrawn { player: id, card });
        }

        let decision = decide(&self.player.hand, greasy);
        log::debug!("round {round}: {id} holds {:?} -> {decision:?}", self.player.hand.as_slice());

        match decision {
            TurnDecision::Win => {
                self.player.wins += 1;
                let mut events = vec![
                    GameEvent::HandShown {
                        player: id,
                        hand: self.player.hand.to_vec(),
                        greasy: Some(self.greasy),
                    },
                    GameEvent::RoundWon { player: id, round },
                ];
                events.extend(
                    PlayerId::all(ctx.player_count())
                        .filter(|&p| p != id)
                        .map(|player| GameEvent::RoundLost { player, round }),
                );
                ctx.log.record_all(events);
                log::info!("round {round}: {id} wins with greasy card {}", self.greasy);
            }
            TurnDecision::Discard => {
                let index = self.rng.gen_range(0..self.player.hand.len());
                // Back in the deck before anything else can fail
                let card = self.player.discard_at(index);
                ctx.deck.discard_to_bottom(card);

                ctx.log.record(GameEvent::CardDiscarded { player: id, card });
                ctx.log.record(GameEvent::HandShown {
                    player: id,
                    hand: self.player.hand.to_vec(),
                    greasy: None,
                });
                ctx.log.record(GameEvent::DeckContents {
                    cards: ctx.deck.snapshot(),
                });

                let eaten = ctx.chips.eat(id, &ctx.log);
                self.player.discards += 1;
                self.player.chips_eaten += eaten;
                report.discards += 1;
                report.chips_eaten += eaten;
            }
            TurnDecision::Pass => {}
        }

        Ok(decision)
    }
}
