//! Round lifecycle.
//!
//! ```text
//! AwaitingStart ──> InRound ──> RoundEnding ──> AwaitingStart (next round)
//!                                          └──> GameComplete
//! ```
//!
//! - **AwaitingStart → InRound**: reshuffle the deck, draw the greasy card,
//!   deal one card to every player, give the dealer the turn.
//! - **InRound → RoundEnding**: spawn one worker per player in a thread
//!   scope and join them all once a winner closes the round.
//! - **RoundEnding**: rotate the dealer, advance the round, and either start
//!   again or finish the game and release the log sink.

use std::thread;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditLog, GameEvent};
use crate::cards::Card;
use crate::core::{GameConfig, GameError, GameRng, Player, PlayerId, PlayerMap, Result};
use crate::zones::DeckShuffler;

use super::context::GameContext;
use super::worker::{PlayerWorker, WorkerReport};

/// Where the coordinator is in the round lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingStart,
    InRound { greasy: Card },
    RoundEnding { greasy: Card, winner: Option<PlayerId> },
    GameComplete,
}

/// Outcome of one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub dealer: PlayerId,
    pub greasy: Card,
    /// `None` if the round was aborted.
    pub winner: Option<PlayerId>,
    /// Every turn granted, in order.
    pub turn_order: Vec<PlayerId>,
    pub discards: u32,
    pub chips_eaten: u32,
}

/// Outcome of a whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub rounds: Vec<RoundReport>,
    pub players: Vec<Player>,
    pub bags_used: u32,
    pub chips_left: u32,
}

/// Owns the players and shared resources and drives rounds to completion.
#[derive(Debug)]
pub struct RoundCoordinator {
    ctx: GameContext,
    players: PlayerMap<Player>,
    phase: RoundPhase,
    round: u32,
    dealer: PlayerId,
    player_rng: GameRng,
    pending: Option<RoundReport>,
    reports: Vec<RoundReport>,
}

impl RoundCoordinator {
    /// Validate the config and create every shared resource.
    pub fn new(config: GameConfig, log: AuditLog) -> Result<Self> {
        Ok(Self::from_context(GameContext::new(config, log)?))
    }

    /// Like [`new`](Self::new), with a custom deck permutation.
    pub fn with_shuffler(
        config: GameConfig,
        log: AuditLog,
        shuffler: impl DeckShuffler + 'static,
    ) -> Result<Self> {
        Ok(Self::from_context(GameContext::with_shuffler(config, log, shuffler)?))
    }

    fn from_context(ctx: GameContext) -> Self {
        let player_rng = GameRng::new(ctx.config.seed).for_context("players");
        Self {
            players: PlayerMap::new(ctx.player_count(), Player::new),
            phase: RoundPhase::AwaitingStart,
            round: 1,
            dealer: PlayerId::new(1),
            player_rng,
            pending: None,
            reports: Vec::new(),
            ctx,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Current round number; one past the last round once complete.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn dealer(&self) -> PlayerId {
        self.dealer
    }

    #[must_use]
    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn reports(&self) -> &[RoundReport] {
        &self.reports
    }

    /// Cards held across all hands.
    #[must_use]
    pub fn cards_in_hands(&self) -> usize {
        self.players.values().map(|p| p.hand.len()).sum()
    }

    /// `deck + set_aside + hands == 52`.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.ctx.deck.conserved(self.cards_in_hands())
    }

    /// Play every remaining round.
    ///
    /// On error the current round is aborted and the log sink released
    /// before the error is returned.
    pub fn run(&mut self) -> Result<GameSummary> {
        while self.phase != RoundPhase::GameComplete {
            if let Err(err) = self.step() {
                log::error!("game stopped in round {}: {err}", self.round);
                self.ctx.gate.abort_round();
                if let Err(close_err) = self.ctx.log.close() {
                    log::warn!("failed to flush audit log: {close_err}");
                }
                return Err(err);
            }
        }
        Ok(self.summary())
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> Result<RoundPhase> {
        self.phase = match self.phase {
            RoundPhase::AwaitingStart => {
                let greasy = self.start_round()?;
                RoundPhase::InRound { greasy }
            }
            RoundPhase::InRound { greasy } => {
                let winner = self.play_round(greasy)?;
                RoundPhase::RoundEnding { greasy, winner }
            }
            RoundPhase::RoundEnding { .. } => self.end_round()?,
            RoundPhase::GameComplete => RoundPhase::GameComplete,
        };
        Ok(self.phase)
    }

    fn start_round(&mut self) -> Result<Card> {
        let (round, dealer) = (self.round, self.dealer);
        let ctx = &self.ctx;
        log::info!("round {round} of {} starts, dealer {dealer}", ctx.config.rounds());
        ctx.log.record(GameEvent::RoundStarted { round, dealer });

        ctx.deck.shuffle_and_reset();
        let greasy = ctx.deck.draw_set_aside()?;
        ctx.log.record(GameEvent::GreasyCardDrawn { dealer, card: greasy });

        for (_, player) in self.players.iter_mut() {
            player.hand.clear();
        }
        for (id, player) in self.players.iter_mut() {
            let card = ctx.deck.draw()?;
            player.take(card);
            ctx.log.record(GameEvent::CardDrawn { player: id, card });
        }
        debug_assert!(self.is_conserved(), "cards leaked while dealing");

        self.ctx.gate.begin_round(round, dealer);
        Ok(greasy)
    }

    fn play_round(&mut self, greasy: Card) -> Result<Option<PlayerId>> {
        let ctx = &self.ctx;
        let rngs: Vec<GameRng> = self.players.iter().map(|_| self.player_rng.fork()).collect();
        let workers: Vec<(PlayerId, PlayerWorker<'_>)> = self
            .players
            .iter_mut()
            .zip(rngs)
            .map(|((id, player), rng)| (id, PlayerWorker::new(ctx, player, greasy, rng)))
            .collect();

        let (spawn_error, joined) = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers.len());
            let mut spawn_error = None;

            for (id, worker) in workers {
                let spawned = thread::Builder::new()
                    .name(format!("player-{}", id.0))
                    .spawn_scoped(scope, move || worker.run());
                match spawned {
                    Ok(handle) => handles.push((id, handle)),
                    Err(source) => {
                        // Release the workers already waiting on the gate
                        ctx.gate.abort_round();
                        spawn_error = Some(GameError::WorkerSpawn { player: id, source });
                        break;
                    }
                }
            }

            let joined: Vec<_> = handles
                .into_iter()
                .map(|(id, handle)| (id, handle.join()))
                .collect();
            (spawn_error, joined)
        });

        if let Some(err) = spawn_error {
            return Err(err);
        }

        let mut reports: Vec<WorkerReport> = Vec::with_capacity(joined.len());
        let mut failure = None;
        for (id, outcome) in joined {
            match outcome {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(err)) => {
                    log::error!("{id} failed: {err}");
                    failure.get_or_insert(err);
                }
                Err(_) => log::error!("worker thread for {id} panicked"),
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let winner = self.ctx.gate.winner();
        match winner {
            Some(winner) => {
                for (id, player) in self.players.iter_mut() {
                    if id != winner {
                        player.losses += 1;
                    }
                }
            }
            None => {
                log::warn!("round {} ended without a winner", self.round);
                self.ctx.log.record(GameEvent::RoundAborted { round: self.round });
            }
        }

        self.pending = Some(RoundReport {
            round: self.round,
            dealer: self.dealer,
            greasy,
            winner,
            turn_order: self.ctx.gate.turn_order(),
            discards: reports.iter().map(|r| r.discards).sum(),
            chips_eaten: reports.iter().map(|r| r.chips_eaten).sum(),
        });
        Ok(winner)
    }

    fn end_round(&mut self) -> Result<RoundPhase> {
        self.ctx.log.record(GameEvent::RoundEnded {
            round: self.round,
            dealer: self.dealer,
        });
        if let Some(report) = self.pending.take() {
            self.reports.push(report);
        }

        self.dealer = self.dealer.next(self.ctx.player_count());
        self.round += 1;

        let total = self.ctx.config.rounds();
        if self.round <= total {
            return Ok(RoundPhase::AwaitingStart);
        }

        log::info!("game completed after {total} rounds");
        self.ctx.log.record(GameEvent::GameCompleted { rounds: total });
        self.ctx.log.close()?;
        Ok(RoundPhase::GameComplete)
    }

    /// Results so far.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            config: self.ctx.config.clone(),
            rounds: self.reports.clone(),
            players: self.players.values().cloned().collect(),
            bags_used: self.ctx.chips.bags_used(),
            chips_left: self.ctx.chips.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator(players: usize, seed: u64) -> RoundCoordinator {
        RoundCoordinator::new(GameConfig::new(seed, players, 5), AuditLog::in_memory()).unwrap()
    }

    #[test]
    fn test_phases_advance_in_order() {
        let mut coord = coordinator(2, 7);
        assert_eq!(coord.phase(), RoundPhase::AwaitingStart);

        let phase = coord.step().unwrap();
        let RoundPhase::InRound { greasy } = phase else {
            panic!("expected InRound, got {phase:?}");
        };
        assert!(coord.context().gate.is_open());
        assert_eq!(coord.context().gate.holder(), PlayerId::new(1));

        let phase = coord.step().unwrap();
        assert!(matches!(
            phase,
            RoundPhase::RoundEnding { greasy: g, winner: Some(_) } if g == greasy
        ));

        assert_eq!(coord.step().unwrap(), RoundPhase::AwaitingStart);
        assert_eq!(coord.round(), 2);
        assert_eq!(coord.dealer(), PlayerId::new(2));
    }

    #[test]
    fn test_deal_gives_one_card_each() {
        let mut coord = coordinator(4, 3);
        coord.step().unwrap();

        for player in coord.players().values() {
            assert_eq!(player.hand.len(), 1);
        }
        assert_eq!(coord.context().deck.len(), 52 - 1 - 4);
        assert_eq!(coord.context().deck.set_aside_len(), 1);
        assert!(coord.is_conserved());

        let lines = coord.context().log.lines();
        assert_eq!(lines[0], "Player 1: Round starts");
        assert!(lines[1].starts_with("Player 1: draws Greasy card "));
        for (i, line) in lines[2..6].iter().enumerate() {
            assert!(line.starts_with(&format!("PLAYER {}: draws ", i + 1)));
        }
    }

    #[test]
    fn test_dealer_rotates_each_round() {
        let mut coord = coordinator(3, 11);
        let summary = coord.run().unwrap();

        let dealers: Vec<u8> = summary.rounds.iter().map(|r| r.dealer.0).collect();
        assert_eq!(dealers, vec![1, 2, 3]);
        assert_eq!(coord.phase(), RoundPhase::GameComplete);
        assert_eq!(coord.round(), 4);
    }

    #[test]
    fn test_complete_game_is_idle() {
        let mut coord = coordinator(1, 1);
        coord.run().unwrap();

        assert_eq!(coord.step().unwrap(), RoundPhase::GameComplete);
        assert_eq!(coord.reports().len(), 1);
    }

    #[test]
    fn test_tallies_match_reports() {
        let mut coord = coordinator(3, 21);
        let summary = coord.run().unwrap();

        let wins: u32 = summary.players.iter().map(|p| p.wins).sum();
        let losses: u32 = summary.players.iter().map(|p| p.losses).sum();
        assert_eq!(wins, 3);
        assert_eq!(losses, 3 * 2);

        let discards: u32 = summary.players.iter().map(|p| p.discards).sum();
        assert_eq!(discards, summary.rounds.iter().map(|r| r.discards).sum::<u32>());
    }
}
