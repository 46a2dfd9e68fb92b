//! Turn-passing monitor.
//!
//! A `TurnGate` holds the turn token together with the round number, the
//! dealer and whether the round is still open, all under one mutex. Workers
//! block in [`TurnGate::wait_for_turn`] until the token names them, act
//! while holding the returned [`TurnPermit`], and pass the token on with
//! [`TurnPermit::hand_off`]. Every change wakes all waiters; each waiter
//! re-checks its predicate, so spurious wakes are harmless.
//!
//! ## Example
//!
//! ```
//! use greasy_card::core::PlayerId;
//! use greasy_card::rules::TurnGate;
//!
//! let gate = TurnGate::new();
//! gate.begin_round(1, PlayerId::new(2));
//!
//! let permit = gate.wait_for_turn(PlayerId::new(2)).unwrap();
//! permit.hand_off(PlayerId::new(1));
//! assert_eq!(gate.holder(), PlayerId::new(1));
//!
//! let permit = gate.wait_for_turn(PlayerId::new(1)).unwrap();
//! permit.close_round();
//! assert_eq!(gate.winner(), Some(PlayerId::new(1)));
//! assert!(gate.wait_for_turn(PlayerId::new(2)).is_err());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::core::PlayerId;

/// Returned by [`TurnGate::wait_for_turn`] once the round is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("round closed")]
pub struct RoundClosed;

#[derive(Debug)]
struct TurnState {
    holder: PlayerId,
    round: u32,
    dealer: PlayerId,
    open: bool,
    winner: Option<PlayerId>,
    turns: Vec<PlayerId>,
}

/// Monitor granting the act phase to one player at a time.
#[derive(Debug)]
pub struct TurnGate {
    state: Mutex<TurnState>,
    turn_changed: Condvar,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Default for TurnGate {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnGate {
    /// Create a closed gate. Call [`begin_round`](Self::begin_round) before
    /// any worker waits on it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TurnState {
                holder: PlayerId::new(1),
                round: 0,
                dealer: PlayerId::new(1),
                open: false,
                winner: None,
                turns: Vec::new(),
            }),
            turn_changed: Condvar::new(),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TurnState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a round with the dealer holding the turn.
    ///
    /// Only the coordinator calls this, between rounds.
    pub fn begin_round(&self, round: u32, dealer: PlayerId) {
        let mut state = self.lock();
        state.holder = dealer;
        state.round = round;
        state.dealer = dealer;
        state.open = true;
        state.winner = None;
        state.turns.clear();
        self.turn_changed.notify_all();
    }

    /// Give the turn to `player` and wake every waiter.
    pub fn set_turn(&self, player: PlayerId) {
        self.lock().holder = player;
        self.turn_changed.notify_all();
    }

    /// Block until `player` holds the turn.
    ///
    /// Returns `Err(RoundClosed)` if the round closes first.
    pub fn wait_for_turn(&self, player: PlayerId) -> Result<TurnPermit<'_>, RoundClosed> {
        let state = self.lock();
        let mut state = self
            .turn_changed
            .wait_while(state, |s| s.open && s.holder != player)
            .unwrap_or_else(PoisonError::into_inner);
        if !state.open {
            return Err(RoundClosed);
        }
        state.turns.push(player);
        drop(state);

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        Ok(TurnPermit {
            gate: self,
            player,
            released: false,
        })
    }

    /// Close the round without a winner and wake every waiter.
    pub fn abort_round(&self) {
        let mut state = self.lock();
        if state.open {
            log::warn!("round {} aborted", state.round);
        }
        state.open = false;
        self.turn_changed.notify_all();
    }

    fn close_with_winner(&self, winner: PlayerId) {
        let mut state = self.lock();
        state.open = false;
        state.winner = Some(winner);
        self.turn_changed.notify_all();
    }

    #[must_use]
    pub fn holder(&self) -> PlayerId {
        self.lock().holder
    }

    /// Current round number (0 before the first round).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.lock().round
    }

    #[must_use]
    pub fn dealer(&self) -> PlayerId {
        self.lock().dealer
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Winner of the current round, once it has closed with one.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.lock().winner
    }

    /// Players who were granted a turn this round, in order.
    #[must_use]
    pub fn turn_order(&self) -> Vec<PlayerId> {
        self.lock().turns.clone()
    }

    /// Players currently inside their act phase.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously active players ever observed.
    #[must_use]
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// Proof that a player holds the turn.
///
/// Dropping a permit without handing off or closing the round (an error
/// path or a panic) aborts the round, so no waiter is left blocked.
#[derive(Debug)]
#[must_use = "dropping a permit aborts the round"]
pub struct TurnPermit<'g> {
    gate: &'g TurnGate,
    player: PlayerId,
    released: bool,
}

impl TurnPermit<'_> {
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Round this turn belongs to.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.gate.round()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.gate.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// End this turn and give the token to `next`.
    pub fn hand_off(mut self, next: PlayerId) {
        self.release();
        self.gate.set_turn(next);
    }

    /// End this turn as the round's winner.
    pub fn close_round(mut self) {
        self.release();
        self.gate.close_with_winner(self.player);
    }
}

impl Drop for TurnPermit<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.release();
            log::warn!("{} dropped the turn without handing off", self.player);
            self.gate.abort_round();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_begin_round_gives_dealer_the_turn() {
        let gate = TurnGate::new();
        assert!(!gate.is_open());

        gate.begin_round(3, PlayerId::new(2));

        assert!(gate.is_open());
        assert_eq!(gate.holder(), PlayerId::new(2));
        assert_eq!(gate.round(), 3);
        assert_eq!(gate.dealer(), PlayerId::new(2));
        assert_eq!(gate.winner(), None);
    }

    #[test]
    fn test_closed_gate_rejects_waiters() {
        let gate = TurnGate::new();
        assert_eq!(gate.wait_for_turn(PlayerId::new(1)).unwrap_err(), RoundClosed);
    }

    #[test]
    fn test_waiter_blocks_until_handed_the_turn() {
        let gate = TurnGate::new();
        gate.begin_round(1, PlayerId::new(1));
        let (tx, rx) = mpsc::channel();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                let permit = gate.wait_for_turn(PlayerId::new(2)).unwrap();
                tx.send(permit.player()).unwrap();
                permit.close_round();
            });

            // Player 2 must still be waiting
            assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

            // Unrelated wake-ups do not release it
            gate.set_turn(PlayerId::new(3));
            assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

            gate.set_turn(PlayerId::new(2));
            assert_eq!(rx.recv().unwrap(), PlayerId::new(2));
        });

        assert_eq!(gate.winner(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_abort_wakes_all_waiters() {
        let gate = TurnGate::new();
        gate.begin_round(1, PlayerId::new(1));

        std::thread::scope(|scope| {
            let handles: Vec<_> = (2..=4)
                .map(|id| {
                    let gate = &gate;
                    scope.spawn(move || gate.wait_for_turn(PlayerId::new(id)).map(|p| p.player()))
                })
                .collect();

            std::thread::sleep(Duration::from_millis(20));
            gate.abort_round();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), Err(RoundClosed));
            }
        });
        assert_eq!(gate.winner(), None);
    }

    #[test]
    fn test_dropped_permit_aborts_round() {
        let gate = TurnGate::new();
        gate.begin_round(1, PlayerId::new(1));

        let permit = gate.wait_for_turn(PlayerId::new(1)).unwrap();
        assert_eq!(gate.active(), 1);
        drop(permit);

        assert_eq!(gate.active(), 0);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_round_robin_records_turns_and_single_actor() {
        let players = 4;
        let gate = TurnGate::new();
        gate.begin_round(1, PlayerId::new(3));

        std::thread::scope(|scope| {
            for id in PlayerId::all(players) {
                let gate = &gate;
                scope.spawn(move || {
                    let mut taken = 0;
                    while let Ok(permit) = gate.wait_for_turn(id) {
                        taken += 1;
                        if id == PlayerId::new(2) && taken == 3 {
                            permit.close_round();
                        } else {
                            permit.hand_off(id.next(players));
                        }
                    }
                });
            }
        });

        let order: Vec<u8> = gate.turn_order().iter().map(|p| p.0).collect();
        assert_eq!(order, vec![3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2]);
        assert_eq!(gate.winner(), Some(PlayerId::new(2)));
        assert_eq!(gate.max_active(), 1);
        assert_eq!(gate.active(), 0);
    }
}
