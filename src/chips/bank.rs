//! Shared chip reserve.
//!
//! The refill check, the clamp and the debit for one penalty happen inside
//! a single critical section, so two callers can never both open a new bag
//! or eat the same chips.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::audit::{AuditLog, GameEvent};
use crate::core::{GameRng, PlayerId};

struct ChipBag {
    remaining: u32,
    bags_used: u32,
    rng: GameRng,
}

/// The bag of chips players eat from as a discard penalty.
pub struct ChipBank {
    bag: Mutex<ChipBag>,
    capacity: u32,
    max_per_eat: u32,
}

impl ChipBank {
    /// Create a bank with the first bag already open and full.
    pub fn new(capacity: u32, max_per_eat: u32, rng: GameRng) -> Self {
        Self {
            bag: Mutex::new(ChipBag {
                remaining: capacity,
                bags_used: 1,
                rng,
            }),
            capacity,
            max_per_eat: max_per_eat.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChipBag> {
        self.bag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Eat a random number of chips in `1..=max_per_eat`.
    ///
    /// An empty bag is replaced by a full one first; the amount is clamped
    /// to what the bag holds. Returns the chips actually eaten.
    pub fn eat(&self, player: PlayerId, log: &AuditLog) -> u32 {
        let mut bag = self.lock();
        let wanted = bag.rng.gen_range(1..=self.max_per_eat);

        let mut events = Vec::with_capacity(4);
        if bag.remaining == 0 {
            bag.remaining = self.capacity;
            bag.bags_used += 1;
            log::debug!("opening bag {} for {player}", bag.bags_used);
            events.push(GameEvent::BagOpened { bag: bag.bags_used });
            events.push(GameEvent::BagLevel { remaining: bag.remaining });
        }

        let eaten = wanted.min(bag.remaining);
        bag.remaining -= eaten;

        events.push(GameEvent::ChipsEaten { player, amount: eaten });
        events.push(GameEvent::BagLevel { remaining: bag.remaining });
        log.record_all(events);

        eaten
    }

    /// Chips left in the open bag.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.lock().remaining
    }

    /// Bags opened so far, including the first.
    #[must_use]
    pub fn bags_used(&self) -> u32 {
        self.lock().bags_used
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl std::fmt::Debug for ChipBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bag = self.lock();
        f.debug_struct("ChipBank")
            .field("remaining", &bag.remaining)
            .field("bags_used", &bag.bags_used)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(bank: &ChipBank, log: &AuditLog) {
        while bank.remaining() > 0 {
            bank.eat(PlayerId::new(1), log);
        }
    }

    #[test]
    fn test_eat_within_bounds() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(1000, 5, GameRng::new(1));

        for _ in 0..100 {
            let eaten = bank.eat(PlayerId::new(1), &log);
            assert!((1..=5).contains(&eaten));
        }
        assert_eq!(bank.bags_used(), 1);
    }

    #[test]
    fn test_eat_clamps_to_remaining() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(3, 5, GameRng::new(9));

        let mut total = 0;
        while bank.remaining() > 0 {
            total += bank.eat(PlayerId::new(2), &log);
        }

        assert_eq!(total, 3);
        assert_eq!(bank.bags_used(), 1);
    }

    #[test]
    fn test_refill_when_empty() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(5, 5, GameRng::new(42));
        drain(&bank, &log);
        assert_eq!(bank.bags_used(), 1);

        let before = log.len();
        let eaten = bank.eat(PlayerId::new(1), &log);

        assert_eq!(bank.bags_used(), 2);
        assert_eq!(bank.remaining(), 5 - eaten);

        let new = &log.events()[before..];
        assert_eq!(new[0], GameEvent::BagOpened { bag: 2 });
        assert_eq!(new[1], GameEvent::BagLevel { remaining: 5 });
        let refills = new
            .iter()
            .filter(|e| matches!(e, GameEvent::BagOpened { .. }))
            .count();
        assert_eq!(refills, 1);
    }

    #[test]
    fn test_no_refill_while_chips_remain() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(50, 5, GameRng::new(3));

        bank.eat(PlayerId::new(1), &log);

        assert!(log
            .events()
            .iter()
            .all(|e| !matches!(e, GameEvent::BagOpened { .. })));
    }

    #[test]
    fn test_zero_capacity_bag() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(0, 5, GameRng::new(3));

        assert_eq!(bank.eat(PlayerId::new(1), &log), 0);
        assert_eq!(bank.eat(PlayerId::new(1), &log), 0);
        assert_eq!(bank.bags_used(), 3);
    }

    #[test]
    fn test_concurrent_eaters_never_overspend() {
        let log = AuditLog::in_memory();
        let bank = ChipBank::new(7, 5, GameRng::new(11));

        std::thread::scope(|scope| {
            for id in 1..=4u8 {
                let (bank, log) = (&bank, &log);
                scope.spawn(move || {
                    for _ in 0..25 {
                        bank.eat(PlayerId::new(id), log);
                    }
                });
            }
        });

        let eaten: u32 = log
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ChipsEaten { amount, .. } => Some(*amount),
                _ => None,
            })
            .sum();
        let opened = bank.bags_used();

        // Every chip eaten came out of some opened bag
        assert_eq!(eaten, opened * 7 - bank.remaining());
    }
}
