//! Audit log: the game's record of every deal, draw, discard, penalty and
//! round outcome.
//!
//! - `GameEvent`: one loggable event, rendered as a single text line
//! - `AuditLog`: mutex-serialized append-only sink plus in-memory history

pub mod events;
pub mod journal;

pub use events::GameEvent;
pub use journal::AuditLog;
