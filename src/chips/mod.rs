//! Chip reserve eaten from as a discard penalty.

pub mod bank;

pub use bank::ChipBank;
