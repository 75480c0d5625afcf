//! Driver matching core for the delivery marketplace.
//!
//! The engine in [`matching`] ranks candidate drivers for a delivery request and
//! either proposes a ranked list or picks a single driver for auto-assignment.
//! It is a pure computation: the surrounding modules supply candidates
//! ([`directory`]), wire ports to the engine ([`dispatch`]) and hold the tunable
//! policy ([`config`], [`pricing`], [`eta`]).

pub mod candidate;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod eta;
pub mod matching;
pub mod pricing;
pub mod spatial;
pub mod vehicle;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
