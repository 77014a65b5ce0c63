//! Bundle formation.
//!
//! Turns an ordered instruction stream into execute packets and hands the bundle
//! boundaries to a downstream consumer.
//! 1. **Packer:** Drives the hazard recognizer over the stream.
//! 2. **Sink:** The consumer contract and the collected [`Schedule`].

/// In-order bundle packer.
pub mod packer;

/// Bundle sink trait and collected schedule.
pub mod sink;

pub use packer::BundlePacker;
pub use sink::{Bundle, BundleSink, Schedule};
