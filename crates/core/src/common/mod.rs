//! Common types shared by every part of the scheduler.
//!
//! This module provides the fundamental vocabulary of the C64x datapath:
//! 1. **Constants:** Unit counts, side counts, and issue limits.
//! 2. **Datapath:** Sides, functional unit kinds, concrete units, and cross paths.
//! 3. **Error Handling:** Fatal scheduling errors and configuration errors.

/// Datapath-wide constants.
pub mod constants;

/// Side, unit, and cross-path definitions.
pub mod datapath;

/// Error types.
pub mod error;

pub use constants::{CROSS_PATHS, MAX_ISSUE_WIDTH, SIDES, UNITS};
pub use datapath::{CrossPath, FunctionalUnit, Side, UnitKind};
pub use error::{ConfigError, SchedError};
