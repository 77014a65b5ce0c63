//! Datapath Constants.
//!
//! Fixed properties of the C64x core that the hazard model is built on.

/// Number of functional units per side (`.L`, `.S`, `.M`, `.D`).
pub const UNITS: usize = 4;

/// Number of datapath sides (A and B).
pub const SIDES: usize = 2;

/// Number of cross-path resources (`T1`, `T2`, `X1`, `X2`).
pub const CROSS_PATHS: usize = 4;

/// Maximum number of instructions in one execute packet.
pub const MAX_ISSUE_WIDTH: usize = UNITS * SIDES;

/// Number of general-purpose registers in each side's register file.
pub const REGS_PER_SIDE: u8 = 32;
