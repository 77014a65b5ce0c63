//! Error Definitions.
//!
//! Every failure in the scheduler core is an internal-consistency violation: malformed
//! instruction metadata from an earlier pass, or a driver breaking the call protocol.
//! None of them are retryable; they are reported to the caller and abort the pass.
//! 1. **`SchedError`:** Fatal conditions raised by classification, resolution, packing,
//!    and printing.
//! 2. **`ConfigError`:** Failures while loading or validating a [`Config`](crate::Config).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::MAX_ISSUE_WIDTH;

/// Fatal scheduling error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchedError {
    /// A virtual register appeared where its datapath side must be known.
    #[error("{inst}: virtual register %v{vreg} where a physical register is required")]
    VirtualRegister {
        /// Mnemonic of the offending instruction.
        inst: String,
        /// Virtual register number.
        vreg: u32,
    },

    /// A flexible instruction lacks its trailing immediate format operand.
    #[error("{0}: flexible instruction has no trailing format operand")]
    MissingFormatOperand(String),

    /// A unit index outside `0..4` was decoded.
    #[error("unknown functional unit index {0}")]
    UnknownUnitIndex(i64),

    /// A cross-path index outside `0..4` was queried.
    #[error("unknown cross-path index {0}")]
    UnknownCrossPath(u8),

    /// A move without a register destination and a register source.
    #[error("{0}: move needs a defined register destination and a register source")]
    MalformedMove(String),

    /// A load or store whose side-determining operand has the wrong shape.
    #[error("{inst}: {detail}")]
    MalformedMemoryAccess {
        /// Mnemonic of the offending instruction.
        inst: String,
        /// What was expected.
        detail: &'static str,
    },

    /// A memory access whose unit is hard-wired; loads and stores must be flexible.
    #[error("{0}: memory access on a fixed-unit instruction")]
    FixedMemoryAccess(String),

    /// A `prolog` pseudo instruction without an immediate frame size.
    #[error("{0}: frame setup needs an immediate frame size")]
    MalformedFrame(String),

    /// An instruction hazarded against an empty cycle.
    #[error("{0}: hazard in an empty cycle")]
    Unschedulable(String),

    /// A register name that does not parse.
    #[error("invalid register name `{0}`")]
    InvalidRegister(String),
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON for the schema.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// `sched.issue_width` is zero or larger than an execute packet.
    #[error("issue width {0} outside 1..={max}", max = MAX_ISSUE_WIDTH)]
    IssueWidth(usize),
}
