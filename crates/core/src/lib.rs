//! TMS320C64x VLIW resource-hazard model.
//!
//! This crate decides, cycle by cycle, whether a machine instruction can join the
//! current execute packet on the two-sided C64x datapath. It provides:
//! 1. **Common:** Sides, functional units, cross paths, constants, and error types.
//! 2. **ISA:** The instruction attribute model consumed by the scheduler (registers,
//!    operands, descriptors, and the flexible-unit format field).
//! 3. **Hazard:** Per-cycle resource state, operand side classification, flexible
//!    resource resolution, and the hazard recognizer with its cycle controller.
//! 4. **Sched:** An in-order bundle packer and the downstream bundle sink contract.
//! 5. **Asm:** A bundle-aware assembly printer.
//! 6. **Configuration and statistics.**

/// Bundle-aware assembly printer.
pub mod asm;
/// Common types and constants (sides, units, cross paths, errors).
pub mod common;
/// Scheduler configuration (defaults and JSON loading).
pub mod config;
/// Resource state, classification, resolution, and hazard recognition.
pub mod hazard;
/// Instruction attribute model (registers, operands, descriptors).
pub mod isa;
/// In-order bundle packer and bundle sink contract.
pub mod sched;
/// Scheduling statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Fatal scheduling error.
pub use crate::common::SchedError;
/// The hazard recognizer and its verdict type.
pub use crate::hazard::{HazardRecognizer, HazardVerdict};
/// Machine instruction as seen by the scheduler.
pub use crate::isa::MachineInst;
/// Bundle packer and collected schedule.
pub use crate::sched::{BundlePacker, Schedule};
