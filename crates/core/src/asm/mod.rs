//! Assembly output.
//!
//! Consumes the bundle boundaries produced by the packer and prints them as
//! parallel-marked C64x assembly.

/// Bundle-aware assembly printer.
pub mod printer;

pub use printer::AsmPrinter;
