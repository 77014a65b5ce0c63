//! VLIW resource-conflict hazard model.
//!
//! Decides whether a candidate instruction can join the execute packet being built,
//! given the functional units, cross paths, and move budget already committed this
//! cycle. It is organised leaves first:
//! 1. **State:** Per-cycle occupancy of units, cross paths, and the move budget.
//! 2. **Classify:** Pure unit/cross-path classification from instruction attributes.
//! 3. **Resolve:** Commits the cross-path choice of flexible instructions.
//! 4. **Recognizer:** The hazard decision, booking, and cycle advance.

/// Operand side analysis and unit/cross-path classification.
pub mod classify;

/// Hazard recognizer and cycle controller.
pub mod recognizer;

/// Flexible resource resolution.
pub mod resolve;

/// Per-cycle resource state.
pub mod state;

pub use classify::OperandSides;
pub use recognizer::{Conflict, HazardRecognizer, HazardVerdict, ResourceClaim};
pub use state::ResourceState;
