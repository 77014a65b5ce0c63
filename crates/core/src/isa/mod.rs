//! Instruction attribute model.
//!
//! The scheduler treats instructions as opaque except for the resource attributes
//! declared in their descriptors and the sides of their register operands. This module
//! provides:
//! 1. **Registers:** Physical `A`/`B` registers and unallocated virtual registers.
//! 2. **Operands:** A closed sum type over every operand shape the backend produces.
//! 3. **Instructions:** Descriptors, predicates, and the flexible-unit format field.

/// Machine instructions, descriptors, and the format field.
pub mod instruction;

/// Operand sum type.
pub mod operand;

/// Register names and sides.
pub mod reg;

pub use instruction::{InstDesc, MachineInst, PATH_BIT, Predicate};
pub use operand::Operand;
pub use reg::Reg;
