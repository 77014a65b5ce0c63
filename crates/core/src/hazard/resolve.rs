//! Flexible Resource Resolution.
//!
//! Instructions whose unit is not hard-wired get their cross-path usage decided at
//! scheduling time and committed into the path bit of their format field:
//! 1. **Loads/Stores:** The bit follows the side of the store's data register or the
//!    load's destination register, selecting the `T1` or `T2` memory path.
//! 2. **Everything else:** The bit is set when the operand sides are mixed or differ
//!    from the issuing side, i.e. when the `X` data path is needed.
//!
//! Resolution is idempotent: it depends only on the instruction's descriptor and
//! operands, never on the current resource state.

use tracing::debug;

use super::classify::{analyze_operand_sides, is_flexible, is_memory_access};
use crate::common::{SchedError, Side};
use crate::isa::{MachineInst, Operand};

/// Operand holding the data register of a store.
const STORE_DATA_OPERAND: usize = 2;
/// Operand holding the destination register of a load.
const LOAD_DEST_OPERAND: usize = 0;

/// Decides the cross-path bit of a flexible instruction and writes it.
///
/// Fixed instructions are left untouched.
///
/// # Arguments
///
/// * `inst` - The instruction to resolve. Loads select `T2` when their destination is on
///   side B, stores when their data register is. Other flexible instructions set the bit
///   when an operand lives on the opposite side.
///
/// # Errors
///
/// [`SchedError::MalformedMemoryAccess`] when the side-selecting operand of a load or
/// store has the wrong shape, or any error from reading operand sides or the format field.
pub fn fix_resources(inst: &mut MachineInst) -> Result<(), SchedError> {
    if !is_flexible(&inst.desc) {
        return Ok(());
    }

    let set = if is_memory_access(&inst.desc) {
        memory_side(inst)? == Side::B
    } else {
        analyze_operand_sides(inst)?.needs_data_path(inst.desc.side)
    };
    set_cross_path(inst, set).map(drop)
}

/// Side of the register that selects a memory access's path.
fn memory_side(inst: &MachineInst) -> Result<Side, SchedError> {
    let malformed = |detail: &'static str| SchedError::MalformedMemoryAccess {
        inst: inst.name().to_owned(),
        detail,
    };

    let reg = if inst.desc.store {
        match inst.operand(STORE_DATA_OPERAND) {
            Some(Operand::Register { reg, def: false, .. }) => *reg,
            _ => return Err(malformed("store operand 2 must be a register use")),
        }
    } else {
        match inst.operand(LOAD_DEST_OPERAND) {
            Some(Operand::Register {
                reg,
                def: true,
                implicit: false,
            }) => *reg,
            _ => return Err(malformed("load operand 0 must be an explicit register def")),
        }
    };
    reg.require_side(inst.name())
}

/// Writes the path bit of a flexible instruction's format field.
///
/// # Arguments
///
/// * `inst` - The instruction whose format field is rewritten.
/// * `set` - The new path bit.
///
/// # Returns
///
/// `true` if the field changed. Fixed instructions are refused, left as-is, and
/// report `false`.
///
/// # Errors
///
/// [`SchedError::MissingFormatOperand`] if a flexible instruction has no format field.
pub fn set_cross_path(inst: &mut MachineInst, set: bool) -> Result<bool, SchedError> {
    if !is_flexible(&inst.desc) {
        debug!(inst = inst.name(), "cannot set XPATH, fixed instruction");
        return Ok(false);
    }

    let changed = inst.set_path_bit(set)?;
    if changed {
        debug!(inst = inst.name(), "XPATH set to: {}", u8::from(set));
    }
    Ok(changed)
}
