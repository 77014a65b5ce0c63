//! Resource Classification.
//!
//! Pure functions that read an instruction's static attributes and operand sides to
//! decide which unit it issues on and which cross path it needs. Nothing here touches
//! the resource state or rewrites the instruction.

use tracing::trace;

use crate::common::{CrossPath, FunctionalUnit, SchedError, Side};
use crate::isa::{InstDesc, MachineInst, Operand};

/// Number of leading operands inspected for cross-path use.
const SIDE_OPERANDS: usize = 3;

/// Sides of the register operands an instruction reads or writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperandSides {
    /// Two inspected register operands live on different sides.
    pub mixed: bool,
    /// Side of the first register operand, if there is one.
    pub uniform: Option<Side>,
}

impl OperandSides {
    /// True if an instruction issuing on `side` must read across the data path.
    #[inline]
    pub fn needs_data_path(self, side: Side) -> bool {
        self.mixed || self.uniform.is_some_and(|s| s != side)
    }
}

/// True if the unit and side are chosen during scheduling.
#[inline]
pub const fn is_flexible(desc: &InstDesc) -> bool {
    desc.is_flexible()
}

/// True for loads and stores.
#[inline]
pub const fn is_memory_access(desc: &InstDesc) -> bool {
    desc.mem_access
}

/// Inspects the first three operands and reports whether their register sides agree.
///
/// Scanning stops at the first disagreement.
///
/// # Arguments
///
/// * `inst` - The instruction whose register operands are inspected. Immediates and
///   other non-register operands are skipped.
///
/// # Returns
///
/// An [`OperandSides`] with `mixed` set when two registers disagree, and `uniform`
/// holding the side of the first register seen.
///
/// # Errors
///
/// [`SchedError::VirtualRegister`] if an inspected register has no side yet.
pub fn analyze_operand_sides(inst: &MachineInst) -> Result<OperandSides, SchedError> {
    let mut sides = OperandSides::default();

    for (idx, op) in inst.operands.iter().take(SIDE_OPERANDS).enumerate() {
        let Some(reg) = op.as_reg() else {
            continue;
        };
        let side = reg.require_side(inst.name())?;
        match sides.uniform {
            None => sides.uniform = Some(side),
            Some(first) if first != side => {
                trace!(inst = inst.name(), operand = idx, "operand side differs from previous");
                sides.mixed = true;
                break;
            }
            Some(_) => {}
        }
    }
    Ok(sides)
}

/// The unit an instruction issues on.
///
/// Fixed instructions name it in the descriptor; flexible ones in the format field.
pub fn functional_unit(inst: &MachineInst) -> Result<FunctionalUnit, SchedError> {
    let kind = if is_flexible(&inst.desc) {
        inst.format_unit()?
    } else {
        inst.desc.unit
    };
    Ok(FunctionalUnit::new(kind, inst.desc.side))
}

/// The cross path an instruction claims, given its current format field.
///
/// For flexible instructions this reads the path bit, so it reflects whatever the
/// resolver last committed.
///
/// # Arguments
///
/// * `inst` - A non-move instruction. Flexible instructions must carry their format
///   field.
///
/// # Returns
///
/// `T1`/`T2` for a memory access, the data path into the issuing side when operands
/// cross, and `None` for calls and same-side operations.
///
/// # Errors
///
/// [`SchedError::FixedMemoryAccess`] for a load or store with a hard-wired unit, or
/// any error from reading the format field or the operand sides.
pub fn cross_path(inst: &MachineInst) -> Result<Option<CrossPath>, SchedError> {
    let desc = &inst.desc;

    if !is_flexible(desc) {
        if is_memory_access(desc) {
            return Err(SchedError::FixedMemoryAccess(desc.name.clone()));
        }
        if desc.call {
            return Ok(None);
        }
        let path = analyze_operand_sides(inst)?
            .needs_data_path(desc.side)
            .then_some(CrossPath::data(desc.side));
        if let Some(p) = path {
            trace!(inst = inst.name(), xuse = %p, "x-resource use for fixed op");
        }
        return Ok(path);
    }

    let bit = inst.path_bit()?;
    if is_memory_access(desc) {
        return Ok(Some(CrossPath::address(bit)));
    }
    Ok(bit.then_some(CrossPath::data(desc.side)))
}

/// Destination side and cross path of a register move.
///
/// A move crossing sides claims the data path into the destination side.
///
/// # Arguments
///
/// * `inst` - A move whose operand 0 is the defined destination register and operand 1
///   the source register.
///
/// # Returns
///
/// The destination side, and `Some` data path when the source lives on the other side.
///
/// # Errors
///
/// [`SchedError::MalformedMove`] if either register operand is missing, or
/// [`SchedError::VirtualRegister`] if one has no side.
pub fn analyze_move(inst: &MachineInst) -> Result<(Side, Option<CrossPath>), SchedError> {
    let malformed = || SchedError::MalformedMove(inst.name().to_owned());

    let dst = match inst.operand(0) {
        Some(Operand::Register { reg, def: true, .. }) => *reg,
        _ => return Err(malformed()),
    };
    let src = inst.operand(1).and_then(Operand::as_reg).ok_or_else(malformed)?;

    let dst_side = dst.require_side(inst.name())?;
    let src_side = src.require_side(inst.name())?;
    let path = (src_side != dst_side).then_some(CrossPath::data(dst_side));

    trace!(inst = inst.name(), src = %src_side, dst = %dst_side, "mv sides");
    Ok((dst_side, path))
}
