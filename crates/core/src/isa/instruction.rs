//! Machine Instructions.
//!
//! A [`MachineInst`] pairs a static [`InstDesc`] with its operands. Flexible
//! instructions (unit not hard-wired, side-selectable encoding) carry a trailing
//! immediate *format field* encoding the chosen unit and the cross-path bit:
//!
//! ```text
//!   format = unit_kind << 1 | path_bit
//! ```
//!
//! For memory accesses the path bit selects `T2` over `T1`; for everything else it
//! marks use of the `X` data path. The scheduler only ever rewrites the path bit.

use serde::Deserialize;

use super::operand::Operand;
use super::reg::Reg;
use crate::common::{SchedError, Side, UnitKind};

/// Mask of the cross-path bit in a format field.
pub const PATH_BIT: i64 = 0x1;

/// Static resource attributes of an opcode.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct InstDesc {
    /// Assembly mnemonic.
    pub name: String,
    /// Encoded unit kind; authoritative when `unit_fixed` is set.
    pub unit: UnitKind,
    /// Unit is hard-wired in the opcode.
    pub unit_fixed: bool,
    /// Issuing side.
    pub side: Side,
    /// Opcode has a side-selectable encoding.
    pub side_inst: bool,
    /// Load or store.
    pub mem_access: bool,
    /// Store (only meaningful with `mem_access`).
    pub store: bool,
    /// Call instruction.
    pub call: bool,
    /// Accepts a predicate.
    pub predicable: bool,
    /// Register-to-register move, scheduled against the shared move budget.
    pub is_move: bool,
    /// Pseudo instruction with no encoding; never occupies resources.
    pub pseudo: bool,
}

impl InstDesc {
    /// True if the unit is chosen through the format field rather than the opcode.
    ///
    /// Calls and explicitly side-locked opcodes are never flexible.
    #[inline]
    pub const fn is_flexible(&self) -> bool {
        !self.unit_fixed && self.side_inst
    }
}

/// Execution predicate `[reg]` or `[!reg]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Predicate {
    /// Predicate register.
    pub reg: Reg,
    /// Execute when the register is zero.
    #[serde(default)]
    pub negated: bool,
}

/// A machine instruction in the scheduling region.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MachineInst {
    /// Static attributes.
    pub desc: InstDesc,
    /// Operands in encoding order; flexible instructions end with the format field.
    #[serde(default)]
    pub operands: Vec<Operand>,
    /// Optional execution predicate.
    #[serde(default)]
    pub predicate: Option<Predicate>,
}

impl MachineInst {
    /// Creates an unpredicated instruction.
    pub const fn new(desc: InstDesc, operands: Vec<Operand>) -> Self {
        Self {
            desc,
            operands,
            predicate: None,
        }
    }

    /// Mnemonic, for diagnostics.
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Operand at `idx`.
    pub fn operand(&self, idx: usize) -> Option<&Operand> {
        self.operands.get(idx)
    }

    /// Raw value of the trailing format field.
    pub fn format_field(&self) -> Result<i64, SchedError> {
        match self.operands.last() {
            Some(Operand::Immediate(v)) => Ok(*v),
            _ => Err(SchedError::MissingFormatOperand(self.desc.name.clone())),
        }
    }

    /// Unit kind selected by the format field.
    pub fn format_unit(&self) -> Result<UnitKind, SchedError> {
        UnitKind::try_from(self.format_field()? >> 1)
    }

    /// Cross-path bit of the format field.
    pub fn path_bit(&self) -> Result<bool, SchedError> {
        Ok(self.format_field()? & PATH_BIT != 0)
    }

    /// Writes the cross-path bit, leaving every other bit of the field untouched.
    ///
    /// Returns `true` if the field changed.
    pub fn set_path_bit(&mut self, set: bool) -> Result<bool, SchedError> {
        let name = &self.desc.name;
        let Some(Operand::Immediate(field)) = self.operands.last_mut() else {
            return Err(SchedError::MissingFormatOperand(name.clone()));
        };
        let new = (*field & !PATH_BIT) | i64::from(set);
        let changed = new != *field;
        *field = new;
        Ok(changed)
    }
}
