//! Machine Operands.
//!
//! Operands form a closed sum type so that every consumer matches exhaustively; there
//! is no "unknown operand" fallback.

use serde::Deserialize;

use super::reg::Reg;

/// A machine instruction operand.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Register use or definition.
    Register {
        /// The register.
        reg: Reg,
        /// True if the operand is written.
        #[serde(default)]
        def: bool,
        /// True if the operand is implicit (not encoded).
        #[serde(default)]
        implicit: bool,
    },
    /// Immediate value.
    Immediate(i64),
    /// Basic block label.
    BasicBlock(String),
    /// Global variable or function address.
    GlobalAddress(String),
    /// External symbol name.
    ExternalSymbol(String),
    /// Jump table index.
    JumpTableIndex(u32),
}

impl Operand {
    /// Register read.
    pub const fn reg_use(reg: Reg) -> Self {
        Self::Register {
            reg,
            def: false,
            implicit: false,
        }
    }

    /// Register write.
    pub const fn reg_def(reg: Reg) -> Self {
        Self::Register {
            reg,
            def: true,
            implicit: false,
        }
    }

    /// The register, if this is a register operand.
    pub const fn as_reg(&self) -> Option<Reg> {
        match self {
            Self::Register { reg, .. } => Some(*reg),
            _ => None,
        }
    }

    /// The value, if this is an immediate operand.
    pub const fn as_imm(&self) -> Option<i64> {
        match self {
            Self::Immediate(v) => Some(*v),
            _ => None,
        }
    }
}
