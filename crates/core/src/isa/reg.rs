//! Register Names.
//!
//! After register allocation every register operand names a physical register in the
//! A or B file; the side of that file is what the cross-path model reasons about.
//! Virtual registers are representable so that malformed input can be diagnosed
//! rather than silently assigned a side.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::constants::REGS_PER_SIDE;
use crate::common::{SchedError, Side};

/// A register operand value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Reg {
    /// Physical register `A0`-`A31` or `B0`-`B31`.
    Phys {
        /// Register file.
        side: Side,
        /// Register number within the file.
        num: u8,
    },
    /// Unallocated virtual register.
    Virtual(u32),
}

impl Reg {
    /// Physical register `A<num>`.
    pub const fn a(num: u8) -> Self {
        Self::Phys { side: Side::A, num }
    }

    /// Physical register `B<num>`.
    pub const fn b(num: u8) -> Self {
        Self::Phys { side: Side::B, num }
    }

    /// Side of a physical register, `None` for virtual registers.
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Phys { side, .. } => Some(side),
            Self::Virtual(_) => None,
        }
    }

    /// Side of the register, or a fatal error naming `inst` if it is virtual.
    pub fn require_side(self, inst: &str) -> Result<Side, SchedError> {
        match self {
            Self::Phys { side, .. } => Ok(side),
            Self::Virtual(vreg) => Err(SchedError::VirtualRegister {
                inst: inst.to_owned(),
                vreg,
            }),
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phys { side, num } => write!(f, "{side}{num}"),
            Self::Virtual(n) => write!(f, "%v{n}"),
        }
    }
}

impl FromStr for Reg {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedError::InvalidRegister(s.to_owned());

        if let Some(n) = s.strip_prefix("%v") {
            if !is_canonical_number(n) {
                return Err(invalid());
            }
            return n.parse().map(Self::Virtual).map_err(|_| invalid());
        }

        let mut chars = s.chars();
        let side = match chars.next() {
            Some('A' | 'a') => Side::A,
            Some('B' | 'b') => Side::B,
            _ => return Err(invalid()),
        };
        let digits = chars.as_str();
        if !is_canonical_number(digits) {
            return Err(invalid());
        }
        let num: u8 = digits.parse().map_err(|_| invalid())?;
        if num >= REGS_PER_SIDE {
            return Err(invalid());
        }
        Ok(Self::Phys { side, num })
    }
}

/// Plain decimal digits without sign or leading zero (`0` itself is allowed).
fn is_canonical_number(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits.len() == 1 || !digits.starts_with('0'))
}

impl TryFrom<String> for Reg {
    type Error = SchedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
