//! Datapath Topology.
//!
//! The C64x datapath is split into two symmetric sides, each with its own register
//! file and four functional units. This module defines:
//! 1. **Sides:** `A` and `B`, indexing register files and unit sets.
//! 2. **Unit Kinds:** `.L`, `.S`, `.M`, and `.D`, in instruction-encoding order.
//! 3. **Functional Units:** A `(kind, side)` pair with a stable diagnostic index.
//! 4. **Cross Paths:** The `T` (address) and `X` (data) paths between the sides.

use std::fmt;

use serde::Deserialize;

use super::constants::{SIDES, UNITS};
use super::error::SchedError;

/// One of the two halves of the datapath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
pub enum Side {
    /// Side A (units `*1`, registers `A0`-`A31`).
    #[default]
    A,
    /// Side B (units `*2`, registers `B0`-`B31`).
    B,
}

impl Side {
    /// Both sides in index order.
    pub const ALL: [Self; SIDES] = [Self::A, Self::B];

    /// Index of the side (A = 0, B = 1).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Side for a path bit of a format field (0 = A, 1 = B).
    #[inline]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::B } else { Self::A }
    }

    /// The other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Register-file prefix letter.
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }

    /// Suffix number used in unit names (`L1`, `L2`).
    pub const fn number(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Functional unit kind, in encoding order.
///
/// `.L`, `.S` and `.D` are the "LSD" units whose issue slots share a budget with
/// register moves; `.M` is the multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
pub enum UnitKind {
    /// Logical/arithmetic unit.
    #[default]
    L,
    /// Shift/branch unit.
    S,
    /// Multiply unit.
    M,
    /// Data (load/store address) unit.
    D,
}

impl UnitKind {
    /// All unit kinds in encoding order.
    pub const ALL: [Self; UNITS] = [Self::L, Self::S, Self::M, Self::D];

    /// Encoding index (L = 0, S = 1, M = 2, D = 3).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::L => 0,
            Self::S => 1,
            Self::M => 2,
            Self::D => 3,
        }
    }

    /// True for `.L`, `.S` and `.D`.
    #[inline]
    pub const fn is_lsd(self) -> bool {
        !matches!(self, Self::M)
    }

    /// Unit letter as printed in assembly.
    pub const fn letter(self) -> char {
        match self {
            Self::L => 'L',
            Self::S => 'S',
            Self::M => 'M',
            Self::D => 'D',
        }
    }
}

impl TryFrom<i64> for UnitKind {
    type Error = SchedError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::L),
            1 => Ok(Self::S),
            2 => Ok(Self::M),
            3 => Ok(Self::D),
            other => Err(SchedError::UnknownUnitIndex(other)),
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A concrete functional unit: a unit kind on a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionalUnit {
    /// Kind of unit.
    pub kind: UnitKind,
    /// Side the unit belongs to.
    pub side: Side,
}

impl FunctionalUnit {
    /// Creates a unit from its kind and side.
    pub const fn new(kind: UnitKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Stable index in `0..8`: `kind << 1 | side`.
    ///
    /// Orders units as `L1 L2 S1 S2 M1 M2 D1 D2`.
    #[inline]
    pub const fn index(self) -> usize {
        (self.kind.index() << 1) | self.side.index()
    }

    /// Inverse of [`FunctionalUnit::index`].
    pub fn from_index(index: usize) -> Result<Self, SchedError> {
        let kind = UnitKind::try_from((index >> 1) as i64)?;
        Ok(Self::new(kind, Side::from_bit(index & 1 == 1)))
    }
}

impl fmt::Display for FunctionalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.letter(), self.side.number())
    }
}

/// A cross-path resource. Absence of a cross path is `Option::None`.
///
/// `T1`/`T2` are the address paths used by loads and stores, `X1`/`X2` the data
/// paths used when a unit reads an operand from the opposite register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrossPath {
    /// Side-A memory path.
    T1,
    /// Side-B memory path.
    T2,
    /// Data path into side A.
    X1,
    /// Data path into side B.
    X2,
}

impl CrossPath {
    /// All cross paths in index order.
    pub const ALL: [Self; super::constants::CROSS_PATHS] = [Self::T1, Self::T2, Self::X1, Self::X2];

    /// Index in `0..4`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::T1 => 0,
            Self::T2 => 1,
            Self::X1 => 2,
            Self::X2 => 3,
        }
    }

    /// The data path serving units on `side`.
    #[inline]
    pub const fn data(side: Side) -> Self {
        match side {
            Side::A => Self::X1,
            Side::B => Self::X2,
        }
    }

    /// The memory path selected by a format field's path bit.
    #[inline]
    pub const fn address(bit: bool) -> Self {
        if bit { Self::T2 } else { Self::T1 }
    }

    /// True for `T1`/`T2`.
    pub const fn is_address(self) -> bool {
        matches!(self, Self::T1 | Self::T2)
    }

    /// Diagnostic name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::T1 => "T1",
            Self::T2 => "T2",
            Self::X1 => "X1",
            Self::X2 => "X2",
        }
    }
}

impl TryFrom<u8> for CrossPath {
    type Error = SchedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(SchedError::UnknownCrossPath(value))
    }
}

impl fmt::Display for CrossPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
