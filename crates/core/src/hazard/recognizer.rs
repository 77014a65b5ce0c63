//! Hazard Recognizer and Cycle Controller.
//!
//! The recognizer is driven by a scheduler in the strict sequence
//! `classify` → (`emit_instruction` | `advance_cycle`) per candidate. It owns the only
//! mutable scheduling state, a [`ResourceState`], and:
//! 1. **Resolves** a candidate into a [`ResourceClaim`] (rewriting the path bit of
//!    flexible instructions).
//! 2. **Checks** the claim against the current cycle, yielding a [`HazardVerdict`].
//! 3. **Books** the claim once the scheduler places the instruction.
//! 4. **Advances** to a fresh cycle when a bundle boundary is forced.
//!
//! Committed instructions are never rolled back; backtracking belongs to the driver.

use std::fmt;

use tracing::debug;

use super::classify::{analyze_move, cross_path, functional_unit};
use super::resolve::fix_resources;
use super::state::ResourceState;
use crate::common::{CrossPath, FunctionalUnit, SchedError, Side};
use crate::isa::MachineInst;
use crate::stats::SchedStats;

/// Outcome of classifying a candidate against the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardVerdict {
    /// The candidate can join the current bundle.
    NoHazard,
    /// The candidate conflicts; a new cycle must begin first.
    NoopHazard,
}

/// Resources an instruction occupies once resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceClaim {
    /// Pseudo instruction; occupies nothing.
    Pseudo,
    /// Ordinary instruction bound to a unit.
    Unit {
        /// Issuing unit.
        unit: FunctionalUnit,
        /// Cross path, if any.
        path: Option<CrossPath>,
    },
    /// Register move drawing from the side's shared move budget.
    Move {
        /// Destination side.
        side: Side,
        /// Cross path, if source and destination sides differ.
        path: Option<CrossPath>,
    },
}

impl ResourceClaim {
    /// Cross path claimed, if any.
    pub const fn path(&self) -> Option<CrossPath> {
        match self {
            Self::Pseudo => None,
            Self::Unit { path, .. } | Self::Move { path, .. } => *path,
        }
    }
}

/// Reason a claim cannot be booked in the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// The unit already issued this cycle.
    UnitBusy(FunctionalUnit),
    /// The LSD unit is idle but moves used up its side's shared budget.
    MovePressure(FunctionalUnit),
    /// No move budget left on the destination side.
    MoveBudget(Side),
    /// The cross path is already claimed.
    CrossPathBusy(CrossPath),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitBusy(unit) | Self::MovePressure(unit) => write!(f, "{unit} conflict"),
            Self::MoveBudget(_) => f.write_str("mv conflict: no units left"),
            Self::CrossPathBusy(path) => write!(f, "{path} conflict"),
        }
    }
}

/// Resource-conflict hazard recognizer for one scheduling region.
#[derive(Clone, Debug, Default)]
pub struct HazardRecognizer {
    state: ResourceState,
    stats: SchedStats,
}

impl HazardRecognizer {
    /// Creates a recognizer with an empty cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the resource state. Statistics are kept.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Current cycle's resource state.
    pub const fn state(&self) -> &ResourceState {
        &self.state
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &SchedStats {
        &self.stats
    }

    /// Mutable statistics, for drivers that count bundles.
    pub const fn stats_mut(&mut self) -> &mut SchedStats {
        &mut self.stats
    }

    /// Resolves the resources `inst` needs, fixing flexible resources first.
    ///
    /// Idempotent: resolving the same instruction twice yields the same claim and
    /// leaves the format field unchanged the second time.
    ///
    /// # Arguments
    ///
    /// * `inst` - The candidate instruction. The path bit of a flexible instruction's
    ///   format field may be rewritten.
    ///
    /// # Returns
    ///
    /// [`ResourceClaim::Pseudo`] for pseudo instructions, [`ResourceClaim::Move`] for
    /// moves, and otherwise the [`ResourceClaim::Unit`] with its cross path.
    ///
    /// # Errors
    ///
    /// Any [`SchedError`] raised by malformed operands or format fields.
    pub fn resolve(inst: &mut MachineInst) -> Result<ResourceClaim, SchedError> {
        if inst.desc.pseudo {
            return Ok(ResourceClaim::Pseudo);
        }

        if inst.desc.is_move {
            let (side, path) = analyze_move(inst)?;
            return Ok(ResourceClaim::Move { side, path });
        }

        fix_resources(inst)?;
        Ok(ResourceClaim::Unit {
            unit: functional_unit(inst)?,
            path: cross_path(inst)?,
        })
    }

    /// First conflict between `claim` and the current cycle, if any.
    ///
    /// # Arguments
    ///
    /// * `claim` - A resolved claim; it is not booked.
    ///
    /// # Returns
    ///
    /// The first [`Conflict`] found, checking the cross path before the move budget
    /// for moves and the unit before move pressure and the cross path for the rest.
    /// `None` if the claim fits.
    pub fn conflict(&self, claim: &ResourceClaim) -> Option<Conflict> {
        match *claim {
            ResourceClaim::Pseudo => None,
            ResourceClaim::Move { side, path } => {
                if let Some(busy) = self.busy_path(path) {
                    return Some(busy);
                }
                (self.state.move_units_available(side) == 0).then_some(Conflict::MoveBudget(side))
            }
            ResourceClaim::Unit { unit, path } => {
                if self.state.is_unit_active(unit) {
                    return Some(Conflict::UnitBusy(unit));
                }
                if self.state.is_unit_busy(unit) {
                    return Some(Conflict::MovePressure(unit));
                }
                self.busy_path(path)
            }
        }
    }

    fn busy_path(&self, path: Option<CrossPath>) -> Option<Conflict> {
        path.filter(|p| self.state.is_cross_path_busy(Some(*p)))
            .map(Conflict::CrossPathBusy)
    }

    /// Verdict for an already resolved claim.
    pub fn check(&mut self, claim: &ResourceClaim) -> HazardVerdict {
        match self.conflict(claim) {
            Some(conflict) => {
                debug!("{conflict}");
                self.stats.record_conflict(conflict);
                HazardVerdict::NoopHazard
            }
            None => {
                debug!("--no hazard");
                HazardVerdict::NoHazard
            }
        }
    }

    /// Resolves `inst` and decides whether it can join the current cycle.
    ///
    /// May rewrite the path bit of a flexible instruction's format field.
    ///
    /// # Arguments
    ///
    /// * `inst` - The candidate instruction.
    ///
    /// # Returns
    ///
    /// [`HazardVerdict::NoHazard`] if it fits the current cycle, otherwise
    /// [`HazardVerdict::NoopHazard`] with the conflict recorded in the statistics.
    ///
    /// # Errors
    ///
    /// Any [`SchedError`] from [`resolve`](Self::resolve).
    pub fn classify(&mut self, inst: &mut MachineInst) -> Result<HazardVerdict, SchedError> {
        let claim = Self::resolve(inst)?;
        debug!(inst = inst.name(), ?claim, "classify");
        Ok(self.check(&claim))
    }

    /// Commits `claim` to the current cycle.
    ///
    /// The most recent check of this claim must have returned
    /// [`HazardVerdict::NoHazard`].
    pub fn book(&mut self, claim: &ResourceClaim) {
        match *claim {
            ResourceClaim::Pseudo => self.stats.pseudo += 1,
            ResourceClaim::Unit { unit, path } => {
                self.state.book(unit, path);
                self.stats.instructions += 1;
            }
            ResourceClaim::Move { side, path } => {
                self.state.book_move(side, path);
                self.stats.moves += 1;
            }
        }
        debug!(?claim, "--emit");
    }

    /// Resolves and commits `inst` to the current cycle.
    ///
    /// The last [`classify`](Self::classify) of `inst` must have returned
    /// [`HazardVerdict::NoHazard`].
    ///
    /// # Arguments
    ///
    /// * `inst` - The instruction to book.
    ///
    /// # Returns
    ///
    /// The [`ResourceClaim`] that was booked.
    ///
    /// # Errors
    ///
    /// Any [`SchedError`] from [`resolve`](Self::resolve).
    pub fn emit_instruction(&mut self, inst: &mut MachineInst) -> Result<ResourceClaim, SchedError> {
        let claim = Self::resolve(inst)?;
        self.book(&claim);
        Ok(claim)
    }

    /// Starts a new cycle, releasing every resource.
    pub fn advance_cycle(&mut self) {
        debug!("--advance");
        self.state.reset();
        self.stats.cycles += 1;
    }

    /// Inserts an empty cycle. A no-op occupies nothing, so this only advances.
    ///
    /// This is the only source of `noop_cycles`; [`BundlePacker`](crate::sched::BundlePacker)
    /// advances on hazards without counting a no-op.
    pub fn emit_noop(&mut self) {
        self.stats.noop_cycles += 1;
        self.advance_cycle();
    }
}
