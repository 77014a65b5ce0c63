//! Scheduling statistics collection and reporting.
//!
//! This module tracks how well instructions pack into execute packets. It provides:
//! 1. **Cycles and bundles:** Cycle boundaries, printed bundles, and inserted no-ops.
//! 2. **Instruction mix:** Unit-bound instructions, moves, and pseudo instructions.
//! 3. **Hazards:** Conflicts broken down by cause and by cross path.

use std::fmt;

use crate::common::{CROSS_PATHS, CrossPath};
use crate::hazard::Conflict;

/// Scheduling statistics for one or more regions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedStats {
    /// Cycle boundaries crossed (`advance_cycle` calls).
    pub cycles: u64,
    /// Bundles opened by the packer.
    pub bundles: u64,
    /// Empty cycles a driver inserted through `emit_noop`; the packer never inserts any.
    pub noop_cycles: u64,

    /// Unit-bound instructions booked.
    pub instructions: u64,
    /// Register moves booked.
    pub moves: u64,
    /// Pseudo instructions passed through.
    pub pseudo: u64,

    /// Hazards from a unit that already issued.
    pub hazards_unit: u64,
    /// Hazards from an idle LSD unit blocked by move pressure.
    pub hazards_move_pressure: u64,
    /// Hazards from an exhausted move budget.
    pub hazards_move_budget: u64,
    /// Hazards from a busy cross path, indexed by [`CrossPath::index`].
    pub hazards_cross_path: [u64; CROSS_PATHS],
}

impl SchedStats {
    /// Counts a conflict under its cause.
    pub const fn record_conflict(&mut self, conflict: Conflict) {
        match conflict {
            Conflict::UnitBusy(_) => self.hazards_unit += 1,
            Conflict::MovePressure(_) => self.hazards_move_pressure += 1,
            Conflict::MoveBudget(_) => self.hazards_move_budget += 1,
            Conflict::CrossPathBusy(path) => self.hazards_cross_path[path.index()] += 1,
        }
    }

    /// All hazards regardless of cause.
    pub fn hazards_total(&self) -> u64 {
        self.hazards_unit
            + self.hazards_move_pressure
            + self.hazards_move_budget
            + self.hazards_cross_path.iter().sum::<u64>()
    }

    /// Real instructions (unit-bound plus moves) per bundle.
    pub fn instructions_per_bundle(&self) -> f64 {
        if self.bundles == 0 {
            return 0.0;
        }
        (self.instructions + self.moves) as f64 / self.bundles as f64
    }
}

impl fmt::Display for SchedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "C64X SCHEDULING STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sched_cycles             {}", self.cycles)?;
        writeln!(f, "sched_bundles            {}", self.bundles)?;
        writeln!(f, "sched_noops              {}", self.noop_cycles)?;
        writeln!(f, "sched_insts              {}", self.instructions)?;
        writeln!(f, "sched_moves              {}", self.moves)?;
        writeln!(f, "sched_pseudo             {}", self.pseudo)?;
        writeln!(f, "sched_ipb                {:.4}", self.instructions_per_bundle())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "HAZARDS")?;
        writeln!(f, "  hazard.total           {}", self.hazards_total())?;
        writeln!(f, "  hazard.unit            {}", self.hazards_unit)?;
        writeln!(f, "  hazard.move_pressure   {}", self.hazards_move_pressure)?;
        writeln!(f, "  hazard.move_budget     {}", self.hazards_move_budget)?;
        for path in CrossPath::ALL {
            writeln!(
                f,
                "  hazard.xpath.{}        {}",
                path,
                self.hazards_cross_path[path.index()]
            )?;
        }
        write!(f, "----------------------------------------------------------")
    }
}
