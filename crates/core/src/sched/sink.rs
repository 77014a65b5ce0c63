//! Bundle sink trait and the collected schedule.
//!
//! Whatever serializes the scheduled stream (an assembly printer, an encoder) sees it
//! through [`BundleSink`]. It provides:
//! 1. **Boundaries:** `begin_bundle` at every cycle that receives instructions.
//! 2. **Membership:** `push` for every instruction booked into that cycle, in order.
//!
//! [`Schedule`] is the collecting implementation used by the printer.

use crate::isa::MachineInst;

/// Consumer of bundle boundaries produced by the packer.
pub trait BundleSink {
    /// Starts a new bundle issued in `cycle`.
    fn begin_bundle(&mut self, cycle: u64);
    /// Appends `inst` to the bundle most recently begun.
    fn push(&mut self, inst: MachineInst);
}

/// Instructions issued together in one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bundle {
    /// Cycle the bundle issues in, counted from the start of the region.
    pub cycle: u64,
    /// Instructions in booking order, pseudo instructions included.
    pub insts: Vec<MachineInst>,
}

impl Bundle {
    /// Instructions that occupy an issue slot.
    pub fn real_insts(&self) -> impl Iterator<Item = &MachineInst> {
        self.insts.iter().filter(|inst| !inst.desc.pseudo)
    }
}

/// A packed region as a sequence of bundles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Bundles in issue order.
    pub bundles: Vec<Bundle>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles spanned from the first bundle to the last, inclusive.
    pub fn cycles(&self) -> u64 {
        self.bundles.last().map_or(0, |last| last.cycle + 1)
    }

    /// Total instructions across all bundles.
    pub fn len(&self) -> usize {
        self.bundles.iter().map(|b| b.insts.len()).sum()
    }

    /// True if no instruction was scheduled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BundleSink for Schedule {
    fn begin_bundle(&mut self, cycle: u64) {
        self.bundles.push(Bundle {
            cycle,
            insts: Vec::new(),
        });
    }

    fn push(&mut self, inst: MachineInst) {
        match self.bundles.last_mut() {
            Some(bundle) => bundle.insts.push(inst),
            None => self.bundles.push(Bundle {
                cycle: 0,
                insts: vec![inst],
            }),
        }
    }
}
