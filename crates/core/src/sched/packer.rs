//! In-order bundle packer.
//!
//! Packs an already ordered instruction stream into execute packets by driving a
//! [`HazardRecognizer`] with the classify/book/advance protocol:
//! 1. **Width limit:** A bundle holding `issue_width` real instructions is closed.
//! 2. **Hazards:** A candidate that hazards closes the bundle and is retried on a
//!    fresh cycle; hazarding against an empty cycle is fatal.
//! 3. **Pseudo instructions:** Join the current bundle without occupying a slot.
//!
//! The packer never reorders; choosing the order is the list scheduler's job.

use tracing::{debug, trace};

use super::sink::BundleSink;
use crate::common::SchedError;
use crate::config::SchedConfig;
use crate::hazard::{HazardRecognizer, HazardVerdict};
use crate::isa::MachineInst;
use crate::stats::SchedStats;

/// Position within the region being packed.
#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    /// Current cycle.
    cycle: u64,
    /// Real instructions booked in the current cycle.
    issued: usize,
    /// A bundle has been begun for the current cycle.
    open: bool,
}

/// Greedy in-order packer over a hazard recognizer.
#[derive(Clone, Debug)]
pub struct BundlePacker {
    recognizer: HazardRecognizer,
    issue_width: usize,
}

impl BundlePacker {
    /// Creates a packer with the configured issue width.
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            recognizer: HazardRecognizer::new(),
            issue_width: config.issue_width,
        }
    }

    /// The underlying recognizer.
    pub const fn recognizer(&self) -> &HazardRecognizer {
        &self.recognizer
    }

    /// Statistics accumulated over every region packed so far.
    pub const fn stats(&self) -> &SchedStats {
        self.recognizer.stats()
    }

    /// Packs one region into `sink`, returning the number of cycles it spans.
    pub fn pack<I, S>(&mut self, insts: I, sink: &mut S) -> Result<u64, SchedError>
    where
        I: IntoIterator<Item = MachineInst>,
        S: BundleSink + ?Sized,
    {
        self.recognizer.reset();
        let mut cursor = Cursor::default();

        for mut inst in insts {
            if inst.desc.pseudo {
                let claim = self.recognizer.emit_instruction(&mut inst)?;
                trace!(inst = inst.name(), ?claim, "pseudo");
                self.open_bundle(&mut cursor, sink);
                sink.push(inst);
                continue;
            }

            if cursor.issued >= self.issue_width {
                debug!(width = self.issue_width, "issue width reached");
                self.advance(&mut cursor);
            }

            if self.recognizer.classify(&mut inst)? == HazardVerdict::NoopHazard {
                self.advance(&mut cursor);
                if self.recognizer.classify(&mut inst)? == HazardVerdict::NoopHazard {
                    return Err(SchedError::Unschedulable(inst.name().to_owned()));
                }
            }

            let claim = self.recognizer.emit_instruction(&mut inst)?;
            trace!(inst = inst.name(), ?claim, cycle = cursor.cycle, "booked");
            self.open_bundle(&mut cursor, sink);
            cursor.issued += 1;
            sink.push(inst);
        }

        Ok(if cursor.open { cursor.cycle + 1 } else { 0 })
    }

    fn open_bundle<S: BundleSink + ?Sized>(&mut self, cursor: &mut Cursor, sink: &mut S) {
        if !cursor.open {
            sink.begin_bundle(cursor.cycle);
            cursor.open = true;
            self.recognizer.stats_mut().bundles += 1;
        }
    }

    fn advance(&mut self, cursor: &mut Cursor) {
        self.recognizer.advance_cycle();
        cursor.cycle += 1;
        cursor.issued = 0;
        cursor.open = false;
    }
}
