//! Bundle-aware assembly printer.
//!
//! Serializes a [`Schedule`] as C64x assembly text. In bundle mode the first
//! instruction of each bundle starts a fresh line and every following one is
//! prefixed with the `||` parallel marker, mirroring the cycle boundaries chosen by
//! the hazard recognizer.
//!
//! Loads and stores print their base and offset as one address operand (`*+B4(8)`),
//! and the `prolog`/`epilog` pseudo instructions expand into the fixed stack-frame
//! sequences of the calling convention.
//!
//! ```text
//!     ; SCHEDULED CYCLES: 2
//! f:
//!         add     .L1X    A3, A1, B2
//!     ||  ldw     .D2T1   *B4, A5
//!     [!A1]   b   .S1     loop
//! ```

use tracing::trace;

use crate::common::SchedError;
use crate::config::PrinterConfig;
use crate::hazard::classify::{cross_path, functional_unit};
use crate::isa::{MachineInst, Operand, Predicate, Reg};
use crate::sched::Schedule;

/// Prefix of an instruction starting a line.
const LINE_PREFIX: &str = "\t";
/// Prefix of an instruction continuing a bundle.
const PARALLEL_PREFIX: &str = "\t||";

/// Pseudo instruction expanded into the frame setup; operand 0 is the frame size.
const PROLOG: &str = "prolog";
/// Pseudo instruction expanded into the frame teardown.
const EPILOG: &str = "epilog";

/// A line of expanded frame code and whether it joins the previous line's packet.
type FrameLine = (bool, String);

/// Assembly printer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsmPrinter {
    bundle_mode: bool,
    cycle_comment: bool,
}

impl Default for AsmPrinter {
    fn default() -> Self {
        Self::new(&PrinterConfig::default())
    }
}

impl AsmPrinter {
    /// Creates a printer from its configuration.
    pub const fn new(config: &PrinterConfig) -> Self {
        Self {
            bundle_mode: config.bundle_mode,
            cycle_comment: config.cycle_comment,
        }
    }

    /// Prints a packed function.
    ///
    /// # Errors
    ///
    /// Fails on the first instruction [`print_inst`](Self::print_inst) rejects, or on a
    /// `prolog` without an immediate frame size.
    pub fn print_function(&self, name: &str, schedule: &Schedule) -> Result<String, SchedError> {
        let mut out = String::new();

        if self.cycle_comment {
            out.push_str(&format!("\t; SCHEDULED CYCLES: {}\n", schedule.cycles()));
        }
        out.push_str(name);
        out.push_str(":\n");

        for bundle in &schedule.bundles {
            trace!(cycle = bundle.cycle, len = bundle.insts.len(), "print bundle");
            let mut bundle_open = false;

            for inst in &bundle.insts {
                if inst.desc.pseudo {
                    match Self::frame_sequence(inst)? {
                        Some(lines) => {
                            self.print_frame(inst.name(), lines, &mut out);
                            bundle_open = false;
                        }
                        None => out.push_str(&format!("\t; {}\n", inst.name())),
                    }
                    continue;
                }
                let prefix = if self.bundle_mode && bundle_open {
                    PARALLEL_PREFIX
                } else {
                    LINE_PREFIX
                };
                out.push_str(&Self::print_inst(inst, prefix)?);
                out.push('\n');
                bundle_open = true;
            }
        }
        Ok(out)
    }

    /// Prints one instruction line (without the trailing newline).
    ///
    /// # Errors
    ///
    /// Fails on a virtual register operand, a flexible instruction without its format
    /// field, or a load or store whose operands do not form an address.
    pub fn print_inst(inst: &MachineInst, prefix: &str) -> Result<String, SchedError> {
        let mut line = String::from(prefix);

        if let Some(pred) = inst.predicate.filter(|_| inst.desc.predicable) {
            line.push_str(&Self::print_predicate(inst, pred)?);
        }

        line.push('\t');
        line.push_str(inst.name());

        if let Some(unit) = Self::print_unit(inst)? {
            line.push_str("\t.");
            line.push_str(&unit);
        }

        let operands = if inst.desc.mem_access {
            Self::memory_operands(inst)?
        } else {
            Self::encoded_operands(inst)
                .iter()
                .map(|op| Self::print_operand(inst, op))
                .collect::<Result<Vec<_>, _>>()?
        };
        if !operands.is_empty() {
            line.push('\t');
            line.push_str(&operands.join(", "));
        }
        Ok(line)
    }

    /// `[ A1]` or `[!A1]`.
    fn print_predicate(inst: &MachineInst, pred: Predicate) -> Result<String, SchedError> {
        let c = if pred.negated { '!' } else { ' ' };
        Ok(format!("[{c}{}]", Self::physical(inst, pred.reg)?))
    }

    /// Unit field such as `L1`, `S2X` or `D1T2`; `None` for moves, which the
    /// assembler places.
    fn print_unit(inst: &MachineInst) -> Result<Option<String>, SchedError> {
        if inst.desc.is_move {
            return Ok(None);
        }

        let mut unit = functional_unit(inst)?.to_string();
        let path = cross_path(inst)?;
        match path {
            Some(p) if p.is_address() => unit.push_str(p.name()),
            Some(_) => unit.push('X'),
            None => {}
        }
        Ok(Some(unit))
    }

    /// Operands that appear in the assembly; the format field is never printed.
    fn encoded_operands(inst: &MachineInst) -> &[Operand] {
        let ops = inst.operands.as_slice();
        if inst.desc.is_flexible() {
            ops.split_last().map_or(ops, |(_, rest)| rest)
        } else {
            ops
        }
    }

    /// Load operands as `*addr, dst`, store operands as `src, *addr`.
    fn memory_operands(inst: &MachineInst) -> Result<Vec<String>, SchedError> {
        let malformed = |detail: &'static str| SchedError::MalformedMemoryAccess {
            inst: inst.name().to_owned(),
            detail,
        };

        let ops = Self::encoded_operands(inst);
        if inst.desc.store {
            let [base, offset, src, ..] = ops else {
                return Err(malformed("store needs base, offset and data operands"));
            };
            Ok(vec![
                Self::print_operand(inst, src)?,
                Self::print_address(inst, base, offset)?,
            ])
        } else {
            let [dst, base, offset, ..] = ops else {
                return Err(malformed("load needs destination, base and offset operands"));
            };
            Ok(vec![
                Self::print_address(inst, base, offset)?,
                Self::print_operand(inst, dst)?,
            ])
        }
    }

    /// `*B4`, `*+B4(8)`, `*-A15(4)` or `*B4(A1)`.
    ///
    /// An immediate offset prints as a sign before the base and its magnitude in
    /// parentheses; a zero offset is omitted. Any other offset is printed as is.
    fn print_address(
        inst: &MachineInst,
        base: &Operand,
        offset: &Operand,
    ) -> Result<String, SchedError> {
        let base = Self::print_operand(inst, base)?;
        Ok(match offset {
            Operand::Immediate(0) => format!("*{base}"),
            Operand::Immediate(v) => {
                let sign = if *v < 0 { '-' } else { '+' };
                format!("*{sign}{base}({})", v.unsigned_abs())
            }
            other => format!("*{base}({})", Self::print_operand(inst, other)?),
        })
    }

    /// Fixed code for the frame pseudo instructions; `None` for every other pseudo.
    fn frame_sequence(inst: &MachineInst) -> Result<Option<Vec<FrameLine>>, SchedError> {
        match inst.name() {
            PROLOG => {
                let Some(Operand::Immediate(size)) = inst.operand(0) else {
                    return Err(SchedError::MalformedFrame(inst.name().to_owned()));
                };
                Ok(Some(vec![
                    (false, format!("mvk\t{size}, A0")),
                    (true, "mv\tB15, A1".to_owned()),
                    (false, "stw\tA15, *B15".to_owned()),
                    (true, "stw\tB3, *-A1(4)".to_owned()),
                    (true, "mv\tB15, A15".to_owned()),
                    (true, "sub\tB15, A0, B15".to_owned()),
                ]))
            }
            EPILOG => Ok(Some(vec![
                (false, "ldw\t*-A15(4), B3".to_owned()),
                (false, "mv\tA15, B15".to_owned()),
                (true, "ldw\t*A15, A15".to_owned()),
                (false, "nop\t4".to_owned()),
            ])),
            _ => Ok(None),
        }
    }

    /// Emits an expanded frame sequence between `; begin`/`; end` markers.
    fn print_frame(&self, name: &str, lines: Vec<FrameLine>, out: &mut String) {
        out.push_str(&format!("\t; begin {name}\n"));
        for (parallel, text) in lines {
            out.push_str(if self.bundle_mode && parallel {
                PARALLEL_PREFIX
            } else {
                LINE_PREFIX
            });
            out.push('\t');
            out.push_str(&text);
            out.push('\n');
        }
        out.push_str(&format!("\t; end {name}\n"));
    }

    /// Name of a physical register; virtual registers must not reach the printer.
    fn physical(inst: &MachineInst, reg: Reg) -> Result<String, SchedError> {
        reg.require_side(inst.name()).map(|_| reg.to_string())
    }

    fn print_operand(inst: &MachineInst, op: &Operand) -> Result<String, SchedError> {
        Ok(match op {
            Operand::Register { reg, .. } => Self::physical(inst, *reg)?,
            Operand::Immediate(v) => v.to_string(),
            Operand::BasicBlock(label)
            | Operand::GlobalAddress(label)
            | Operand::ExternalSymbol(label) => label.clone(),
            Operand::JumpTableIndex(idx) => idx.to_string(),
        })
    }
}
