//! # Recognizer Invariants
//!
//! Random instruction streams driven through classify/book/advance. Within every
//! cycle no unit or cross path is booked twice and the move budget is never
//! overdrawn.

use std::collections::HashSet;

use c64x_sched_core::common::{CrossPath, FunctionalUnit, Side, UNITS, UnitKind};
use c64x_sched_core::hazard::{HazardRecognizer, HazardVerdict, ResourceClaim, ResourceState};
use c64x_sched_core::isa::{MachineInst, Reg};
use proptest::prelude::*;

use crate::common::builder::{fixed_op, flex_op, load, mv, pseudo, store};

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::A), Just(Side::B)]
}

fn arb_kind() -> impl Strategy<Value = UnitKind> {
    prop::sample::select(UnitKind::ALL.to_vec())
}

fn arb_reg() -> impl Strategy<Value = Reg> {
    (arb_side(), 0u8..32).prop_map(|(side, num)| Reg::Phys { side, num })
}

fn arb_inst() -> impl Strategy<Value = MachineInst> {
    prop_oneof![
        4 => (arb_kind(), arb_side(), arb_reg(), arb_reg(), arb_reg())
            .prop_map(|(k, s, d, a, b)| flex_op("op", k, s, d, a, b)),
        2 => (arb_kind(), arb_side(), arb_reg(), arb_reg(), arb_reg())
            .prop_map(|(k, s, d, a, b)| fixed_op("fop", k, s, d, a, b)),
        3 => (arb_reg(), arb_reg()).prop_map(|(d, s)| mv(d, s)),
        2 => (arb_side(), arb_reg(), arb_reg()).prop_map(|(s, d, b)| load(s, d, b)),
        2 => (arb_side(), arb_reg(), arb_reg()).prop_map(|(s, b, v)| store(s, b, v)),
        1 => Just(pseudo("kill")),
    ]
}

/// Everything booked in the cycle being assembled.
#[derive(Debug, Default)]
struct Ledger {
    units: HashSet<FunctionalUnit>,
    paths: HashSet<CrossPath>,
    moves: [usize; 2],
}

impl Ledger {
    fn record(&mut self, claim: &ResourceClaim) {
        match *claim {
            ResourceClaim::Pseudo => {}
            ResourceClaim::Unit { unit, .. } => {
                assert!(self.units.insert(unit), "{unit} booked twice");
            }
            ResourceClaim::Move { side, .. } => self.moves[side.index()] += 1,
        }
        if let Some(p) = claim.path() {
            assert!(self.paths.insert(p), "{p} booked twice");
        }
    }
}

fn check_budget(state: &ResourceState) {
    for side in Side::ALL {
        assert!(
            state.moves_on_side(side) + state.active_lsd_count(side) <= UNITS - 1,
            "move budget overdrawn on side {side}"
        );
    }
}

proptest! {
    #[test]
    fn prop_no_double_booking(insts in prop::collection::vec(arb_inst(), 1..64)) {
        let mut hzd = HazardRecognizer::new();
        let mut ledger = Ledger::default();

        for mut inst in insts {
            let mut verdict = hzd.classify(&mut inst).unwrap();
            if verdict == HazardVerdict::NoopHazard {
                hzd.advance_cycle();
                ledger = Ledger::default();
                verdict = hzd.classify(&mut inst).unwrap();
                // Anything fits an empty cycle.
                prop_assert_eq!(verdict, HazardVerdict::NoHazard);
            }
            let claim = hzd.emit_instruction(&mut inst).unwrap();
            ledger.record(&claim);
            check_budget(hzd.state());

            prop_assert_eq!(
                hzd.state().active_units().collect::<HashSet<_>>(),
                ledger.units.clone()
            );
            prop_assert_eq!(
                hzd.state().active_cross_paths().collect::<HashSet<_>>(),
                ledger.paths.clone()
            );
            for side in Side::ALL {
                prop_assert_eq!(hzd.state().moves_on_side(side), ledger.moves[side.index()]);
            }
        }
    }

    #[test]
    fn prop_move_budget_never_grows_within_cycle(insts in prop::collection::vec(arb_inst(), 1..32)) {
        let mut hzd = HazardRecognizer::new();
        let mut last = [UNITS - 1; 2];

        for mut inst in insts {
            if hzd.classify(&mut inst).unwrap() == HazardVerdict::NoopHazard {
                hzd.advance_cycle();
                last = [UNITS - 1; 2];
                continue;
            }
            let _ = hzd.emit_instruction(&mut inst).unwrap();
            for side in Side::ALL {
                let now = hzd.state().move_units_available(side);
                prop_assert!(now <= last[side.index()]);
                last[side.index()] = now;
            }
        }
    }

    #[test]
    fn prop_resolution_is_deterministic(inst in arb_inst()) {
        let mut inst = inst;
        let first = HazardRecognizer::resolve(&mut inst).unwrap();
        let resolved = inst.clone();
        let second = HazardRecognizer::resolve(&mut inst).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(inst, resolved);
    }

    #[test]
    fn prop_classify_does_not_book(insts in prop::collection::vec(arb_inst(), 1..16)) {
        let mut hzd = HazardRecognizer::new();
        for mut inst in insts {
            let before = hzd.state().clone();
            let verdict = hzd.classify(&mut inst).unwrap();
            prop_assert_eq!(hzd.state(), &before);
            if verdict == HazardVerdict::NoHazard {
                let _ = hzd.emit_instruction(&mut inst).unwrap();
            }
        }
    }

    #[test]
    fn prop_reset_is_idempotent(insts in prop::collection::vec(arb_inst(), 0..16)) {
        let mut hzd = HazardRecognizer::new();
        for mut inst in insts {
            if hzd.classify(&mut inst).unwrap() == HazardVerdict::NoHazard {
                let _ = hzd.emit_instruction(&mut inst).unwrap();
            }
        }
        hzd.reset();
        let once = hzd.state().clone();
        hzd.reset();
        prop_assert_eq!(hzd.state(), &once);
        prop_assert_eq!(once, ResourceState::new());
    }
}
