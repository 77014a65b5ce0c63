//! # Hazard Recognizer Tests
//!
//! Hazard decisions for unit, move-budget, and cross-path conflicts, followed by
//! booking and cycle advance.

use c64x_sched_core::common::{CrossPath, FunctionalUnit, SchedError, Side, UNITS, UnitKind};
use c64x_sched_core::hazard::{Conflict, HazardRecognizer, HazardVerdict, ResourceClaim};
use c64x_sched_core::isa::{MachineInst, Operand, Reg};
use rstest::rstest;

use crate::common::builder::{InstBuilder, fixed_op, flex_op, load, mv, pseudo, store};
use crate::common::harness::Harness;

use HazardVerdict::{NoHazard, NoopHazard};

const L1: FunctionalUnit = FunctionalUnit::new(UnitKind::L, Side::A);
const S2: FunctionalUnit = FunctionalUnit::new(UnitKind::S, Side::B);

#[test]
fn test_same_side_moves_share_cycle() {
    let mut h = Harness::new();

    assert_eq!(h.place_owned(mv(Reg::a(1), Reg::a(2))), NoHazard);
    assert_eq!(h.hzd.state().moves_on_side(Side::A), 1);

    assert_eq!(h.place_owned(mv(Reg::a(3), Reg::a(4))), NoHazard);
    assert_eq!(h.hzd.state().moves_on_side(Side::A), 2);
    assert_eq!(h.hzd.state().moves_on_side(Side::B), 0);
    assert_eq!(h.hzd.state().active_units().count(), 0);
}

#[test]
fn test_cross_path_conflict_forces_new_cycle() {
    let mut h = Harness::new();

    let mut add = flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::a(2), Reg::b(2));
    assert_eq!(h.place(&mut add).unwrap(), NoHazard);
    assert!(add.path_bit().unwrap());
    assert!(h.hzd.state().is_cross_path_busy(Some(CrossPath::X1)));

    let mut sub = flex_op("sub", UnitKind::S, Side::A, Reg::a(5), Reg::b(6), Reg::a(7));
    assert_eq!(h.hzd.classify(&mut sub).unwrap(), NoopHazard);
    assert_eq!(h.hzd.stats().hazards_cross_path[CrossPath::X1.index()], 1);
}

#[test]
fn test_advance_releases_everything() {
    let mut h = Harness::new();

    let _ = h.place_owned(flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::a(2), Reg::b(2)));
    let _ = h.place_owned(mv(Reg::b(1), Reg::b(2)));
    let _ = h.place_owned(load(Side::B, Reg::a(3), Reg::b(4)));
    assert!(!h.hzd.state().is_empty());

    h.hzd.advance_cycle();
    assert!(h.hzd.state().is_empty());
    for side in Side::ALL {
        assert_eq!(h.hzd.state().move_units_available(side), UNITS - 1);
    }
    assert_eq!(h.hzd.stats().cycles, 1);

    // The conflicting candidate now fits.
    let sub = flex_op("sub", UnitKind::S, Side::A, Reg::a(5), Reg::b(6), Reg::a(7));
    assert_eq!(h.place_owned(sub), NoHazard);
}

#[test]
fn test_load_into_side_b_claims_t2() {
    let mut h = Harness::new();

    let mut ld = load(Side::A, Reg::b(4), Reg::a(5));
    let claim = HazardRecognizer::resolve(&mut ld).unwrap();
    assert_eq!(
        claim,
        ResourceClaim::Unit {
            unit: FunctionalUnit::new(UnitKind::D, Side::A),
            path: Some(CrossPath::T2),
        }
    );
    assert_eq!(ld.format_field().unwrap(), (3 << 1) | 1);
    assert_eq!(h.place(&mut ld).unwrap(), NoHazard);

    // A store through the other D unit but the same memory path conflicts.
    let mut st = store(Side::B, Reg::b(8), Reg::b(9));
    assert_eq!(h.hzd.classify(&mut st).unwrap(), NoopHazard);

    // Through T1 it fits.
    let mut st = store(Side::B, Reg::b(8), Reg::a(9));
    assert_eq!(h.place(&mut st).unwrap(), NoHazard);
}

#[test]
fn test_unit_busy() {
    let mut h = Harness::new();

    assert_eq!(
        h.place_owned(fixed_op("shl", UnitKind::S, Side::B, Reg::b(1), Reg::b(2), Reg::b(3))),
        NoHazard
    );
    let claim = ResourceClaim::Unit {
        unit: S2,
        path: None,
    };
    assert_eq!(h.hzd.conflict(&claim), Some(Conflict::UnitBusy(S2)));
    assert_eq!(h.hzd.check(&claim), NoopHazard);
    assert_eq!(h.hzd.stats().hazards_unit, 1);

    // Only that unit.
    let other = ResourceClaim::Unit {
        unit: FunctionalUnit::new(UnitKind::S, Side::A),
        path: None,
    };
    assert_eq!(h.hzd.conflict(&other), None);
}

#[test]
fn test_moves_block_idle_lsd_unit() {
    let mut h = Harness::new();
    for n in 0..UNITS - 1 {
        assert_eq!(h.place_owned(mv(Reg::a(n as u8), Reg::a(10))), NoHazard);
    }
    assert_eq!(h.hzd.state().move_units_available(Side::A), 0);

    let mut add = flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::a(2), Reg::a(3));
    assert_eq!(h.hzd.classify(&mut add).unwrap(), NoopHazard);
    assert_eq!(h.hzd.stats().hazards_move_pressure, 1);

    // The multiplier and side B are unaffected.
    let mpy = fixed_op("mpy", UnitKind::M, Side::A, Reg::a(1), Reg::a(2), Reg::a(3));
    assert_eq!(h.place_owned(mpy), NoHazard);
    let add = flex_op("add", UnitKind::L, Side::B, Reg::b(1), Reg::b(2), Reg::b(3));
    assert_eq!(h.place_owned(add), NoHazard);
}

#[test]
fn test_move_budget_exhausted() {
    let mut h = Harness::new();
    for n in 0..UNITS - 1 {
        let _ = h.place_owned(mv(Reg::b(n as u8), Reg::b(20)));
    }
    let mut fourth = mv(Reg::b(5), Reg::b(6));
    assert_eq!(h.hzd.classify(&mut fourth).unwrap(), NoopHazard);
    assert_eq!(h.hzd.stats().hazards_move_budget, 1);
    assert_eq!(h.hzd.state().moves_on_side(Side::B), UNITS - 1);

    assert_eq!(h.place_owned(mv(Reg::a(5), Reg::a(6))), NoHazard);
}

#[test]
fn test_conflict_reports_first_cause() {
    let mut h = Harness::new();
    // L2 reading across X2, then two moves: side B has no move budget left.
    let add = flex_op("add", UnitKind::L, Side::B, Reg::b(1), Reg::a(2), Reg::b(3));
    assert_eq!(h.place_owned(add), NoHazard);
    assert_eq!(h.place_owned(mv(Reg::b(4), Reg::b(5))), NoHazard);
    assert_eq!(h.place_owned(mv(Reg::b(6), Reg::b(7))), NoHazard);
    assert_eq!(h.hzd.state().move_units_available(Side::B), 0);

    let l2 = FunctionalUnit::new(UnitKind::L, Side::B);
    let cross_move = ResourceClaim::Move {
        side: Side::B,
        path: Some(CrossPath::X2),
    };
    assert_eq!(
        h.hzd.conflict(&cross_move),
        Some(Conflict::CrossPathBusy(CrossPath::X2))
    );
    let local_move = ResourceClaim::Move {
        side: Side::B,
        path: None,
    };
    assert_eq!(h.hzd.conflict(&local_move), Some(Conflict::MoveBudget(Side::B)));
    let unit = ResourceClaim::Unit {
        unit: l2,
        path: Some(CrossPath::X2),
    };
    assert_eq!(h.hzd.conflict(&unit), Some(Conflict::UnitBusy(l2)));

    // Asking does not book or count.
    assert_eq!(h.hzd.stats().hazards_total(), 0);
    assert_eq!(h.hzd.state().moves_on_side(Side::B), 2);
}

#[test]
fn test_busy_lsd_units_consume_move_budget() {
    let mut h = Harness::new();
    let _ = h.place_owned(flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::a(2), Reg::a(3)));
    let _ = h.place_owned(flex_op("shl", UnitKind::S, Side::A, Reg::a(4), Reg::a(5), Reg::a(6)));
    assert_eq!(h.hzd.state().move_units_available(Side::A), 1);

    assert_eq!(h.place_owned(mv(Reg::a(7), Reg::a(8))), NoHazard);
    assert_eq!(h.hzd.state().move_units_available(Side::A), 0);

    // D1 is idle but the budget is gone.
    let mut ld = load(Side::A, Reg::a(9), Reg::a(10));
    assert_eq!(h.hzd.classify(&mut ld).unwrap(), NoopHazard);
    let mut mv2 = mv(Reg::a(11), Reg::a(12));
    assert_eq!(h.hzd.classify(&mut mv2).unwrap(), NoopHazard);
}

#[test]
fn test_cross_side_move_claims_data_path() {
    let mut h = Harness::new();
    assert_eq!(h.place_owned(mv(Reg::a(1), Reg::b(2))), NoHazard);
    assert!(h.hzd.state().is_cross_path_busy(Some(CrossPath::X1)));

    // A second move into side A through X1.
    let mut second = mv(Reg::a(3), Reg::b(4));
    assert_eq!(h.hzd.classify(&mut second).unwrap(), NoopHazard);

    // A flexible op on side A reading side B.
    let mut add = flex_op("add", UnitKind::L, Side::A, Reg::a(5), Reg::b(6), Reg::a(7));
    assert_eq!(h.hzd.classify(&mut add).unwrap(), NoopHazard);
    assert_eq!(h.hzd.stats().hazards_cross_path[CrossPath::X1.index()], 2);

    // X2 is still free.
    assert_eq!(h.place_owned(mv(Reg::b(3), Reg::a(4))), NoHazard);
}

#[test]
fn test_fixed_cross_side_instruction() {
    let mut h = Harness::new();
    let mpy = fixed_op("mpy", UnitKind::M, Side::B, Reg::b(1), Reg::a(2), Reg::b(3));
    assert_eq!(h.place_owned(mpy), NoHazard);
    assert!(h.hzd.state().is_cross_path_busy(Some(CrossPath::X2)));

    let mut add = flex_op("add", UnitKind::L, Side::B, Reg::b(1), Reg::a(2), Reg::b(3));
    assert_eq!(h.hzd.classify(&mut add).unwrap(), NoopHazard);
}

#[test]
fn test_call_claims_unit_only() {
    let mut h = Harness::new();
    let call = InstBuilder::fixed("call", UnitKind::S, Side::A)
        .call()
        .operand(Operand::GlobalAddress("memcpy".into()))
        .reg(Reg::b(3))
        .build();
    assert_eq!(h.place_owned(call), NoHazard);
    assert!(h.hzd.state().is_unit_active(FunctionalUnit::new(UnitKind::S, Side::A)));
    assert_eq!(h.hzd.state().active_cross_paths().count(), 0);
}

#[test]
fn test_pseudo_occupies_nothing() {
    let mut h = Harness::new();
    for _ in 0..10 {
        assert_eq!(h.place_owned(pseudo("implicit_def")), NoHazard);
    }
    assert!(h.hzd.state().is_empty());
    assert_eq!(h.hzd.stats().pseudo, 10);
    assert_eq!(h.hzd.stats().instructions, 0);
}

#[test]
fn test_emit_returns_claim_and_counts() {
    let mut h = Harness::new();
    let mut add = flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::a(2), Reg::a(3));
    let claim = h.hzd.emit_instruction(&mut add).unwrap();
    assert_eq!(claim, ResourceClaim::Unit { unit: L1, path: None });
    assert_eq!(claim.path(), None);

    let mut m = mv(Reg::b(1), Reg::a(1));
    let claim = h.hzd.emit_instruction(&mut m).unwrap();
    assert_eq!(
        claim,
        ResourceClaim::Move {
            side: Side::B,
            path: Some(CrossPath::X2)
        }
    );
    assert_eq!(h.hzd.stats().instructions, 1);
    assert_eq!(h.hzd.stats().moves, 1);
}

#[test]
fn test_emit_noop_advances() {
    let mut h = Harness::new();
    let _ = h.place_owned(mv(Reg::a(1), Reg::a(2)));
    h.hzd.emit_noop();
    assert!(h.hzd.state().is_empty());
    assert_eq!(h.hzd.stats().noop_cycles, 1);
    assert_eq!(h.hzd.stats().cycles, 1);
    assert!(h.hzd.stats().to_string().contains("sched_noops              1"));

    // A plain advance is not a no-op.
    h.hzd.advance_cycle();
    assert_eq!(h.hzd.stats().noop_cycles, 1);
    assert_eq!(h.hzd.stats().cycles, 2);
}

#[test]
fn test_reset_clears_state_and_keeps_stats() {
    let mut h = Harness::new();
    let _ = h.place_owned(mv(Reg::a(1), Reg::b(2)));
    h.hzd.reset();
    assert!(h.hzd.state().is_empty());
    h.hzd.reset();
    assert!(h.hzd.state().is_empty());
    assert_eq!(h.hzd.stats().moves, 1);
}

#[rstest]
#[case::virtual_register(
    flex_op("add", UnitKind::L, Side::A, Reg::a(1), Reg::Virtual(4), Reg::a(3)),
    SchedError::VirtualRegister { inst: "add".into(), vreg: 4 }
)]
#[case::missing_format(
    InstBuilder::flexible("add", UnitKind::L, Side::A).def(Reg::a(1)).reg(Reg::a(2)).build_raw(),
    SchedError::MissingFormatOperand("add".into())
)]
#[case::fixed_memory_access(
    InstBuilder::fixed("ldw", UnitKind::D, Side::A).mem(false).def(Reg::a(1)).reg(Reg::a(2)).build(),
    SchedError::FixedMemoryAccess("ldw".into())
)]
#[case::move_without_source(
    InstBuilder::fixed("mv", UnitKind::L, Side::A).mov().def(Reg::a(1)).build(),
    SchedError::MalformedMove("mv".into())
)]
fn test_malformed_input_is_fatal(
    #[case] inst: MachineInst,
    #[case] expected: SchedError,
) {
    let mut inst = inst;
    let mut hzd = HazardRecognizer::new();
    assert_eq!(hzd.classify(&mut inst), Err(expected.clone()));
    assert_eq!(hzd.emit_instruction(&mut inst), Err(expected));
    assert!(hzd.state().is_empty());
}

#[test]
fn test_conflict_messages() {
    assert_eq!(Conflict::UnitBusy(L1).to_string(), "L1 conflict");
    assert_eq!(Conflict::MovePressure(S2).to_string(), "S2 conflict");
    assert_eq!(
        Conflict::MoveBudget(Side::A).to_string(),
        "mv conflict: no units left"
    );
    assert_eq!(Conflict::CrossPathBusy(CrossPath::T2).to_string(), "T2 conflict");
}
