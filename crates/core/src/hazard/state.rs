//! Per-cycle resource occupancy.
//!
//! Tracks which functional units, cross paths, and move-issue budget have been
//! committed in the cycle being assembled. Nothing survives a reset: every cycle
//! starts clean.

use crate::common::{CROSS_PATHS, CrossPath, FunctionalUnit, SIDES, Side, UNITS, UnitKind};

/// Resource occupancy for the current cycle.
///
/// A unit issues at most one instruction per cycle. Register moves do not occupy a
/// unit slot; instead they draw from a per-side budget shared with the `.L`, `.S`
/// and `.D` units, so that `moves_on_side + active LSD units <= UNITS - 1` holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceState {
    /// Busy units, indexed by side then unit kind.
    active: [[bool; UNITS]; SIDES],
    /// Busy cross paths, indexed by [`CrossPath::index`].
    extra_active: [bool; CROSS_PATHS],
    /// Moves committed per side.
    moves_on_side: [usize; SIDES],
}

impl ResourceState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all units, cross paths, and move counters.
    pub fn reset(&mut self) {
        self.active = [[false; UNITS]; SIDES];
        self.extra_active = [false; CROSS_PATHS];
        self.moves_on_side = [0; SIDES];
    }

    /// True if nothing has been committed this cycle.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if `unit` already issued this cycle.
    #[inline]
    pub const fn is_unit_active(&self, unit: FunctionalUnit) -> bool {
        self.active[unit.side.index()][unit.kind.index()]
    }

    /// True if `unit` cannot accept an instruction this cycle.
    ///
    /// An LSD unit is also busy when moves on its side have consumed the shared
    /// budget, even if the unit itself is idle.
    pub fn is_unit_busy(&self, unit: FunctionalUnit) -> bool {
        self.is_unit_active(unit) || (unit.kind.is_lsd() && self.move_units_available(unit.side) < 1)
    }

    /// True if `path` is claimed this cycle. `None` is never busy.
    #[inline]
    pub fn is_cross_path_busy(&self, path: Option<CrossPath>) -> bool {
        path.is_some_and(|p| self.extra_active[p.index()])
    }

    /// Number of moves committed on `side`.
    pub const fn moves_on_side(&self, side: Side) -> usize {
        self.moves_on_side[side.index()]
    }

    /// Number of busy `.L`, `.S` and `.D` units on `side`.
    pub fn active_lsd_count(&self, side: Side) -> usize {
        UnitKind::ALL
            .iter()
            .filter(|kind| kind.is_lsd() && self.active[side.index()][kind.index()])
            .count()
    }

    /// Remaining move-issue budget on `side`, not counting the `.M` unit.
    ///
    /// # Arguments
    ///
    /// * `side` - The datapath side whose `.L`, `.S` and `.D` units are counted.
    ///
    /// # Returns
    ///
    /// `UNITS - 1 - moves_on_side - active LSD units`, never below zero.
    pub fn move_units_available(&self, side: Side) -> usize {
        (UNITS - 1).saturating_sub(self.moves_on_side(side) + self.active_lsd_count(side))
    }

    /// Busy units in index order.
    pub fn active_units(&self) -> impl Iterator<Item = FunctionalUnit> + '_ {
        Side::ALL.into_iter().flat_map(move |side| {
            UnitKind::ALL
                .into_iter()
                .map(move |kind| FunctionalUnit::new(kind, side))
                .filter(move |unit| self.is_unit_active(*unit))
        })
    }

    /// Busy cross paths in index order.
    pub fn active_cross_paths(&self) -> impl Iterator<Item = CrossPath> + '_ {
        CrossPath::ALL
            .into_iter()
            .filter(|p| self.extra_active[p.index()])
    }

    /// Commits `unit` and, if present, `path` for this cycle.
    pub fn book(&mut self, unit: FunctionalUnit, path: Option<CrossPath>) {
        debug_assert!(!self.is_unit_active(unit), "{unit} booked twice in one cycle");
        self.active[unit.side.index()][unit.kind.index()] = true;
        self.claim_path(path);
    }

    /// Commits a move on `side` and, if present, `path` for this cycle.
    pub fn book_move(&mut self, side: Side, path: Option<CrossPath>) {
        self.moves_on_side[side.index()] += 1;
        self.claim_path(path);
    }

    fn claim_path(&mut self, path: Option<CrossPath>) {
        if let Some(p) = path {
            self.extra_active[p.index()] = true;
        }
    }
}
