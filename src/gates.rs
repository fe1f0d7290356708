//! The six named attack-lane gates and their wall-state controller.
//!
//! A gate is a short run of wall cells near the defensive line that can be
//! held shut (walled) or cleared open to let a wave through. Gates default
//! closed; the attack planner opens at most one at a time and reseals it the
//! turn after a wave goes out.

use crate::board::{try_spawn_batch, GameBoard};
use crate::location::Location;
use crate::units::UnitKind;
use log::*;

/// Number of gates, indexed 0 (leftmost) through 5 (rightmost).
pub const GATE_COUNT: usize = 6;

/// Static footprint cells per gate: edge-left, side-left, center-left,
/// center-right, side-right, edge-right.
const GATE_FOOTPRINTS: [&[(u8, u8)]; GATE_COUNT] = [
    &[(0, 13), (1, 13), (1, 12), (2, 12)],
    &[(5, 11), (6, 11), (5, 10), (6, 10)],
    &[(10, 11), (11, 11), (10, 10), (11, 10)],
    &[(17, 11), (18, 11), (17, 10), (18, 10)],
    &[(22, 11), (23, 11), (22, 10)],
    &[(26, 13), (27, 13), (25, 12), (26, 12)],
];

/// Wall-enforcement iteration order: edge gates first, center gates last.
const ENFORCE_ORDER: [usize; GATE_COUNT] = [0, 5, 1, 4, 3, 2];

/// The footprint cells of one gate, in definition order.
pub fn footprint(gate: usize) -> Vec<Location> {
    GATE_FOOTPRINTS[gate]
        .iter()
        .map(|&(x, y)| Location::from_xy(x, y))
        .collect()
}

/// Owns the open/closed flag of every gate.
///
/// At most one gate is open at any time; opening a gate closes the
/// previously open one first.
#[derive(Default)]
pub struct GateController {
    open: Option<usize>,
}

impl GateController {
    pub fn new() -> Self {
        GateController::default()
    }

    /// The currently open gate, if any.
    pub fn open_gate(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, gate: usize) -> bool {
        self.open == Some(gate)
    }

    /// Per-turn idempotent enforcement: wall up every closed gate's footprint
    /// and issue removals across the open gate's footprint. Spawns on
    /// occupied cells and removals on empty cells are silent no-ops.
    pub fn enforce(&self, board: &mut dyn GameBoard) {
        for gate in ENFORCE_ORDER {
            let cells = footprint(gate);
            if self.open == Some(gate) {
                board.try_remove(&cells);
            } else {
                try_spawn_batch(board, UnitKind::Wall, cells);
            }
        }
    }

    /// Open a gate: close the previously open gate (if any), then clear the
    /// footprint of controller-placed walls.
    pub fn open(&mut self, gate: usize, board: &mut dyn GameBoard) {
        if let Some(previous) = self.open {
            if previous != gate {
                self.close(previous, board);
            }
        }
        board.try_remove(&footprint(gate));
        self.open = Some(gate);
        debug!("gate {gate} opened");
    }

    /// Close a gate: wall up the footprint and mark it shut.
    pub fn close(&mut self, gate: usize, board: &mut dyn GameBoard) {
        try_spawn_batch(board, UnitKind::Wall, footprint(gate));
        if self.open == Some(gate) {
            self.open = None;
        }
        debug!("gate {gate} closed");
    }
}
