//! The saturating-wave attack planner.
//!
//! Each turn the planner runs a two-phase decision over the gate lanes.
//! Phase A, when every gate is shut, scores every gate-cell/direction lane
//! by the units needed to punch through and opens the cheapest gate if the
//! mobile budget is ready for it. Phase B, when a gate stands open, sizes a
//! wave against the heaviest lane through that gate and commits it from the
//! release cell on the opposite friendly edge. A committed wave marks its
//! gate for resealing at the start of the next run.

use crate::board::GameBoard;
use crate::constants::*;
use crate::gates::{footprint, GateController, GATE_COUNT};
use crate::location::Location;
use crate::threat::{LaneDirection, ThreatEstimator};
use crate::units::{ResourcePool, UnitCatalog, UnitKind};
use itertools::iproduct;
use log::*;

/// One committed mover wave: what was released, where, and how many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    pub kind: UnitKind,
    pub cell: Location,
    pub count: u32,
}

/// The planner's verdict for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackPlan {
    /// Nothing released this turn.
    Hold,
    /// A wave went out.
    Launch(Wave),
}

/// Cross-turn attack state: the gate a committed wave went through, pending
/// reseal on the next run.
#[derive(Default)]
pub struct AttackPlanner {
    launched: Option<usize>,
}

impl AttackPlanner {
    pub fn new() -> Self {
        AttackPlanner::default()
    }

    /// One planning pass. Mutates the board only through gate walls and the
    /// committed spawn; every disqualification is a plain [`AttackPlan::Hold`]
    /// with no state carried over.
    pub fn run(
        &mut self,
        board: &mut dyn GameBoard,
        gates: &mut GateController,
        catalog: &UnitCatalog,
    ) -> AttackPlan {
        // Reseal the gate last turn's wave went through.
        if let Some(gate) = self.launched.take() {
            gates.close(gate, board);
        }

        if gates.open_gate().is_none() {
            if let Some((gate, needed)) = cheapest_gate(&*board, catalog) {
                let budget =
                    READINESS_FRACTION * board.available(ResourcePool::Mobile) + READINESS_BONUS;
                if budget > needed as f32 * catalog.cost(UnitKind::Demolisher) {
                    gates.open(gate, board);
                } else {
                    debug!("cheapest gate {gate} needs {needed}, budget not ready");
                }
            }
        }

        let Some(gate) = gates.open_gate() else {
            return AttackPlan::Hold;
        };

        let Some((start, direction, needed)) = heaviest_lane(&*board, gate, catalog) else {
            return AttackPlan::Hold;
        };
        let Some(release) = release_cell(&*board, start, direction) else {
            return AttackPlan::Hold;
        };
        if board.occupied(release) || board.path_to_edge(release).is_empty() {
            debug!("release cell ({}, {}) disqualified", release.x(), release.y());
            return AttackPlan::Hold;
        }

        let load = needed.max(MIN_WAVE);
        let unit_cost = catalog.cost(UnitKind::Demolisher);
        if board.available(ResourcePool::Mobile) < load as f32 * unit_cost {
            debug!("wave of {load} through gate {gate} unaffordable, holding");
            return AttackPlan::Hold;
        }

        let spawned = board.try_spawn(UnitKind::Demolisher, release, load);
        if spawned == 0 {
            return AttackPlan::Hold;
        }
        self.launched = Some(gate);
        info!(
            "wave of {spawned} launched through gate {gate} from ({}, {})",
            release.x(),
            release.y()
        );
        AttackPlan::Launch(Wave {
            kind: UnitKind::Demolisher,
            cell: release,
            count: spawned,
        })
    }
}

/// The gate whose easiest lane needs the fewest saturating units, with that
/// count. Lane starts below the wall line are skipped; ties keep the earliest
/// gate.
fn cheapest_gate(board: &dyn GameBoard, catalog: &UnitCatalog) -> Option<(usize, u32)> {
    let estimator = ThreatEstimator::new(board, catalog);
    let mut best: Option<(usize, u32)> = None;
    for gate in 0..GATE_COUNT {
        for (start, direction) in iproduct!(footprint(gate), LaneDirection::BOTH) {
            if start.y() < WALL_LINE_Y {
                continue;
            }
            let needed = estimator.units_needed(start, direction);
            if best.map_or(true, |(_, least)| needed < least) {
                best = Some((gate, needed));
            }
        }
    }
    best
}

/// The most expensive lane through one gate: the wave is sized against the
/// worst resistance it could meet, not the best.
fn heaviest_lane(
    board: &dyn GameBoard,
    gate: usize,
    catalog: &UnitCatalog,
) -> Option<(Location, LaneDirection, u32)> {
    let estimator = ThreatEstimator::new(board, catalog);
    let mut best: Option<(Location, LaneDirection, u32)> = None;
    for (start, direction) in iproduct!(footprint(gate), LaneDirection::BOTH) {
        if start.y() < WALL_LINE_Y {
            continue;
        }
        let needed = estimator.units_needed(start, direction);
        if best.map_or(true, |(_, _, most)| needed > most) {
            best = Some((start, direction, needed));
        }
    }
    best
}

/// The edge cell the wave is released from: the cell of the lane's release
/// edge nearest the lane start, earliest cell on ties.
fn release_cell(board: &dyn GameBoard, start: Location, direction: LaneDirection) -> Option<Location> {
    let mut best: Option<(i32, Location)> = None;
    for cell in board.edge_cells(direction.release_corner()) {
        let dist = cell.dist_sq(start);
        if best.map_or(true, |(least, _)| dist < least) {
            best = Some((dist, cell));
        }
    }
    best.map(|(_, cell)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;

    fn loc(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    #[test]
    fn zero_resistance_opens_the_first_gate_and_launches_a_minimum_wave() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 100.0);
        let mut gates = GateController::new();
        let mut planner = AttackPlanner::new();
        let catalog = UnitCatalog::default();

        let plan = planner.run(&mut board, &mut gates, &catalog);

        assert_eq!(gates.open_gate(), Some(0));
        assert_eq!(
            plan,
            AttackPlan::Launch(Wave {
                kind: UnitKind::Demolisher,
                cell: loc(14, 0),
                count: MIN_WAVE,
            })
        );
        assert_eq!(board.spawn_log.len(), 1);
    }

    #[test]
    fn launch_gate_is_resealed_on_the_next_run() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 100.0);
        let mut gates = GateController::new();
        let mut planner = AttackPlanner::new();
        let catalog = UnitCatalog::default();

        planner.run(&mut board, &mut gates, &catalog);
        assert_eq!(gates.open_gate(), Some(0));

        // Gate 0's lanes now meet resistance, so the next run reseals it and
        // picks a cheaper gate instead.
        board.place_enemy(UnitKind::Turret, 2, 15);
        planner.run(&mut board, &mut gates, &catalog);

        assert_eq!(gates.open_gate(), Some(1));
        for cell in footprint(0) {
            assert!(board.occupied(cell), "resealed gate cell should be walled");
        }
    }

    #[test]
    fn unaffordable_wave_holds_without_spawning() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // Covers the lanes through gate 3, forcing at least the saturation
        // floor of four Demolishers at cost 3 each against a pool of 10.
        board.place_enemy(UnitKind::Turret, 18, 14);
        board.set_resources(100.0, 10.0);
        let mut gates = GateController::new();
        gates.open(3, &mut board);
        let mut planner = AttackPlanner::new();
        let catalog = UnitCatalog::default();

        let plan = planner.run(&mut board, &mut gates, &catalog);

        assert_eq!(plan, AttackPlan::Hold);
        assert!(board.spawn_log.is_empty());
        // The open gate is left alone for a retry next turn.
        assert_eq!(gates.open_gate(), Some(3));
    }

    #[test]
    fn blocked_release_cell_holds() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 100.0);
        let mut gates = GateController::new();
        gates.open(3, &mut board);
        // Gate 3's heaviest lane starts at (17, 11) drifting left, so the
        // release cell is the bottom-right edge cell nearest it.
        board.place_friendly(UnitKind::Wall, 21, 7);
        let mut planner = AttackPlanner::new();
        let catalog = UnitCatalog::default();

        let plan = planner.run(&mut board, &mut gates, &catalog);

        assert_eq!(plan, AttackPlan::Hold);
        assert!(board.spawn_log.is_empty());
        assert_eq!(gates.open_gate(), Some(3));
    }

    #[test]
    fn wave_is_sized_to_the_heaviest_lane() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.place_enemy(UnitKind::Turret, 18, 14);
        board.set_resources(100.0, 100.0);
        let mut gates = GateController::new();
        gates.open(3, &mut board);
        let mut planner = AttackPlanner::new();
        let catalog = UnitCatalog::default();

        let plan = planner.run(&mut board, &mut gates, &catalog);

        match plan {
            AttackPlan::Launch(wave) => {
                assert_eq!(wave.kind, UnitKind::Demolisher);
                assert!(
                    wave.count >= SATURATION_FLOOR,
                    "defended lane wave below the floor: {}",
                    wave.count
                );
            }
            AttackPlan::Hold => panic!("an affordable wave should have launched"),
        }
    }
}
