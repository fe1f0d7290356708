//! The per-turn decision engine tying the components together.
//!
//! One engine instance lives for a whole match. Each turn the caller feeds
//! it the previous turn's combat frames, then hands it the live board; the
//! engine repairs last turn's losses, places defenses, enforces the gates,
//! runs the attack planner and returns the turn's plan. Every sub-step is
//! best-effort: a starved or blocked action degrades to a no-op and the
//! engine always returns a plan.

use crate::attack::{AttackPlan, AttackPlanner, Wave};
use crate::board::GameBoard;
use crate::defense::{DefenseBuilder, ReactiveRepair};
use crate::events::{parse_frame, DeathRecord, EventTracker};
use crate::gates::GateController;
use crate::location::Location;
use crate::threat::ThreatEstimator;
use crate::units::{ResourcePool, UnitCatalog, UnitKind};
use log::*;

/// Spawn candidates for the periodic scout probe: the two center-bottom
/// cells, one per half.
const PROBE_CANDIDATES: [(u8, u8); 2] = [(13, 0), (14, 0)];

/// Match-lifetime decision state: the unit catalog, the death memory, the
/// gate flags and the attack planner.
pub struct TurnDecisionEngine {
    catalog: UnitCatalog,
    tracker: EventTracker,
    gates: GateController,
    planner: AttackPlanner,
    turn: u32,
}

impl TurnDecisionEngine {
    pub fn new(catalog: UnitCatalog) -> Self {
        TurnDecisionEngine {
            catalog,
            tracker: EventTracker::new(),
            gates: GateController::new(),
            planner: AttackPlanner::new(),
            turn: 0,
        }
    }

    /// Ingest one raw action-frame payload from the previous turn.
    pub fn record_frame(&mut self, frame: &str) -> Result<(), serde_json::Error> {
        let records = parse_frame(frame)?;
        self.tracker.record(&records);
        Ok(())
    }

    /// Ingest already-parsed death records.
    pub fn record_deaths(&mut self, records: &[DeathRecord]) {
        self.tracker.record(records);
    }

    /// One full turn: repair, defense, gates, then the attack decision.
    pub fn run_turn(&mut self, board: &mut dyn GameBoard) -> AttackPlan {
        self.turn += 1;
        debug!("turn {} begins", self.turn);

        // Repair runs before the layout and gate passes: those rebuild
        // their own dead cells, and would leave the repair loop nothing to
        // reinforce.
        ReactiveRepair::apply(&mut self.tracker, board);
        DefenseBuilder::apply(board);
        self.gates.enforce(board);
        DefenseBuilder::rear_line(board);

        let mut plan = self.planner.run(board, &mut self.gates, &self.catalog);

        // When no wave is brewing, spend idle mobile resources on a periodic
        // scout probe down the least defended center lane.
        if plan == AttackPlan::Hold && self.gates.open_gate().is_none() {
            if let Some(wave) = self.scout_probe(board) {
                plan = AttackPlan::Launch(wave);
            }
        }

        DefenseBuilder::support_block(board);
        plan
    }

    fn scout_probe(&self, board: &mut dyn GameBoard) -> Option<Wave> {
        if self.turn <= 4 || self.turn % 3 != 1 {
            return None;
        }
        let candidates: Vec<Location> = PROBE_CANDIDATES
            .iter()
            .map(|&(x, y)| Location::from_xy(x, y))
            .collect();
        let cell = {
            let estimator = ThreatEstimator::new(&*board, &self.catalog);
            estimator.least_damage_cell(&candidates)?
        };
        let unit_cost = self.catalog.cost(UnitKind::Scout);
        if unit_cost <= 0.0 {
            return None;
        }
        let count = (board.available(ResourcePool::Mobile) / unit_cost) as u32;
        if count == 0 {
            return None;
        }
        let spawned = board.try_spawn(UnitKind::Scout, cell, count);
        if spawned == 0 {
            return None;
        }
        info!(
            "scout probe of {spawned} from ({}, {})",
            cell.x(),
            cell.y()
        );
        Some(Wave {
            kind: UnitKind::Scout,
            cell,
            count: spawned,
        })
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn tracker(&self) -> &EventTracker {
        &self.tracker
    }

    pub fn gates(&self) -> &GateController {
        &self.gates
    }
}
