//! Path-based threat and damage estimation.
//!
//! Two concerns live here: ranking candidate spawn cells by the expected
//! damage a mover would soak along its projected path, and sizing the
//! saturating wave needed to punch an attack lane through stationary
//! defenders.

use crate::board::{Corner, GameBoard};
use crate::constants::*;
use crate::location::Location;
use crate::units::{UnitCatalog, UnitKind};

/// Which way a simulated attack lane drifts as it advances one row per step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaneDirection {
    /// Drift one column toward the left edge per row.
    Left,
    /// Drift one column toward the right edge per row.
    Right,
}

impl LaneDirection {
    pub fn dx(self) -> i8 {
        match self {
            LaneDirection::Left => -1,
            LaneDirection::Right => 1,
        }
    }

    /// The friendly edge a wave is released from for this lane: the corner
    /// opposite the drift direction.
    pub fn release_corner(self) -> Corner {
        match self {
            LaneDirection::Left => Corner::BottomRight,
            LaneDirection::Right => Corner::BottomLeft,
        }
    }

    pub const BOTH: [LaneDirection; 2] = [LaneDirection::Left, LaneDirection::Right];
}

/// Read-only estimator over one board snapshot.
pub struct ThreatEstimator<'a> {
    board: &'a dyn GameBoard,
    catalog: &'a UnitCatalog,
}

impl<'a> ThreatEstimator<'a> {
    pub fn new(board: &'a dyn GameBoard, catalog: &'a UnitCatalog) -> Self {
        ThreatEstimator { board, catalog }
    }

    /// Expected incoming damage along a path: for each cell, the number of
    /// opposing turrets able to attack it times the turret damage value.
    pub fn path_damage(&self, path: &[Location]) -> f32 {
        let turret_damage = self.catalog.damage(UnitKind::Turret);
        path.iter()
            .map(|&cell| self.board.attackers_in_range(cell, 0.0) as f32 * turret_damage)
            .sum()
    }

    /// Minimum number of saturating units needed to survive the lane starting
    /// at `start` and drifting in `direction`, walking one row per step until
    /// the lane leaves the arena.
    ///
    /// Each unit absorbs `SATURATION_FLOOR` hits before dying, so any
    /// resistance at all costs at least the floor; past that, every step
    /// already taken discounts one attacker hit. The estimate is monotone
    /// non-decreasing in lane length and exactly zero for an undefended lane.
    pub fn units_needed(&self, start: Location, direction: LaneDirection) -> u32 {
        let mut total = 0u32;
        let mut absorbed = 0u32;
        let mut cursor = Some(start);
        while let Some(cell) = cursor {
            let attackers = self.board.attackers_in_range(cell, 0.5);
            if attackers > 0 && total < SATURATION_FLOOR {
                total = SATURATION_FLOOR;
            }
            total += attackers.saturating_sub(absorbed);
            absorbed += 1;
            cursor = cell.offset(direction.dx(), 1);
        }
        total
    }

    /// The candidate spawn cell whose projected path to the edge soaks the
    /// least damage. Candidates with no path are excluded; ties resolve to
    /// the earliest candidate in input order.
    pub fn least_damage_cell(&self, candidates: &[Location]) -> Option<Location> {
        let mut best: Option<(f32, Location)> = None;
        for &candidate in candidates {
            let path = self.board.path_to_edge(candidate);
            if path.is_empty() {
                continue;
            }
            let damage = self.path_damage(&path);
            if best.map_or(true, |(least, _)| damage < least) {
                best = Some((damage, candidate));
            }
        }
        best.map(|(_, cell)| cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;
    use crate::units::UnitCatalog;

    fn loc(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    #[test]
    fn undefended_lane_needs_zero_units() {
        let board = SimBoard::new(UnitCatalog::default());
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        for direction in LaneDirection::BOTH {
            assert_eq!(estimator.units_needed(loc(17, 11), direction), 0);
            assert_eq!(estimator.units_needed(loc(0, 13), direction), 0);
        }
    }

    #[test]
    fn any_resistance_costs_at_least_the_saturation_floor() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.place_enemy(UnitKind::Turret, 17, 14);
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        let needed = estimator.units_needed(loc(17, 11), LaneDirection::Right);
        assert!(
            needed >= SATURATION_FLOOR,
            "defended lane must cost at least the floor, got {needed}"
        );
    }

    #[test]
    fn adding_a_defender_never_lowers_the_requirement() {
        let catalog = UnitCatalog::default();
        let mut board = SimBoard::new(UnitCatalog::default());
        board.place_enemy(UnitKind::Turret, 16, 15);
        let sparse = {
            let estimator = ThreatEstimator::new(&board, &catalog);
            estimator.units_needed(loc(17, 11), LaneDirection::Left)
        };
        board.place_enemy(UnitKind::Turret, 12, 18);
        board.place_enemy(UnitKind::Turret, 10, 20);
        let dense = {
            let estimator = ThreatEstimator::new(&board, &catalog);
            estimator.units_needed(loc(17, 11), LaneDirection::Left)
        };
        assert!(
            dense >= sparse,
            "extra defenders lowered the estimate: {dense} < {sparse}"
        );
    }

    #[test]
    fn requirement_is_monotone_in_lane_length() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // One turret over the head of the lane. Starting one row deeper on
        // the same diagonal truncates the walk from the covered end, so the
        // shorter walk can never need more units than the longer one.
        board.place_enemy(UnitKind::Turret, 18, 13);
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        let starts = [
            loc(17, 10),
            loc(18, 11),
            loc(19, 12),
            loc(20, 13),
            loc(21, 14),
            loc(22, 15),
        ];
        let needed: Vec<u32> = starts
            .iter()
            .map(|&start| estimator.units_needed(start, LaneDirection::Right))
            .collect();
        assert!(needed[0] >= SATURATION_FLOOR);
        // The lane past the coverage is free.
        assert_eq!(*needed.last().unwrap(), 0);
        for window in needed.windows(2) {
            assert!(
                window[0] >= window[1],
                "truncated lane needs more units: {needed:?}"
            );
        }
    }

    #[test]
    fn least_damage_prefers_the_safer_path() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // Covers the lower column-14 cells that (14, 0)'s path climbs
        // through, but nothing on column 13.
        board.place_enemy(UnitKind::Turret, 17, 3);
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        let pick = estimator.least_damage_cell(&[loc(14, 0), loc(13, 0)]);
        assert_eq!(pick, Some(loc(13, 0)));
    }

    #[test]
    fn least_damage_ties_resolve_to_first_candidate() {
        let board = SimBoard::new(UnitCatalog::default());
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        // Both candidates are unthreatened: equal (zero) damage.
        assert_eq!(
            estimator.least_damage_cell(&[loc(14, 0), loc(13, 0)]),
            Some(loc(14, 0))
        );
    }

    #[test]
    fn unreachable_candidates_are_excluded() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // Box in (13, 0) with friendly walls so no path exists.
        board.place_friendly(UnitKind::Wall, 12, 1);
        board.place_friendly(UnitKind::Wall, 13, 1);
        board.place_friendly(UnitKind::Wall, 14, 1);
        board.place_friendly(UnitKind::Wall, 14, 0);
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        assert_eq!(estimator.least_damage_cell(&[loc(13, 0)]), None);
    }

    #[test]
    fn path_damage_counts_covering_turrets() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.place_enemy(UnitKind::Turret, 13, 14);
        let catalog = UnitCatalog::default();
        let estimator = ThreatEstimator::new(&board, &catalog);
        let covered = estimator.path_damage(&[loc(13, 12)]);
        let uncovered = estimator.path_damage(&[loc(13, 5)]);
        assert_eq!(covered, catalog.damage(UnitKind::Turret));
        assert_eq!(uncovered, 0.0);
    }
}
