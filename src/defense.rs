//! Static defense placement: the tiered base layout and the reactive repair
//! of cells that died last turn.

use crate::board::{try_spawn_batch, GameBoard};
use crate::constants::*;
use crate::events::EventTracker;
use crate::location::{Location, NEIGHBORS_4};
use crate::units::UnitKind;
use log::*;

/// One priority tier of the fixed layout: a batch of cells for one kind.
struct Tier {
    kind: UnitKind,
    cells: &'static [(u8, u8)],
}

/// The fixed-priority base layout, attempted strictly in order every turn so
/// that the highest-priority cells are funded first and later tiers degrade
/// gracefully when resources run out.
///
/// Tier 0 is the minimal soak-plus-turret core, tier 1 covers the corners,
/// tier 2 fills out the wall line.
const PRIORITY_TIERS: [Tier; 5] = [
    Tier {
        kind: UnitKind::Wall,
        cells: &[(8, 11), (14, 11), (20, 11)],
    },
    Tier {
        kind: UnitKind::Turret,
        cells: &[(8, 10), (14, 10), (20, 10)],
    },
    Tier {
        kind: UnitKind::Wall,
        cells: &[(2, 13), (3, 13), (24, 13), (25, 13), (4, 12), (23, 12)],
    },
    Tier {
        kind: UnitKind::Turret,
        cells: &[(3, 12), (24, 12)],
    },
    Tier {
        kind: UnitKind::Wall,
        cells: &[
            (4, 11),
            (7, 11),
            (9, 11),
            (12, 11),
            (13, 11),
            (15, 11),
            (16, 11),
            (19, 11),
            (21, 11),
        ],
    },
];

/// Second wall row behind the main line, attempted after gate sealing.
const REAR_LINE: &[(u8, u8)] = &[
    (7, 10),
    (9, 10),
    (12, 10),
    (13, 10),
    (15, 10),
    (16, 10),
    (19, 10),
    (21, 10),
];

/// Shield block boosting movers on their way out, funded from whatever
/// structural resources are left at the end of the turn.
const SUPPORT_BLOCK: &[(u8, u8)] = &[(13, 2), (14, 2), (13, 3), (14, 3), (13, 4), (14, 4)];

/// Idempotently places the fixed base layout. Never removes anything; spawn
/// attempts on occupied cells are no-ops.
pub struct DefenseBuilder;

impl DefenseBuilder {
    /// Attempt the priority tiers in order.
    pub fn apply(board: &mut dyn GameBoard) {
        for tier in &PRIORITY_TIERS {
            try_spawn_batch(board, tier.kind, locations(tier.cells));
        }
    }

    /// Attempt the rear wall line.
    pub fn rear_line(board: &mut dyn GameBoard) {
        try_spawn_batch(board, UnitKind::Wall, locations(REAR_LINE));
    }

    /// Top up the shield block with spare structural resources.
    pub fn support_block(board: &mut dyn GameBoard) {
        try_spawn_batch(board, UnitKind::Shield, locations(SUPPORT_BLOCK));
    }
}

fn locations(cells: &'static [(u8, u8)]) -> impl Iterator<Item = Location> {
    cells.iter().map(|&(x, y)| Location::from_xy(x, y))
}

/// Rebuilds defensive cells recorded in the death memory, most recent deaths
/// first, stopping a queue for the turn as soon as a rebuild can no longer be
/// funded.
///
/// Cells that keep dying get reinforced: a dead turret gets a flanking
/// turret next to it, a wall past the repeated-death threshold gets a turret
/// one row behind it.
pub struct ReactiveRepair;

impl ReactiveRepair {
    pub fn apply(tracker: &mut EventTracker, board: &mut dyn GameBoard) {
        Self::drain_turrets(tracker, board);
        Self::drain_walls(tracker, board);
    }

    fn drain_turrets(tracker: &mut EventTracker, board: &mut dyn GameBoard) {
        let mut index = tracker.turret_queue.len();
        while index > 0 {
            index -= 1;
            let cell = tracker.turret_queue[index];
            // A stale entry: an earlier spawn already restored this cell, so
            // retire it rather than rescan it every turn.
            if board.occupied(cell) {
                let _ = tracker.turret_queue.remove(index);
                continue;
            }
            // Flanking reinforcement: first free orthogonal neighbor, in the
            // order left, right, below, above.
            for (dx, dy) in NEIGHBORS_4 {
                if let Some(flank) = cell.offset(dx, dy) {
                    if !board.occupied(flank) && board.try_spawn(UnitKind::Turret, flank, 1) == 1 {
                        break;
                    }
                }
            }
            if board.try_spawn(UnitKind::Turret, cell, 1) == 1 {
                let _ = tracker.turret_queue.remove(index);
                debug!("rebuilt turret at ({}, {})", cell.x(), cell.y());
            } else {
                // The cell is free, so the failure is a funding failure:
                // stop and retry the remaining entries next turn.
                break;
            }
        }
    }

    fn drain_walls(tracker: &mut EventTracker, board: &mut dyn GameBoard) {
        let mut index = tracker.wall_queue.len();
        while index > 0 {
            index -= 1;
            let cell = tracker.wall_queue[index];
            if board.occupied(cell) {
                let _ = tracker.wall_queue.remove(index);
                continue;
            }
            // A wall that keeps dying gets a turret one row behind it before
            // being rebuilt: down-left, straight down, down-right.
            if tracker.death_count(cell) > REPEATED_DEATH_THRESHOLD {
                for dx in [-1, 0, 1] {
                    if let Some(backer) = cell.offset(dx, -1) {
                        if !board.occupied(backer)
                            && board.try_spawn(UnitKind::Turret, backer, 1) == 1
                        {
                            break;
                        }
                    }
                }
            }
            if board.try_spawn(UnitKind::Wall, cell, 1) == 1 {
                let _ = tracker.wall_queue.remove(index);
                debug!("rebuilt wall at ({}, {})", cell.x(), cell.y());
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DeathRecord;
    use crate::sim::SimBoard;
    use crate::units::{ResourcePool, UnitCatalog};

    fn loc(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    fn death(cell: Location, kind: UnitKind) -> DeathRecord {
        DeathRecord {
            cell,
            kind,
            owned_by_self: true,
            self_removed: false,
        }
    }

    #[test]
    fn layout_places_core_tier_first() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // Exactly enough for tier 0: three walls and three turrets.
        board.set_resources(3.0 * 1.0 + 3.0 * 3.0, 0.0);
        DefenseBuilder::apply(&mut board);
        for (x, y) in [(8, 11), (14, 11), (20, 11), (8, 10), (14, 10), (20, 10)] {
            assert!(board.occupied(loc(x, y)), "core cell ({x}, {y}) missing");
        }
        // Nothing left for the corner tier.
        assert!(!board.occupied(loc(2, 13)));
        assert_eq!(board.available(ResourcePool::Structural), 0.0);
    }

    #[test]
    fn layout_is_idempotent() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(1000.0, 0.0);
        DefenseBuilder::apply(&mut board);
        let after_first = board.available(ResourcePool::Structural);
        DefenseBuilder::apply(&mut board);
        assert_eq!(board.available(ResourcePool::Structural), after_first);
    }

    #[test]
    fn dead_turret_gets_flank_then_rebuild() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 0.0);
        let mut tracker = EventTracker::new();
        tracker.record(&[death(loc(8, 8), UnitKind::Turret)]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        // Left flank first, then the cell itself.
        assert!(board.occupied(loc(7, 8)));
        assert!(board.occupied(loc(8, 8)));
        assert!(tracker.turret_backlog().is_empty());
    }

    #[test]
    fn occupied_flank_falls_through_to_next_neighbor() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 0.0);
        board.place_friendly(UnitKind::Wall, 7, 8);
        let mut tracker = EventTracker::new();
        tracker.record(&[death(loc(8, 8), UnitKind::Turret)]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        // Left is blocked, so the right flank gets the reinforcement.
        assert!(board.occupied(loc(9, 8)));
        assert!(board.occupied(loc(8, 8)));
    }

    #[test]
    fn unfunded_rebuild_preserves_the_queue() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(0.0, 0.0);
        let mut tracker = EventTracker::new();
        tracker.record(&[
            death(loc(8, 8), UnitKind::Turret),
            death(loc(9, 9), UnitKind::Turret),
        ]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        assert_eq!(tracker.turret_backlog(), &[loc(8, 8), loc(9, 9)]);
        assert!(!board.occupied(loc(8, 8)));
        assert!(!board.occupied(loc(9, 9)));
    }

    #[test]
    fn most_recent_death_repairs_first() {
        let mut board = SimBoard::new(UnitCatalog::default());
        // One turret plus its flank: 2 spawns at cost 3, then nothing.
        board.set_resources(6.0, 0.0);
        let mut tracker = EventTracker::new();
        tracker.record(&[
            death(loc(8, 8), UnitKind::Turret),
            death(loc(9, 9), UnitKind::Turret),
        ]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        // (9, 9) entered last, so it is repaired first; (8, 8) waits.
        assert!(board.occupied(loc(9, 9)));
        assert_eq!(tracker.turret_backlog(), &[loc(8, 8)]);
    }

    #[test]
    fn repeatedly_dead_wall_gets_a_backing_turret() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 0.0);
        let mut tracker = EventTracker::new();
        // Five deaths exceed the threshold of four.
        for _ in 0..5 {
            tracker.record(&[death(loc(10, 10), UnitKind::Wall)]);
        }
        // Drain the earlier queue entries so one remains.
        tracker.wall_queue.truncate(1);

        ReactiveRepair::apply(&mut tracker, &mut board);

        let backers = [loc(9, 9), loc(10, 9), loc(11, 9)];
        assert!(
            backers.iter().any(|&cell| board.occupied(cell)),
            "expected a backing turret behind the repeatedly dying wall"
        );
        assert!(board.occupied(loc(10, 10)));
        assert!(tracker.wall_backlog().is_empty());
    }

    #[test]
    fn wall_below_threshold_is_rebuilt_without_backing() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 0.0);
        let mut tracker = EventTracker::new();
        tracker.record(&[death(loc(10, 10), UnitKind::Wall)]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        assert!(board.occupied(loc(10, 10)));
        for cell in [loc(9, 9), loc(10, 9), loc(11, 9)] {
            assert!(!board.occupied(cell), "no backing turret below threshold");
        }
    }

    #[test]
    fn standing_cell_entry_is_retired_without_spending() {
        let mut board = SimBoard::new(UnitCatalog::default());
        board.set_resources(100.0, 0.0);
        board.place_friendly(UnitKind::Turret, 8, 10);
        let mut tracker = EventTracker::new();
        tracker.record(&[
            death(loc(8, 8), UnitKind::Turret),
            death(loc(8, 10), UnitKind::Turret),
        ]);

        ReactiveRepair::apply(&mut tracker, &mut board);

        // (8, 10) already stands again: its entry is dropped with no flank
        // and no spend, while (8, 8) still gets its full repair.
        assert!(tracker.turret_backlog().is_empty());
        assert!(board.occupied(loc(8, 8)));
        assert!(!board.occupied(loc(7, 10)));
        // One flank plus one rebuild for (8, 8), nothing for (8, 10).
        assert_eq!(board.available(ResourcePool::Structural), 94.0);
    }
}
