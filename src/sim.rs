//! Offline implementation of [`GameBoard`] for tests and benches.
//!
//! The simulated board keeps a dense unit grid plus occupancy flags, charges
//! spawns against two resource counters, and projects mover paths with a
//! breadth-first search toward the diagonally opposite edge. It models
//! exactly what the engine observes through the trait; combat resolution is
//! out of scope.

use crate::arena::{ArenaArray, CellFlags};
use crate::board::{edge_cells, Corner, GameBoard};
use crate::constants::*;
use crate::location::Location;
use crate::units::{ResourcePool, UnitCatalog, UnitKind};
use fnv::FnvHashSet;
use pathfinding::prelude::bfs;

/// Which player a simulated unit belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Friendly,
    Enemy,
}

/// One static unit standing on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimUnit {
    pub kind: UnitKind,
    pub side: Side,
}

/// Successor offsets for the path projection, probed in this order. The
/// first-found shortest path therefore prefers climbing toward the opposing
/// half before drifting sideways.
const PATH_STEPS: [(i8, i8); 4] = [(0, 1), (-1, 0), (1, 0), (0, -1)];

/// In-memory board: dense unit grid, occupancy flags, resource counters and
/// a log of every mover wave released.
pub struct SimBoard {
    cells: ArenaArray<Option<SimUnit>>,
    flags: ArenaArray<CellFlags>,
    structural: f32,
    mobile: f32,
    catalog: UnitCatalog,
    /// Every successful mover spawn batch, in issue order.
    pub spawn_log: Vec<(UnitKind, Location, u32)>,
}

impl SimBoard {
    pub fn new(catalog: UnitCatalog) -> Self {
        SimBoard {
            cells: ArenaArray::new(None),
            flags: ArenaArray::new(CellFlags::NONE),
            structural: 0.0,
            mobile: 0.0,
            catalog,
            spawn_log: Vec::new(),
        }
    }

    pub fn set_resources(&mut self, structural: f32, mobile: f32) {
        self.structural = structural;
        self.mobile = mobile;
    }

    /// Place an opposing static unit directly, bypassing costs.
    pub fn place_enemy(&mut self, kind: UnitKind, x: u8, y: u8) {
        self.place(kind, Location::from_xy(x, y), Side::Enemy);
    }

    /// Place a friendly static unit directly, bypassing costs.
    pub fn place_friendly(&mut self, kind: UnitKind, x: u8, y: u8) {
        self.place(kind, Location::from_xy(x, y), Side::Friendly);
    }

    fn place(&mut self, kind: UnitKind, cell: Location, side: Side) {
        debug_assert!(kind.is_static());
        let (x, y) = (cell.x() as usize, cell.y() as usize);
        self.cells.set(x, y, Some(SimUnit { kind, side }));
        let side_flag = match side {
            Side::Friendly => CellFlags::FRIENDLY,
            Side::Enemy => CellFlags::ENEMY,
        };
        self.flags.set(x, y, CellFlags::STRUCTURE | side_flag);
    }

    fn clear(&mut self, cell: Location) {
        let (x, y) = (cell.x() as usize, cell.y() as usize);
        self.cells.set(x, y, None);
        self.flags.set(x, y, CellFlags::NONE);
    }

    pub fn unit_at(&self, cell: Location) -> Option<SimUnit> {
        *self.cells.get(cell.x() as usize, cell.y() as usize)
    }

    fn flags_at(&self, cell: Location) -> CellFlags {
        *self.flags.get(cell.x() as usize, cell.y() as usize)
    }

    /// The edge a mover spawned at `start` walks toward: the diagonally
    /// opposite one.
    fn target_edge(start: Location) -> Corner {
        let left_half = start.x() < HALF_BOARD;
        if start.y() < HALF_BOARD {
            if left_half {
                Corner::TopRight
            } else {
                Corner::TopLeft
            }
        } else if left_half {
            Corner::BottomRight
        } else {
            Corner::BottomLeft
        }
    }
}

impl GameBoard for SimBoard {
    fn occupied(&self, cell: Location) -> bool {
        self.flags_at(cell).contains(CellFlags::STRUCTURE)
    }

    /// Counts opposing turrets within range of `cell`, scanning row-major.
    /// The health fraction is irrelevant here: simulated turrets never lose
    /// range as they take damage.
    fn attackers_in_range(&self, cell: Location, _target_health_fraction: f32) -> u32 {
        let range_sq = TURRET_RANGE * TURRET_RANGE;
        self.cells
            .iter()
            .filter(|(_, unit)| {
                matches!(
                    unit,
                    Some(SimUnit {
                        kind: UnitKind::Turret,
                        side: Side::Enemy,
                    })
                )
            })
            .filter(|&((x, y), _)| {
                cell.dist_sq(Location::from_xy(x as u8, y as u8)) as f32 <= range_sq
            })
            .count() as u32
    }

    fn path_to_edge(&self, start: Location) -> Vec<Location> {
        if self.occupied(start) {
            return Vec::new();
        }
        let targets: FnvHashSet<Location> =
            edge_cells(Self::target_edge(start)).into_iter().collect();
        bfs(
            &start,
            |&cell| {
                PATH_STEPS
                    .iter()
                    .filter_map(|&(dx, dy)| cell.offset(dx, dy))
                    .filter(|&next| !self.occupied(next))
                    .collect::<Vec<_>>()
            },
            |cell| targets.contains(cell),
        )
        .unwrap_or_default()
    }

    fn try_spawn(&mut self, kind: UnitKind, cell: Location, count: u32) -> u32 {
        if count == 0 || self.occupied(cell) {
            return 0;
        }
        let cost = self.catalog.cost(kind);
        if kind.is_static() {
            // Statics deploy one per cell, on the friendly half only.
            if cell.y() >= HALF_BOARD || self.structural < cost {
                return 0;
            }
            self.structural -= cost;
            self.place(kind, cell, Side::Friendly);
            1
        } else {
            let mut spawned = 0;
            while spawned < count && self.mobile >= cost {
                self.mobile -= cost;
                spawned += 1;
            }
            if spawned > 0 {
                self.spawn_log.push((kind, cell, spawned));
            }
            spawned
        }
    }

    fn try_remove(&mut self, cells: &[Location]) -> u32 {
        let mut removed = 0;
        for &cell in cells {
            if self
                .flags_at(cell)
                .contains(CellFlags::STRUCTURE | CellFlags::FRIENDLY)
            {
                self.clear(cell);
                removed += 1;
            }
        }
        removed
    }

    fn available(&self, pool: ResourcePool) -> f32 {
        match pool {
            ResourcePool::Structural => self.structural,
            ResourcePool::Mobile => self.mobile,
        }
    }
}
