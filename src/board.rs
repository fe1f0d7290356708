//! The collaborator surface the engine consumes.
//!
//! Everything the decision engine knows about the live game passes through
//! [`GameBoard`]: occupancy queries, attacker coverage, pathfinding, spawn
//! and removal attempts, and the resource ledger. In-game drivers implement
//! this against the real arena; [`crate::sim`] implements it offline for
//! tests and benches.

use crate::constants::*;
use crate::location::Location;
use crate::units::{ResourcePool, UnitKind};

/// The four corners of the diamond arena. Movers spawn on the two friendly
/// (bottom) edges and target the opposing edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Narrow interface over the live board, the spawn primitives and the
/// resource ledger.
///
/// Spawn and removal attempts are best-effort: a blocked cell or an
/// unaffordable request is a silent no-op (reported through the returned
/// count), never an error.
pub trait GameBoard {
    /// Whether a static unit occupies the cell.
    fn occupied(&self, cell: Location) -> bool;

    /// Count of opposing static attackers whose range covers `cell`, with the
    /// defender evaluated at the given remaining-health fraction.
    fn attackers_in_range(&self, cell: Location, target_health_fraction: f32) -> u32;

    /// The projected path a mover spawned at `start` would take to the
    /// opposing edge. Empty when no path exists.
    fn path_to_edge(&self, start: Location) -> Vec<Location>;

    /// Attempt to spawn `count` units of `kind` at `cell`; returns how many
    /// were actually placed (0 when blocked or unaffordable).
    fn try_spawn(&mut self, kind: UnitKind, cell: Location, count: u32) -> u32;

    /// Attempt to remove own structures on the given cells; returns how many
    /// removals were issued. Blocked cells are skipped silently.
    fn try_remove(&mut self, cells: &[Location]) -> u32;

    /// Currently available amount in the given resource pool.
    fn available(&self, pool: ResourcePool) -> f32;

    /// The ordered cells of one arena edge, ascending by column.
    fn edge_cells(&self, corner: Corner) -> Vec<Location> {
        edge_cells(corner)
    }
}

/// Pure-geometry edge enumeration backing the default [`GameBoard::edge_cells`].
pub fn edge_cells(corner: Corner) -> Vec<Location> {
    let half = HALF_BOARD;
    let size = BOARD_SIZE;
    let cells = |xs: std::ops::Range<u8>, y_of: fn(u8) -> u8| {
        xs.map(move |x| Location::from_xy(x, y_of(x))).collect()
    };
    match corner {
        Corner::BottomLeft => cells(0..half, |x| HALF_BOARD - 1 - x),
        Corner::BottomRight => cells(half..size, |x| x - HALF_BOARD),
        Corner::TopLeft => cells(0..half, |x| x + HALF_BOARD),
        Corner::TopRight => cells(half..size, |x| 2 * BOARD_SIZE - HALF_BOARD - 1 - x),
    }
}

/// Issue one spawn attempt per cell for a batch of placements of one kind;
/// returns the number of successful spawns. Occupied cells no-op.
pub fn try_spawn_batch(
    board: &mut dyn GameBoard,
    kind: UnitKind,
    cells: impl IntoIterator<Item = Location>,
) -> u32 {
    cells
        .into_iter()
        .map(|cell| board.try_spawn(kind, cell, 1))
        .sum()
}
