//! Board-sized storage for the offline arena: a dense `BOARD_SIZE` square
//! array addressed row-major, plus per-cell occupancy flags.
//!
//! Cells outside the diamond are still backed by storage; callers are
//! expected to gate access with [`crate::location::in_arena`].

use crate::constants::*;
use bitflags::bitflags;

bitflags! {
    /// Fast per-cell occupancy summary kept alongside the unit grid.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const NONE = 0;
        /// A static unit occupies the cell.
        const STRUCTURE = 1;
        /// The occupant is friendly.
        const FRIENDLY = 2;
        /// The occupant is opposing.
        const ENEMY = 4;
    }
}

/// A `BOARD_SIZE` x `BOARD_SIZE` array for per-cell data, row-major.
#[derive(Clone)]
pub struct ArenaArray<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> ArenaArray<T> {
    pub fn new(initial: T) -> Self {
        ArenaArray {
            data: vec![initial; (BOARD_SIZE as usize) * (BOARD_SIZE as usize)],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * (BOARD_SIZE as usize) + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.data[y * (BOARD_SIZE as usize) + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    /// Row-major iteration over all cells of the bounding square. Scans that
    /// must be deterministic (attacker counting, enemy detection) rely on
    /// this order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.data.iter().enumerate().map(|(i, v)| {
            let x = i % (BOARD_SIZE as usize);
            let y = i / (BOARD_SIZE as usize);
            ((x, y), v)
        })
    }
}
