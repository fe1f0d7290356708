//! Packed cell coordinates and diamond-arena geometry.

use crate::constants::*;
use serde::*;

/// A cell on the diamond arena, packed into a `u16` for cheap copies and
/// hashing. Equality and hashing are by value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    /// Build a location from coordinates known to lie inside the arena.
    pub fn from_xy(x: u8, y: u8) -> Self {
        debug_assert!(in_arena(x as i16, y as i16));
        Location {
            packed: ((x as u16) << 8) | y as u16,
        }
    }

    /// Build a location from signed coordinates, `None` if outside the arena.
    pub fn from_signed(x: i16, y: i16) -> Option<Self> {
        if in_arena(x, y) {
            Some(Location::from_xy(x as u8, y as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Offset by `(dx, dy)`, `None` if the result leaves the arena.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Location::from_signed(self.x() as i16 + dx as i16, self.y() as i16 + dy as i16)
    }

    /// Squared Euclidean distance to another cell.
    pub fn dist_sq(self, other: Self) -> i32 {
        let dx = self.x() as i32 - other.x() as i32;
        let dy = self.y() as i32 - other.y() as i32;
        dx * dx + dy * dy
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}

/// Whether `(x, y)` lies on the diamond arena.
///
/// The arena is the diamond inscribed in the `BOARD_SIZE` square: the bottom
/// (friendly) half is bounded by the diagonals `x + y = HALF_BOARD - 1` and
/// `x - y = HALF_BOARD`, the top half by their mirror images.
pub fn in_arena(x: i16, y: i16) -> bool {
    let size = BOARD_SIZE as i16;
    let half = HALF_BOARD as i16;
    if x < 0 || y < 0 || x >= size || y >= size {
        return false;
    }
    if y < half {
        x + y >= half - 1 && x - y <= half
    } else {
        x + y <= 3 * half - 1 && y - x <= half
    }
}

/// Orthogonal neighbor offsets in the order reactive repair probes flanks:
/// left, right, below, above.
pub const NEIGHBORS_4: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
