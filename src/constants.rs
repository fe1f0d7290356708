//! Board geometry and the named tunable thresholds of the decision engine.
//!
//! The threshold values mirror the match rules the engine was tuned against;
//! none of them is load-bearing for correctness and each can be adjusted
//! independently.

/// Width/height of the square bounding box of the diamond arena.
pub const BOARD_SIZE: u8 = 28;
/// Row count of the friendly half (rows `0..HALF_BOARD`).
pub const HALF_BOARD: u8 = 14;

/// Lowest row of the main defensive wall line. Gate footprint cells below
/// this row are not considered as lane starts by the attack planner.
pub const WALL_LINE_Y: u8 = 10;

/// Number of attacker hits a single saturating (Demolisher) unit survives.
/// Any defended lane requires at least this many units to punch through.
pub const SATURATION_FLOOR: u32 = 4;

/// A wall cell that has died strictly more than this many times gets a
/// reinforcing turret placed behind it before being rebuilt.
pub const REPEATED_DEATH_THRESHOLD: u32 = 4;

/// Fraction of the mobile pool the gate-opening readiness check is allowed
/// to commit (the remainder is held in reserve).
pub const READINESS_FRACTION: f32 = 0.75;
/// Flat cost headroom added on top of the readiness fraction.
pub const READINESS_BONUS: f32 = 5.0;

/// Smallest wave the planner will commit once a lane is selected, so that a
/// zero-resistance lane still gets a deterministic non-empty wave.
pub const MIN_WAVE: u32 = 1;

/// Attack range of a static point-defense (Turret) unit, used by the offline
/// board when counting attackers able to cover a cell.
pub const TURRET_RANGE: f32 = 3.5;
