//! Per-turn decision engine for a grid-based, resource-constrained tower-war
//! simulation. Each turn the engine consumes one board snapshot (through the
//! [`board::GameBoard`] trait), places tiered static defenses, rebuilds what
//! died last turn, drives the six attack-lane gates, and decides whether to
//! launch a saturating offensive wave before the turn deadline.
//!
//! The board representation, pathfinding, the resource ledger and the process
//! loop are external collaborators; the engine only talks to them through the
//! narrow interfaces in [`board`]. An offline implementation of those
//! interfaces for tests and benches lives in [`sim`].

pub mod arena;
pub mod attack;
pub mod board;
pub mod constants;
pub mod defense;
pub mod engine;
pub mod events;
pub mod gates;
pub mod location;
pub mod sim;
pub mod threat;
pub mod units;

pub use attack::{AttackPlan, AttackPlanner, Wave};
pub use board::{Corner, GameBoard};
pub use engine::TurnDecisionEngine;
pub use events::{DeathRecord, EventTracker};
pub use gates::GateController;
pub use location::Location;
pub use threat::{LaneDirection, ThreatEstimator};
pub use units::{ResourcePool, UnitCatalog, UnitKind};
