//! Combat-event ingestion and cross-turn death memory.
//!
//! The previous turn's action frames report every destroyed unit as a tuple
//! `[[x, y], typeCode, stationaryFlag, ownerCode, selfRemovedFlag]` with
//! `ownerCode == 1` meaning self. Only self-owned, non-self-removed Wall and
//! Turret deaths are retained: they bump the cell's death count and enqueue
//! the cell for reactive repair.

use crate::location::Location;
use crate::units::UnitKind;
use fnv::FnvHashMap;
use log::*;
use serde::Deserialize;

/// One destroyed unit, as reported once per action-frame batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeathRecord {
    pub cell: Location,
    pub kind: UnitKind,
    pub owned_by_self: bool,
    pub self_removed: bool,
}

#[derive(Deserialize)]
struct RawDeath([i32; 2], u8, u8, u8, u8);

#[derive(Deserialize, Default)]
struct RawEvents {
    #[serde(default)]
    death: Vec<RawDeath>,
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    events: RawEvents,
}

/// Extract the death records from one raw action-frame payload.
///
/// A frame without an `events.death` array parses as an empty batch. Records
/// with coordinates outside the arena or an unknown type code are dropped.
pub fn parse_frame(frame: &str) -> Result<Vec<DeathRecord>, serde_json::Error> {
    let frame: RawFrame = serde_json::from_str(frame)?;
    Ok(frame
        .events
        .death
        .into_iter()
        .filter_map(|RawDeath([x, y], type_code, _stationary, owner, removed)| {
            let cell = Location::from_signed(x as i16, y as i16)?;
            let kind = UnitKind::from_type_code(type_code)?;
            Some(DeathRecord {
                cell,
                kind,
                owned_by_self: owner == 1,
                self_removed: removed != 0,
            })
        })
        .collect())
}

/// Cross-turn memory of which defensive cells died and how often, plus the
/// ordered rebuild queues consumed by reactive repair.
///
/// Cells enter a queue when the matching unit dies (appended) and leave it
/// once a rebuild spawn at that cell succeeds, or once the cell is found
/// standing again; the queues are drained from the most-recently-added end,
/// so fresh damage is repaired first.
#[derive(Default)]
pub struct EventTracker {
    death_counts: FnvHashMap<Location, u32>,
    pub(crate) turret_queue: Vec<Location>,
    pub(crate) wall_queue: Vec<Location>,
}

impl EventTracker {
    pub fn new() -> Self {
        EventTracker::default()
    }

    /// Ingest one turn's death batch. Must be called exactly once per batch:
    /// replaying the same events would double-count them.
    pub fn record(&mut self, records: &[DeathRecord]) {
        for record in records {
            if !record.owned_by_self || record.self_removed {
                continue;
            }
            match record.kind {
                UnitKind::Turret => self.turret_queue.push(record.cell),
                UnitKind::Wall => self.wall_queue.push(record.cell),
                _ => continue,
            }
            *self.death_counts.entry(record.cell).or_insert(0) += 1;
            debug!(
                "death recorded at ({}, {}), count {}",
                record.cell.x(),
                record.cell.y(),
                self.death_counts[&record.cell]
            );
        }
    }

    /// How many times a defensive unit has died on this cell.
    pub fn death_count(&self, cell: Location) -> u32 {
        self.death_counts.get(&cell).copied().unwrap_or(0)
    }

    /// Turret cells still awaiting rebuild, oldest first.
    pub fn turret_backlog(&self) -> &[Location] {
        &self.turret_queue
    }

    /// Wall cells still awaiting rebuild, oldest first.
    pub fn wall_backlog(&self) -> &[Location] {
        &self.wall_queue
    }
}
