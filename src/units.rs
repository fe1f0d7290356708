//! Unit kinds, resource pools, and the per-match unit catalog.
//!
//! Costs and damage values are opaque to the engine: they are resolved once
//! at match start from the `unitInformation` table of the match config and
//! looked up by kind afterwards.

use serde::Deserialize;

/// The closed set of unit kinds.
///
/// `Wall`, `Shield` and `Turret` are static (cheap soak, resource-boosting
/// support, point defense); `Scout`, `Demolisher` and `Disruptor` are movers
/// (cheap fast, expensive saturating, disruption).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Wall,
    Shield,
    Turret,
    Scout,
    Demolisher,
    Disruptor,
}

impl UnitKind {
    /// All kinds, in wire type-code order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Shield,
        UnitKind::Turret,
        UnitKind::Scout,
        UnitKind::Demolisher,
        UnitKind::Disruptor,
    ];

    /// Stable wire type code (index into the config's unit table).
    pub fn type_code(self) -> u8 {
        match self {
            UnitKind::Wall => 0,
            UnitKind::Shield => 1,
            UnitKind::Turret => 2,
            UnitKind::Scout => 3,
            UnitKind::Demolisher => 4,
            UnitKind::Disruptor => 5,
        }
    }

    pub fn from_type_code(code: u8) -> Option<UnitKind> {
        UnitKind::ALL.get(code as usize).copied()
    }

    /// Static units stay where placed; movers traverse a path to the edge.
    pub fn is_static(self) -> bool {
        matches!(self, UnitKind::Wall | UnitKind::Shield | UnitKind::Turret)
    }

    /// The pool this kind is paid from: the slow structural pool for static
    /// units, the fast mobile pool for movers.
    pub fn pool(self) -> ResourcePool {
        if self.is_static() {
            ResourcePool::Structural
        } else {
            ResourcePool::Mobile
        }
    }
}

/// The two independently regenerating resource pools.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourcePool {
    /// Slow-regenerating pool spent on static units.
    Structural,
    /// Fast-regenerating pool spent on movers.
    Mobile,
}

#[derive(Deserialize)]
struct UnitInfo {
    #[serde(default)]
    shorthand: String,
    #[serde(default)]
    cost: f32,
    #[serde(default)]
    damage: f32,
}

#[derive(Deserialize)]
struct MatchConfig {
    #[serde(rename = "unitInformation")]
    unit_information: Vec<UnitInfo>,
}

/// Per-kind cost/damage/shorthand lookups, resolved once at match start.
#[derive(Clone, Debug)]
pub struct UnitCatalog {
    costs: [f32; 6],
    damages: [f32; 6],
    shorthands: [String; 6],
}

impl UnitCatalog {
    /// Parse the catalog out of the raw match-config JSON.
    ///
    /// Entries beyond the six known kinds are ignored; missing `cost` or
    /// `damage` fields default to zero.
    pub fn from_config_str(config: &str) -> Result<UnitCatalog, serde_json::Error> {
        let config: MatchConfig = serde_json::from_str(config)?;
        let mut catalog = UnitCatalog::zeroed();
        for (index, info) in config.unit_information.iter().take(6).enumerate() {
            catalog.costs[index] = info.cost;
            catalog.damages[index] = info.damage;
            catalog.shorthands[index] = info.shorthand.clone();
        }
        Ok(catalog)
    }

    fn zeroed() -> UnitCatalog {
        UnitCatalog {
            costs: [0.0; 6],
            damages: [0.0; 6],
            shorthands: Default::default(),
        }
    }

    pub fn cost(&self, kind: UnitKind) -> f32 {
        self.costs[kind.type_code() as usize]
    }

    pub fn damage(&self, kind: UnitKind) -> f32 {
        self.damages[kind.type_code() as usize]
    }

    pub fn shorthand(&self, kind: UnitKind) -> &str {
        &self.shorthands[kind.type_code() as usize]
    }
}

impl Default for UnitCatalog {
    /// Baseline values matching the ruleset the engine was tuned against.
    fn default() -> Self {
        UnitCatalog {
            //       Wall Shield Turret Scout Demolisher Disruptor
            costs: [1.0, 4.0, 3.0, 1.0, 3.0, 1.0],
            damages: [0.0, 0.0, 4.0, 1.0, 3.0, 10.0],
            shorthands: [
                "FF".to_string(),
                "EF".to_string(),
                "DF".to_string(),
                "PI".to_string(),
                "EI".to_string(),
                "SI".to_string(),
            ],
        }
    }
}
