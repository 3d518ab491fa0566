//! Enumeration types for the Palisade game core.
//!
//! Movement missions and statuses are real enums rather than free-form
//! strings so that illegal states are unrepresentable: the only legal
//! transitions are `outbound -> resolved` and `outbound -> canceled`, and
//! both terminal states are just that -- terminal.
//!
//! Every enum carries a stable lowercase string codec (`as_str` /
//! [`FromStr`]) used by the database layer and the shell payload.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a database string does not map to an enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct EnumParseError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain assigned to a world tile by the deterministic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Open grassland; the most common terrain.
    Plains,
    /// Dense woodland.
    Forest,
    /// Elevated rocky ground.
    Hills,
    /// Impassable water.
    Water,
}

impl Terrain {
    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Hills => "hills",
            Self::Water => "water",
        }
    }
}

impl FromStr for Terrain {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plains" => Ok(Self::Plains),
            "forest" => Ok(Self::Forest),
            "hills" => Ok(Self::Hills),
            "water" => Ok(Self::Water),
            other => Err(EnumParseError::new("terrain", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// A recruitable unit kind.
///
/// The roster is deliberately small; all unit behavior (cost, speed, combat
/// power, carry capacity) is table-driven in `palisade-military`, so adding
/// a kind means adding a variant and extending those tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Cheap, fast, high carry capacity, weak defense.
    Spearman,
    /// Expensive, slow, strong defense.
    Swordsman,
}

impl UnitType {
    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spearman => "spearman",
            Self::Swordsman => "swordsman",
        }
    }
}

impl FromStr for UnitType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spearman" => Ok(Self::Spearman),
            "swordsman" => Ok(Self::Swordsman),
            other => Err(EnumParseError::new("unit type", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// A building slot in a village. Every village has all five, each with an
/// independent level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Administrative center.
    MainBuilding,
    /// Produces wood.
    TimberCamp,
    /// Produces clay.
    ClayPit,
    /// Produces iron.
    IronMine,
    /// Determines the storage cap for all three resources.
    Warehouse,
}

impl BuildingType {
    /// All building kinds, in shell-payload order.
    pub const ALL: [Self; 5] = [
        Self::MainBuilding,
        Self::TimberCamp,
        Self::ClayPit,
        Self::IronMine,
        Self::Warehouse,
    ];

    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainBuilding => "main_building",
            Self::TimberCamp => "timber_camp",
            Self::ClayPit => "clay_pit",
            Self::IronMine => "iron_mine",
            Self::Warehouse => "warehouse",
        }
    }
}

impl FromStr for BuildingType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main_building" => Ok(Self::MainBuilding),
            "timber_camp" => Ok(Self::TimberCamp),
            "clay_pit" => Ok(Self::ClayPit),
            "iron_mine" => Ok(Self::IronMine),
            "warehouse" => Ok(Self::Warehouse),
            other => Err(EnumParseError::new("building type", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// The purpose of a troop movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mission {
    /// Troops marching toward a target village to fight its garrison.
    Attack,
    /// Survivors carrying loot back to their home village.
    Return,
}

impl Mission {
    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Return => "return",
        }
    }
}

impl FromStr for Mission {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attack" => Ok(Self::Attack),
            "return" => Ok(Self::Return),
            other => Err(EnumParseError::new("mission", other)),
        }
    }
}

/// Lifecycle state of a troop movement.
///
/// `Outbound` is the only non-terminal state. The orchestrator transitions
/// a movement exactly once, guarded by a check-and-set on this field inside
/// the resolving transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStatus {
    /// In flight; will be resolved once `arrives_at` passes.
    Outbound,
    /// Arrived and processed (combat fought or troops returned home).
    Resolved,
    /// Recalled by the owner before arrival.
    Canceled,
}

impl MovementStatus {
    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Resolved => "resolved",
            Self::Canceled => "canceled",
        }
    }
}

impl FromStr for MovementStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outbound" => Ok(Self::Outbound),
            "resolved" => Ok(Self::Resolved),
            "canceled" => Ok(Self::Canceled),
            other => Err(EnumParseError::new("movement status", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Battle outcome
// ---------------------------------------------------------------------------

/// Outcome of a resolved battle, from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// The attacker won; survivors plunder and march home.
    Victory,
    /// The defender held; the attacking force was wiped out.
    Defeat,
}

impl BattleOutcome {
    /// Stable lowercase code stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }
}

impl FromStr for BattleOutcome {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "victory" => Ok(Self::Victory),
            "defeat" => Ok(Self::Defeat),
            other => Err(EnumParseError::new("battle outcome", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Village kind (shell tagging)
// ---------------------------------------------------------------------------

/// How a foreign village is tagged in the shell payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillageKind {
    /// Owned by another player account.
    Player,
    /// Owned by the NPC account seeded at world setup.
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trips() {
        for terrain in [Terrain::Plains, Terrain::Forest, Terrain::Hills, Terrain::Water] {
            assert_eq!(terrain.as_str().parse::<Terrain>().ok(), Some(terrain));
        }
        for unit in [UnitType::Spearman, UnitType::Swordsman] {
            assert_eq!(unit.as_str().parse::<UnitType>().ok(), Some(unit));
        }
        for building in BuildingType::ALL {
            assert_eq!(
                building.as_str().parse::<BuildingType>().ok(),
                Some(building)
            );
        }
        for status in [
            MovementStatus::Outbound,
            MovementStatus::Resolved,
            MovementStatus::Canceled,
        ] {
            assert_eq!(
                status.as_str().parse::<MovementStatus>().ok(),
                Some(status)
            );
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "militia".parse::<UnitType>();
        assert_eq!(
            err,
            Err(EnumParseError {
                kind: "unit type",
                value: "militia".to_owned()
            })
        );
    }
}
