//! Persisted entity structs and shared value types.
//!
//! These structs mirror the durable store row-for-row: the game core reads
//! them at the start of a request, advances them through the catch-up pass,
//! and writes them back in the same transaction. None of them hold derived
//! state -- production rates, capacities, and costs are always recomputed
//! from building levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{BattleOutcome, BuildingType, Mission, MovementStatus, Terrain, UnitType};
use crate::ids::{AccountId, MovementId, QueueItemId, ReportId, VillageId};

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// An integer coordinate on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, 0-indexed from the west edge.
    pub x: i32,
    /// Row, 0-indexed from the north edge.
    pub y: i32,
}

impl Position {
    /// Create a position from raw coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Continuous Euclidean distance to another position, in tiles.
    ///
    /// Distance is never grid-stepped; rounding happens only at the final
    /// travel-time stage, so unit speed differences stay exact
    /// multiplicative factors of one shared distance.
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// A bundle of the three resource kinds, used for stocks, costs, and loot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Resources {
    /// Wood quantity.
    pub wood: i32,
    /// Clay quantity.
    pub clay: i32,
    /// Iron quantity.
    pub iron: i32,
}

impl Resources {
    /// The empty bundle.
    pub const ZERO: Self = Self {
        wood: 0,
        clay: 0,
        iron: 0,
    };

    /// Create a bundle from raw quantities.
    pub const fn new(wood: i32, clay: i32, iron: i32) -> Self {
        Self { wood, clay, iron }
    }

    /// Sum of all three quantities.
    pub const fn total(self) -> i32 {
        self.wood.saturating_add(self.clay).saturating_add(self.iron)
    }

    /// Multiply every quantity by `count` (saturating).
    pub const fn scaled(self, count: i32) -> Self {
        Self {
            wood: self.wood.saturating_mul(count),
            clay: self.clay.saturating_mul(count),
            iron: self.iron.saturating_mul(count),
        }
    }
}

/// Current per-hour production rates of a village, derived from its
/// resource-building levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRates {
    /// Wood produced per hour by the timber camp.
    pub wood_per_hour: i32,
    /// Clay produced per hour by the clay pit.
    pub clay_per_hour: i32,
    /// Iron produced per hour by the iron mine.
    pub iron_per_hour: i32,
}

// ---------------------------------------------------------------------------
// Village
// ---------------------------------------------------------------------------

/// A village: the unit of ownership and the subject of every catch-up pass.
///
/// Invariants maintained by the rules crates:
/// - each resource stock stays within `[0, warehouse_capacity(level)]`
/// - troop counts never go negative
/// - `last_tick_at` only moves forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    /// Unique identifier.
    pub id: VillageId,
    /// Owning account (player or NPC).
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// World position.
    pub position: Position,
    /// Wood in the warehouse.
    pub wood: i32,
    /// Clay in the warehouse.
    pub clay: i32,
    /// Iron in the warehouse.
    pub iron: i32,
    /// Main building level.
    pub main_building_level: i32,
    /// Timber camp level (drives wood production).
    pub timber_camp_level: i32,
    /// Clay pit level (drives clay production).
    pub clay_pit_level: i32,
    /// Iron mine level (drives iron production).
    pub iron_mine_level: i32,
    /// Warehouse level (drives storage capacity).
    pub warehouse_level: i32,
    /// Garrisoned spearmen.
    pub spearmen: i32,
    /// Garrisoned swordsmen.
    pub swordsmen: i32,
    /// Timestamp of the last applied resource accrual.
    pub last_tick_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Village {
    /// Current level of the given building.
    pub const fn building_level(&self, building: BuildingType) -> i32 {
        match building {
            BuildingType::MainBuilding => self.main_building_level,
            BuildingType::TimberCamp => self.timber_camp_level,
            BuildingType::ClayPit => self.clay_pit_level,
            BuildingType::IronMine => self.iron_mine_level,
            BuildingType::Warehouse => self.warehouse_level,
        }
    }

    /// Set the level of the given building.
    pub const fn set_building_level(&mut self, building: BuildingType, level: i32) {
        match building {
            BuildingType::MainBuilding => self.main_building_level = level,
            BuildingType::TimberCamp => self.timber_camp_level = level,
            BuildingType::ClayPit => self.clay_pit_level = level,
            BuildingType::IronMine => self.iron_mine_level = level,
            BuildingType::Warehouse => self.warehouse_level = level,
        }
    }

    /// Current garrison count for the given unit kind.
    pub const fn troop_count(&self, unit: UnitType) -> i32 {
        match unit {
            UnitType::Spearman => self.spearmen,
            UnitType::Swordsman => self.swordsmen,
        }
    }

    /// Set the garrison count for the given unit kind.
    pub const fn set_troop_count(&mut self, unit: UnitType, count: i32) {
        match unit {
            UnitType::Spearman => self.spearmen = count,
            UnitType::Swordsman => self.swordsmen = count,
        }
    }

    /// The village's resource stocks as one bundle.
    pub const fn resources(&self) -> Resources {
        Resources::new(self.wood, self.clay, self.iron)
    }

    /// Whether the stocks cover the given cost.
    pub const fn can_afford(&self, cost: Resources) -> bool {
        self.wood >= cost.wood && self.clay >= cost.clay && self.iron >= cost.iron
    }

    /// Subtract a non-negative cost from the stocks. Callers must check
    /// [`Self::can_afford`] first; affordability plus saturation keeps the
    /// non-negativity invariant intact.
    pub fn debit(&mut self, cost: Resources) {
        self.wood = self.wood.saturating_sub(cost.wood).max(0);
        self.clay = self.clay.saturating_sub(cost.clay).max(0);
        self.iron = self.iron.saturating_sub(cost.iron).max(0);
    }
}

// ---------------------------------------------------------------------------
// World tile
// ---------------------------------------------------------------------------

/// One immutable world-map tile. Generated once from the world seed and
/// persisted; regeneration is a no-op once any tile exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTile {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Generated terrain.
    pub terrain: Terrain,
}

// ---------------------------------------------------------------------------
// Troop movement
// ---------------------------------------------------------------------------

/// An army in flight between two villages.
///
/// Movements are never deleted; resolved and canceled rows remain as
/// history. The source/target village references must tolerate the
/// referenced village having changed since departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroopMovement {
    /// Unique identifier.
    pub id: MovementId,
    /// Village the army departed from.
    pub source_village_id: VillageId,
    /// Village the army is heading to.
    pub target_village_id: VillageId,
    /// The single unit kind in this army.
    pub unit_type: UnitType,
    /// How many units are marching.
    pub unit_count: i32,
    /// Why the army is marching.
    pub mission: Mission,
    /// Lifecycle state.
    pub status: MovementStatus,
    /// Loot carried home (zero on the attack leg).
    pub loot: Resources,
    /// Departure timestamp.
    pub departed_at: DateTime<Utc>,
    /// Scheduled arrival timestamp; the movement is due once this passes.
    pub arrives_at: DateTime<Utc>,
    /// When the orchestrator transitioned the movement to a terminal state.
    pub resolved_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Building queue item
// ---------------------------------------------------------------------------

/// A paid-for building upgrade waiting for its completion time.
///
/// The cost was debited at enqueue time, so completion increments the level
/// unconditionally. Completed items are retained as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingQueueItem {
    /// Unique identifier.
    pub id: QueueItemId,
    /// Village being upgraded.
    pub village_id: VillageId,
    /// Which building the upgrade applies to.
    pub building_type: BuildingType,
    /// When the upgrade was queued and paid for.
    pub created_at: DateTime<Utc>,
    /// Scheduled completion timestamp; the item is due once this passes.
    pub completes_at: DateTime<Utc>,
    /// When the orchestrator applied the level bump (`None` while pending).
    pub completed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Battle report
// ---------------------------------------------------------------------------

/// Write-once denormalized snapshot of a resolved combat.
///
/// Village names are copied at resolution time so the report stays readable
/// even after the villages change hands or are renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Unique identifier.
    pub id: ReportId,
    /// Account that launched the attack.
    pub attacker_account_id: AccountId,
    /// Account that owned the defending village at resolution time.
    pub defender_account_id: AccountId,
    /// Attacking village name at resolution time.
    pub attacker_village_name: String,
    /// Defending village name at resolution time.
    pub defender_village_name: String,
    /// Unit kind of the attacking army.
    pub unit_type: UnitType,
    /// Units the attacker sent.
    pub attacker_sent: i32,
    /// Attacker units that survived.
    pub attacker_survivors: i32,
    /// Defender units that survived.
    pub defender_survivors: i32,
    /// Resources plundered (zero on defeat).
    pub loot: Resources,
    /// Outcome from the attacker's point of view.
    pub outcome: BattleOutcome,
    /// Resolution timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(10, 10);
        let b = Position::new(13, 14);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn debit_never_goes_negative() {
        let mut village = test_village();
        village.debit(Resources::new(10_000, 10_000, 10_000));
        assert_eq!(village.resources(), Resources::ZERO);
    }

    #[test]
    fn scaled_cost_multiplies_each_resource() {
        let cost = Resources::new(50, 30, 10).scaled(4);
        assert_eq!(cost, Resources::new(200, 120, 40));
    }

    fn test_village() -> Village {
        Village {
            id: VillageId::new(),
            account_id: AccountId::new(),
            name: "Test".to_owned(),
            position: Position::new(0, 0),
            wood: 500,
            clay: 500,
            iron: 500,
            main_building_level: 1,
            timber_camp_level: 1,
            clay_pit_level: 1,
            iron_mine_level: 1,
            warehouse_level: 1,
            spearmen: 0,
            swordsmen: 0,
            last_tick_at: Utc::now(),
            created_at: Utc::now(),
        }
    }
}
