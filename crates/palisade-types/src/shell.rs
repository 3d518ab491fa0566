//! The world-shell payload: everything a viewer needs to render their
//! current state, assembled by the orchestrator after the catch-up pass.
//!
//! The shell is a pure data snapshot. All quantities in it are already
//! consistent with `server_time` -- resources accrued, due movements and
//! build items resolved -- because assembly happens strictly after the
//! catch-up transaction commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{BattleOutcome, BuildingType, Mission, MovementStatus, Terrain, UnitType, VillageKind};
use crate::ids::{AccountId, MovementId, QueueItemId, ReportId, VillageId};
use crate::structs::{ProductionRates, Resources};

/// Full response payload for a shell read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldShell {
    /// The viewing account.
    pub account_id: AccountId,
    /// Authoritative "now" the whole payload was evaluated at.
    pub server_time: DateTime<Utc>,
    /// The requested (fog-filtered) map window.
    pub world: WorldWindow,
    /// The viewer's villages, fully detailed.
    pub villages: Vec<VillageOverview>,
    /// In-flight movements involving the viewer, ordered by arrival.
    pub movements: Vec<MovementView>,
    /// Most recent battle reports involving the viewer.
    pub reports: Vec<ReportView>,
    /// Pending build-queue entries, ordered by completion.
    pub build_queue: Vec<QueueEntryView>,
    /// Foreign villages inside the requested window.
    pub visible_villages: Vec<VisibleVillage>,
}

/// The requested map window and the tiles revealed within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldWindow {
    /// World width in tiles.
    pub width: i32,
    /// World height in tiles.
    pub height: i32,
    /// World seed (stable for the lifetime of the world).
    pub seed: i32,
    /// Requested chunk column.
    pub chunk_x: i32,
    /// Requested chunk row.
    pub chunk_y: i32,
    /// Chunk edge length, after clamping.
    pub chunk_size: i32,
    /// Tiles revealed by fog-of-war within the window.
    pub tiles: Vec<TileView>,
}

/// One revealed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Terrain at this tile.
    pub terrain: Terrain,
}

/// Detailed view of one of the viewer's own villages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageOverview {
    /// Village identifier.
    pub id: VillageId,
    /// Display name.
    pub name: String,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Current resource stocks.
    pub resources: Resources,
    /// Garrisoned spearmen.
    pub spearmen: i32,
    /// Garrisoned swordsmen.
    pub swordsmen: i32,
    /// Current per-hour production rates.
    pub production: ProductionRates,
    /// Warehouse storage cap.
    pub warehouse_capacity: i32,
    /// Current building levels.
    pub buildings: BuildingLevels,
    /// Cost of the next upgrade for each building.
    pub upgrade_costs: UpgradeCosts,
    /// When the village was founded.
    pub created_at: DateTime<Utc>,
}

/// The five building levels of a village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingLevels {
    /// Main building level.
    pub main_building: i32,
    /// Timber camp level.
    pub timber_camp: i32,
    /// Clay pit level.
    pub clay_pit: i32,
    /// Iron mine level.
    pub iron_mine: i32,
    /// Warehouse level.
    pub warehouse: i32,
}

/// Next-level upgrade cost for each building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCosts {
    /// Cost to upgrade the main building.
    pub main_building: Resources,
    /// Cost to upgrade the timber camp.
    pub timber_camp: Resources,
    /// Cost to upgrade the clay pit.
    pub clay_pit: Resources,
    /// Cost to upgrade the iron mine.
    pub iron_mine: Resources,
    /// Cost to upgrade the warehouse.
    pub warehouse: Resources,
}

impl UpgradeCosts {
    /// The cost entry for one building kind.
    pub const fn for_building(&self, building: BuildingType) -> Resources {
        match building {
            BuildingType::MainBuilding => self.main_building,
            BuildingType::TimberCamp => self.timber_camp,
            BuildingType::ClayPit => self.clay_pit,
            BuildingType::IronMine => self.iron_mine,
            BuildingType::Warehouse => self.warehouse,
        }
    }
}

/// One in-flight movement as shown to the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementView {
    /// Movement identifier.
    pub id: MovementId,
    /// Source village id.
    pub source_village_id: VillageId,
    /// Target village id.
    pub target_village_id: VillageId,
    /// Source village name ("Unknown" if the village no longer resolves).
    pub source_village_name: String,
    /// Target village name ("Unknown" if the village no longer resolves).
    pub target_village_name: String,
    /// Unit kind in the army.
    pub unit_type: UnitType,
    /// Units marching.
    pub unit_count: i32,
    /// Mission of the movement.
    pub mission: Mission,
    /// Lifecycle state (always outbound in the shell).
    pub status: MovementStatus,
    /// Scheduled arrival.
    pub arrives_at: DateTime<Utc>,
    /// Straight-line distance between the endpoints, in tiles.
    pub distance_tiles: f64,
    /// One-way travel duration for this unit kind, in seconds.
    pub duration_seconds: i64,
    /// Loot being carried (return legs only).
    pub loot: Resources,
    /// Whether the viewer may cancel this movement (outbound attack whose
    /// source the viewer owns).
    pub can_cancel: bool,
}

/// One battle report entry in the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    /// Report identifier.
    pub id: ReportId,
    /// Attacking village name at resolution time.
    pub attacker_village_name: String,
    /// Defending village name at resolution time.
    pub defender_village_name: String,
    /// Unit kind of the attacking army.
    pub unit_type: UnitType,
    /// Units the attacker sent.
    pub attacker_sent: i32,
    /// Attacker survivors.
    pub attacker_survivors: i32,
    /// Defender survivors.
    pub defender_survivors: i32,
    /// Plundered resources.
    pub loot: Resources,
    /// Outcome from the attacker's point of view.
    pub outcome: BattleOutcome,
    /// Which side of the battle the viewer was on.
    pub perspective: Perspective,
    /// Resolution timestamp.
    pub created_at: DateTime<Utc>,
}

/// The viewer's side of a reported battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// The viewer launched the attack.
    Attack,
    /// The viewer's village was the target.
    Defense,
}

/// One pending build-queue entry in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntryView {
    /// Queue item identifier.
    pub id: QueueItemId,
    /// Village being upgraded.
    pub village_id: VillageId,
    /// Building being upgraded.
    pub building_type: BuildingType,
    /// Scheduled completion.
    pub completes_at: DateTime<Utc>,
}

/// A foreign village visible in the requested window.
///
/// Deliberately coarse: the viewer learns the name, position, owner kind,
/// and total garrison size, never the exact composition or resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleVillage {
    /// Village identifier (valid as an attack target).
    pub id: VillageId,
    /// Display name.
    pub name: String,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Player-owned or NPC-abandoned.
    pub kind: VillageKind,
    /// Total garrison size (spearmen + swordsmen).
    pub troops: i32,
}
