//! Shared type definitions for the Palisade game core.
//!
//! This crate is the single source of truth for all types used across the
//! Palisade workspace: strongly-typed identifiers, the game enumerations
//! with their database string codecs, the persisted entity structs, and the
//! world-shell payload delivered to the rendering client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (terrain, units, buildings, missions)
//! - [`structs`] -- Persisted entities (villages, tiles, movements, queue
//!   items, battle reports) and shared value types
//! - [`shell`] -- The assembled world-shell payload returned on every read

pub mod enums;
pub mod ids;
pub mod shell;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BattleOutcome, BuildingType, EnumParseError, Mission, MovementStatus, Terrain, UnitType,
    VillageKind,
};
pub use ids::{AccountId, MovementId, QueueItemId, ReportId, VillageId};
pub use shell::{
    BuildingLevels, MovementView, Perspective, QueueEntryView, ReportView, TileView,
    UpgradeCosts, VillageOverview, VisibleVillage, WorldShell, WorldWindow,
};
pub use structs::{
    BattleReport, BuildingQueueItem, Position, ProductionRates, Resources, TroopMovement, Village,
    WorldTile,
};
