//! Military rules: recruitment, dispatch, travel timing, combat, plunder.
//!
//! All functions here are pure over [`Village`] and value types; the
//! orchestrator owns persistence and the exactly-once resolution guards.
//! The numeric policies (loss-ratio bounds, loot split) are preserved
//! exactly as specified -- rebalancing is a policy change, not a bug fix.
//!
//! # Modules
//!
//! - [`units`] -- The unit stat tables (cost, speed, power, carry).
//! - [`recruit`] -- Resource-for-troops exchange and troop dispatch.
//! - [`movement`] -- Distance-based travel timing.
//! - [`combat`] -- Power comparison and survivor calculation.
//! - [`plunder`] -- Loot capacity, split, and the return-home credit.
//! - [`error`] -- Error type for rejected military operations.
//!
//! [`Village`]: palisade_types::Village

pub mod combat;
pub mod error;
pub mod movement;
pub mod plunder;
pub mod recruit;
pub mod units;

// Re-export primary entry points at crate root.
pub use combat::{Army, CombatResult, defending_army, resolve_combat};
pub use error::MilitaryError;
pub use movement::{arrival_time, travel_duration_seconds};
pub use plunder::{apply_return_home, take_plunder};
pub use recruit::{try_dispatch, try_recruit};
