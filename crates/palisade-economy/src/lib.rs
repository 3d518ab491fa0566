//! Village economy rules: lazy resource accrual and construction.
//!
//! The [`production::tick`] function is the catch-up primitive the whole
//! engine is built around -- every other component calls it before touching
//! a village's resources, and calling it twice with the same `now` is a
//! no-op the second time.
//!
//! # Modules
//!
//! - [`production`] -- Resource accrual, production rates, warehouse
//!   capacity.
//! - [`construction`] -- Upgrade cost scaling, the immediate and queued
//!   upgrade paths, and queued-upgrade completion.
//! - [`error`] -- Error type for unaffordable operations.

pub mod construction;
pub mod error;
pub mod production;

// Re-export primary entry points at crate root.
pub use construction::{
    complete_queued, next_upgrade_cost, try_queue_upgrade, try_upgrade, upgrade_cost,
    upgrade_costs,
};
pub use error::EconomyError;
pub use production::{production_per_hour, production_rates, tick, warehouse_capacity};
