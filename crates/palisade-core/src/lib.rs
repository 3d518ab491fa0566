//! Game core for Palisade: the world tick orchestrator and the operations
//! callers invoke on it.
//!
//! The world has no background loop. Every operation captures one
//! authoritative "now", opens a transaction, runs the catch-up pass
//! (resource accrual, map seeding, due movement and build-queue
//! resolution), applies its own mutation, and commits. All shared state
//! lives in `PostgreSQL`, so any number of service instances can serve the
//! same world concurrently.
//!
//! # Modules
//!
//! - [`service`] -- [`GameService`] and the caller-facing operations
//! - [`catchup`] -- The per-request catch-up pass
//! - [`shell`] -- Assembly of the viewer's shell payload
//! - [`config`] -- YAML configuration with serde defaults
//! - [`clock`] -- Clock abstraction ([`SystemClock`] / [`FixedClock`])
//! - [`error`] -- The caller-facing error taxonomy

pub mod catchup;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod shell;

// Re-export primary types for convenience.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use error::GameError;
pub use service::{FarmRunOutcome, GameService};
