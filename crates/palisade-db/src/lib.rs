//! `PostgreSQL` data layer for the Palisade game core.
//!
//! All mutable shared state lives here, never in process memory, so any
//! number of service instances can run the catch-up pass concurrently.
//! Store functions take a `&mut PgConnection` rather than a pool handle so
//! the orchestrator can compose them inside a single transaction; the
//! transitions that must happen exactly once (movement resolution, queue
//! completion) are guarded check-and-set updates whose row count tells the
//! caller whether it won the race.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a live database at build time. All queries are
//! parameterized.
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, embedded migrations
//! - [`villages`] -- Village rows, row locks, and state writes
//! - [`tiles`] -- Idempotent world-tile seeding and window queries
//! - [`movements`] -- Troop movement rows and guarded status transitions
//! - [`queue`] -- Building queue rows and guarded completion
//! - [`reports`] -- Write-once battle reports
//! - [`error`] -- Shared error type

pub mod error;
pub mod movements;
pub mod postgres;
pub mod queue;
pub mod reports;
pub mod tiles;
pub mod villages;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
