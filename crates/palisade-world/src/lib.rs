//! World geometry for the Palisade game core: deterministic terrain,
//! fog-of-war chunk filtering, and starting-village placement.
//!
//! Everything in this crate is a pure function over integer inputs. The
//! terrain of any coordinate is reproducible from `(seed, x, y)` alone, so
//! chunks can be generated, streamed, or re-derived in any order without
//! the whole map ever being materialized by a single process.
//!
//! # Modules
//!
//! - [`terrain`] -- Seeded coordinate hash and per-tile terrain assignment.
//! - [`visibility`] -- Chunk window arithmetic and fog-of-war filtering.
//! - [`spawn`] -- Deterministic starting-village placement with a minimum
//!   distance to all existing villages.

pub mod spawn;
pub mod terrain;
pub mod visibility;

// Re-export primary entry points at crate root.
pub use spawn::assign_starting_location;
pub use terrain::{coordinate_hash, generate, terrain_at};
pub use visibility::{ChunkBounds, fog_filter};
