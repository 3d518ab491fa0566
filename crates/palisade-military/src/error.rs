//! Error types for the `palisade-military` crate.

use palisade_types::Resources;

/// Errors that can occur while applying military rules. Every variant means
/// the operation aborted with no partial mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MilitaryError {
    /// The requested unit count was zero or negative.
    #[error("unit count must be positive, got {count}")]
    NonPositiveCount {
        /// The rejected count.
        count: i32,
    },

    /// The village cannot pay the recruitment cost.
    #[error(
        "insufficient resources: need {} wood, {} clay, {} iron",
        cost.wood, cost.clay, cost.iron
    )]
    InsufficientResources {
        /// The total recruitment cost that could not be covered.
        cost: Resources,
    },

    /// The village garrison is smaller than the dispatch request.
    #[error("insufficient troops: requested {requested}, garrison holds {available}")]
    InsufficientTroops {
        /// Units requested.
        requested: i32,
        /// Units actually garrisoned.
        available: i32,
    },
}
