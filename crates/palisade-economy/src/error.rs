//! Error types for the `palisade-economy` crate.

use palisade_types::Resources;

/// Errors that can occur while applying economy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    /// The village cannot pay the required cost. Nothing was mutated.
    #[error(
        "insufficient resources: need {} wood, {} clay, {} iron",
        cost.wood, cost.clay, cost.iron
    )]
    InsufficientResources {
        /// The full cost that could not be covered.
        cost: Resources,
    },
}
