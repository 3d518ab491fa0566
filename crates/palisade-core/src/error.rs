//! The error taxonomy surfaced to callers of the game operations.
//!
//! Every variant is a local, recoverable failure: the caller can show it to
//! a player and move on. Store unavailability is the only thing worth
//! escalating, and it arrives wrapped in [`GameError::Db`].

use palisade_db::DbError;
use palisade_economy::EconomyError;
use palisade_military::MilitaryError;
use palisade_types::Resources;

/// Errors returned by the game operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The request was malformed before any state was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The village cannot pay for the requested action.
    #[error(
        "insufficient resources: need {} wood, {} clay, {} iron",
        cost.wood, cost.clay, cost.iron
    )]
    InsufficientResources {
        /// The full cost that could not be covered.
        cost: Resources,
    },

    /// The garrison holds fewer units than the request needs.
    #[error("insufficient troops: requested {requested}, available {available}")]
    InsufficientTroops {
        /// Units the request asked for.
        requested: i32,
        /// Units actually garrisoned.
        available: i32,
    },

    /// The referenced entity does not exist (or, for villages, is not owned
    /// by the caller -- ownership failures reveal nothing beyond existence).
    #[error("{entity} not found")]
    NotFound {
        /// What kind of entity was looked up.
        entity: &'static str,
    },

    /// The caller does not own the entity they tried to act on.
    #[error("not permitted to act on this entity")]
    Ownership,

    /// The entity already left the state the request assumed (canceling a
    /// resolved movement, for example).
    #[error("the entity is no longer in the expected state")]
    Stale,

    /// The durable store failed.
    #[error("store error: {0}")]
    Db(#[from] DbError),
}

impl From<EconomyError> for GameError {
    fn from(err: EconomyError) -> Self {
        match err {
            EconomyError::InsufficientResources { cost } => Self::InsufficientResources { cost },
        }
    }
}

impl From<MilitaryError> for GameError {
    fn from(err: MilitaryError) -> Self {
        match err {
            MilitaryError::NonPositiveCount { count } => {
                Self::InvalidArgument(format!("unit count must be positive, got {count}"))
            }
            MilitaryError::InsufficientResources { cost } => Self::InsufficientResources { cost },
            MilitaryError::InsufficientTroops {
                requested,
                available,
            } => Self::InsufficientTroops {
                requested,
                available,
            },
        }
    }
}
