//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the game has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered) for efficient database indexing. Accounts are provisioned
//! by the surrounding identity layer; [`AccountId`] only names the caller
//! that layer has already authenticated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player (or NPC) account.
    AccountId
}

define_id! {
    /// Unique identifier for a village.
    VillageId
}

define_id! {
    /// Unique identifier for a troop movement.
    MovementId
}

define_id! {
    /// Unique identifier for a building queue item.
    QueueItemId
}

define_id! {
    /// Unique identifier for a battle report.
    ReportId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(VillageId::new(), VillageId::new());
    }

    #[test]
    fn id_round_trips_through_uuid() {
        let id = MovementId::new();
        let raw: Uuid = id.into();
        assert_eq!(MovementId::from(raw), id);
    }
}
