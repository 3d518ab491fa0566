//! The unit stat tables.
//!
//! Everything that differentiates the two unit kinds lives here, so adding
//! a kind to the roster means extending these five tables (and the
//! [`UnitType`] enum) and nothing else.
//!
//! | Unit      | Cost (w/c/i) | s/tile | Attack | Defense | Carry |
//! |-----------|--------------|--------|--------|---------|-------|
//! | Spearman  | 50/30/10     | 312    | 20     | 15      | 25    |
//! | Swordsman | 30/30/70     | 360    | 25     | 50      | 15    |

use palisade_types::{Resources, UnitType};

/// Recruitment cost for a single unit.
pub const fn recruitment_cost(unit: UnitType) -> Resources {
    match unit {
        UnitType::Spearman => Resources::new(50, 30, 10),
        UnitType::Swordsman => Resources::new(30, 30, 70),
    }
}

/// Marching speed: seconds to cross one tile of distance.
pub const fn seconds_per_tile(unit: UnitType) -> i64 {
    match unit {
        UnitType::Spearman => 312,
        UnitType::Swordsman => 360,
    }
}

/// Offensive power per unit.
pub const fn attack_power(unit: UnitType) -> i64 {
    match unit {
        UnitType::Spearman => 20,
        UnitType::Swordsman => 25,
    }
}

/// Defensive power per unit.
pub const fn defense_power(unit: UnitType) -> i64 {
    match unit {
        UnitType::Spearman => 15,
        UnitType::Swordsman => 50,
    }
}

/// Loot a single surviving unit can carry home.
pub const fn carry_capacity(unit: UnitType) -> i32 {
    match unit {
        UnitType::Spearman => 25,
        UnitType::Swordsman => 15,
    }
}
