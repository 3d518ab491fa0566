//! Recruitment and dispatch: the two troop-count mutations a player can
//! trigger directly.
//!
//! Both are all-or-nothing. Recruitment debits resources and credits
//! troops atomically; dispatch withdraws troops from the garrison only if
//! enough are present. The mirrored credit on arrival is
//! [`apply_return_home`].
//!
//! [`apply_return_home`]: crate::plunder::apply_return_home

use palisade_types::{UnitType, Village};

use crate::error::MilitaryError;
use crate::units;

/// Exchange resources for `count` units of the given kind.
///
/// # Errors
///
/// Returns [`MilitaryError::NonPositiveCount`] for `count <= 0` and
/// [`MilitaryError::InsufficientResources`] when the stocks cannot cover
/// the scaled cost. Neither error leaves any partial mutation.
pub fn try_recruit(
    village: &mut Village,
    unit: UnitType,
    count: i32,
) -> Result<(), MilitaryError> {
    if count <= 0 {
        return Err(MilitaryError::NonPositiveCount { count });
    }

    let cost = units::recruitment_cost(unit).scaled(count);
    if !village.can_afford(cost) {
        return Err(MilitaryError::InsufficientResources { cost });
    }

    village.debit(cost);
    let garrison = village.troop_count(unit);
    village.set_troop_count(unit, garrison.saturating_add(count));
    Ok(())
}

/// Withdraw `count` units from the garrison for an outbound movement.
///
/// # Errors
///
/// Returns [`MilitaryError::NonPositiveCount`] for `count <= 0` and
/// [`MilitaryError::InsufficientTroops`] when the garrison holds fewer
/// than `count` units. Neither error mutates the village.
pub fn try_dispatch(
    village: &mut Village,
    unit: UnitType,
    count: i32,
) -> Result<(), MilitaryError> {
    if count <= 0 {
        return Err(MilitaryError::NonPositiveCount { count });
    }

    let available = village.troop_count(unit);
    if available < count {
        return Err(MilitaryError::InsufficientTroops {
            requested: count,
            available,
        });
    }

    village.set_troop_count(unit, available.saturating_sub(count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use palisade_types::{AccountId, Position, Resources, VillageId};

    use super::*;

    fn village(wood: i32, clay: i32, iron: i32) -> Village {
        Village {
            id: VillageId::new(),
            account_id: AccountId::new(),
            name: "Test".to_owned(),
            position: Position::new(0, 0),
            wood,
            clay,
            iron,
            main_building_level: 1,
            timber_camp_level: 1,
            clay_pit_level: 1,
            iron_mine_level: 1,
            warehouse_level: 1,
            spearmen: 0,
            swordsmen: 0,
            last_tick_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn affordable_recruitment_debits_and_credits() {
        let mut v = village(300, 300, 300);
        let result = try_recruit(&mut v, UnitType::Spearman, 5);

        assert_eq!(result, Ok(()));
        assert_eq!(v.spearmen, 5);
        // 5 spearmen: 250 wood, 150 clay, 50 iron.
        assert_eq!(v.resources(), Resources::new(50, 150, 250));
    }

    #[test]
    fn unaffordable_recruitment_mutates_nothing() {
        let mut v = village(100, 100, 100);
        let result = try_recruit(&mut v, UnitType::Swordsman, 2);

        assert_eq!(
            result,
            Err(MilitaryError::InsufficientResources {
                cost: Resources::new(60, 60, 140)
            })
        );
        assert_eq!(v.swordsmen, 0);
        assert_eq!(v.resources(), Resources::new(100, 100, 100));
    }

    #[test]
    fn non_positive_count_is_rejected() {
        let mut v = village(1_000, 1_000, 1_000);
        assert_eq!(
            try_recruit(&mut v, UnitType::Spearman, 0),
            Err(MilitaryError::NonPositiveCount { count: 0 })
        );
        assert_eq!(
            try_dispatch(&mut v, UnitType::Spearman, -4),
            Err(MilitaryError::NonPositiveCount { count: -4 })
        );
    }

    #[test]
    fn dispatch_withdraws_from_the_garrison() {
        let mut v = village(0, 0, 0);
        v.spearmen = 10;

        assert_eq!(try_dispatch(&mut v, UnitType::Spearman, 7), Ok(()));
        assert_eq!(v.spearmen, 3);
    }

    #[test]
    fn dispatch_fails_when_garrison_is_short() {
        let mut v = village(0, 0, 0);
        v.swordsmen = 3;

        assert_eq!(
            try_dispatch(&mut v, UnitType::Swordsman, 4),
            Err(MilitaryError::InsufficientTroops {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(v.swordsmen, 3);
    }
}
