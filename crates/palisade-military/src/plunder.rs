//! Plunder calculation and the return-home credit.
//!
//! Plunder is only taken on attacker victory. The stolen total is
//! `min(survivors * carry_capacity, target's combined stocks)`, split as
//! evenly as possible across wood/clay/iron (floor thirds), with the
//! remainder assigned greedily wood-first, then clay, then iron, each
//! capped by what the target still holds. The target is never driven
//! negative and the attacker never receives more of a resource than the
//! target actually had.

use palisade_economy::warehouse_capacity;
use palisade_types::{Resources, UnitType, Village};

use crate::units;

/// Compute the loot for `survivors` victorious units and debit it from the
/// defeated village immediately.
pub fn take_plunder(unit: UnitType, survivors: i32, target: &mut Village) -> Resources {
    let loot = calculate_plunder(unit, survivors, target);
    target.debit(loot);
    loot
}

/// The loot split, without mutating the target.
fn calculate_plunder(unit: UnitType, survivors: i32, target: &Village) -> Resources {
    if survivors <= 0 {
        return Resources::ZERO;
    }

    let capacity = units::carry_capacity(unit).saturating_mul(survivors);
    let total = capacity.min(target.resources().total()).max(0);
    let share = total / 3;

    let mut wood = share.min(target.wood);
    let mut clay = share.min(target.clay);
    let mut iron = share.min(target.iron);

    // Whatever the even split could not place (the division remainder plus
    // any shortfall against a depleted stock) goes wood-first, then clay,
    // then iron. `total <= target.total()` guarantees it all fits.
    let mut remainder = total
        .saturating_sub(wood)
        .saturating_sub(clay)
        .saturating_sub(iron);

    let extra_wood = remainder.min(target.wood.saturating_sub(wood));
    wood = wood.saturating_add(extra_wood);
    remainder = remainder.saturating_sub(extra_wood);

    let extra_clay = remainder.min(target.clay.saturating_sub(clay));
    clay = clay.saturating_add(extra_clay);
    remainder = remainder.saturating_sub(extra_clay);

    let extra_iron = remainder.min(target.iron.saturating_sub(iron));
    iron = iron.saturating_add(extra_iron);

    Resources::new(wood, clay, iron)
}

/// Credit a returning army (or a canceled attack) back into its home
/// village: troops rejoin the garrison and carried loot is stored, clamped
/// at the warehouse capacity. Loot that does not fit is forfeited so the
/// stock invariant holds.
pub fn apply_return_home(village: &mut Village, unit: UnitType, count: i32, loot: Resources) {
    let garrison = village.troop_count(unit);
    village.set_troop_count(unit, garrison.saturating_add(count.max(0)));

    let capacity = warehouse_capacity(village.warehouse_level);
    village.wood = capacity.min(village.wood.saturating_add(loot.wood.max(0)));
    village.clay = capacity.min(village.clay.saturating_add(loot.clay.max(0)));
    village.iron = capacity.min(village.iron.saturating_add(loot.iron.max(0)));
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use palisade_types::{AccountId, Position, VillageId};

    use super::*;

    fn village(wood: i32, clay: i32, iron: i32) -> Village {
        Village {
            id: VillageId::new(),
            account_id: AccountId::new(),
            name: "Target".to_owned(),
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
    fn loot_total_is_capacity_when_target_is_rich() {
        // 4 spearmen carry 100; even split 33/33/33, remainder 1 to wood.
        let mut target = village(700, 700, 700);
        let loot = take_plunder(UnitType::Spearman, 4, &mut target);

        assert_eq!(loot, Resources::new(34, 33, 33));
        assert_eq!(loot.total(), 100);
        assert_eq!(target.resources(), Resources::new(666, 667, 667));
    }

    #[test]
    fn loot_total_is_target_stock_when_target_is_poor() {
        let mut target = village(10, 5, 0);
        let loot = take_plunder(UnitType::Spearman, 10, &mut target);

        assert_eq!(loot.total(), 15);
        assert_eq!(target.resources(), Resources::ZERO);
    }

    #[test]
    fn no_single_resource_exceeds_target_holdings() {
        // Capacity 75; even share 25 each, but clay holds only 3: the
        // unplaced clay share spills into wood.
        let mut target = village(60, 3, 30);
        let loot = take_plunder(UnitType::Spearman, 3, &mut target);

        assert_eq!(loot, Resources::new(47, 3, 25));
        assert_eq!(loot.total(), 75);
        assert_eq!(target.resources(), Resources::new(13, 0, 5));
    }

    #[test]
    fn zero_survivors_take_nothing() {
        let mut target = village(500, 500, 500);
        let loot = take_plunder(UnitType::Swordsman, 0, &mut target);

        assert_eq!(loot, Resources::ZERO);
        assert_eq!(target.resources(), Resources::new(500, 500, 500));
    }

    #[test]
    fn swordsmen_carry_less_than_spearmen() {
        let mut rich = village(900, 900, 900);
        let loot = take_plunder(UnitType::Swordsman, 4, &mut rich);
        assert_eq!(loot.total(), 60);
    }

    #[test]
    fn return_home_credits_troops_and_loot() {
        let mut home = village(100, 100, 100);
        home.spearmen = 2;

        apply_return_home(&mut home, UnitType::Spearman, 5, Resources::new(30, 20, 10));

        assert_eq!(home.spearmen, 7);
        assert_eq!(home.resources(), Resources::new(130, 120, 110));
    }

    #[test]
    fn return_home_clamps_loot_at_warehouse_capacity() {
        let mut home = village(980, 0, 0);

        apply_return_home(&mut home, UnitType::Spearman, 1, Resources::new(100, 0, 0));

        assert_eq!(home.wood, 1_000);
    }

    #[test]
    fn loot_conservation_holds_across_scenarios() {
        for (wood, clay, iron, survivors) in [
            (700, 700, 700, 14),
            (1, 2, 3, 10),
            (0, 0, 0, 5),
            (50, 0, 200, 2),
            (333, 334, 335, 13),
        ] {
            let mut target = village(wood, clay, iron);
            let before = target.resources();
            let loot = take_plunder(UnitType::Spearman, survivors, &mut target);

            let capacity = survivors.saturating_mul(25);
            assert_eq!(loot.total(), capacity.min(before.total()));
            assert!(loot.wood <= before.wood);
            assert!(loot.clay <= before.clay);
            assert!(loot.iron <= before.iron);
            assert!(target.wood >= 0 && target.clay >= 0 && target.iron >= 0);
        }
    }
}
