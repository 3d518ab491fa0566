//! Combat resolution: power comparison and survivor calculation.
//!
//! Each side fights as a single unit kind. The attacker's power is
//! `count * attack_power`; the defender's is `count * defense_power`.
//! Strictly greater power wins; equal power resolves in the defender's
//! favor. The loser is always wiped out. The winner loses
//! `clamp(loser_power / winner_power, 0.05, 0.95)` of its force -- at
//! least 5% and at most 95% even in lopsided fights, so there are no free
//! victories and no full wipes of the winning side (above minimum army
//! sizes where the 5% floor rounds away).

use palisade_types::{UnitType, Village};

use crate::units;

/// Minimum share of its force the winning side loses.
const MIN_LOSS_RATIO: f64 = 0.05;

/// Maximum share of its force the winning side loses.
const MAX_LOSS_RATIO: f64 = 0.95;

/// A single-kind army participating in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Army {
    /// The unit kind.
    pub unit_type: UnitType,
    /// How many units.
    pub count: i32,
}

impl Army {
    /// Create an army.
    pub const fn new(unit_type: UnitType, count: i32) -> Self {
        Self { unit_type, count }
    }
}

/// Outcome of a resolved battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatResult {
    /// Whether the attacking side won.
    pub attacker_won: bool,
    /// Attacker units left standing (zero unless the attacker won).
    pub attacker_survivors: i32,
    /// Defender units left standing (zero unless the defender won).
    pub defender_survivors: i32,
}

/// The garrison a village defends with: swordsmen if any are present,
/// else spearmen. There is no mixed-garrison model; a garrison is
/// represented by its strongest available single unit kind.
pub const fn defending_army(village: &Village) -> Army {
    if village.swordsmen > 0 {
        Army::new(UnitType::Swordsman, village.swordsmen)
    } else {
        Army::new(UnitType::Spearman, village.spearmen)
    }
}

/// Resolve a battle between two armies.
///
/// An empty attacking army loses outright with the defender intact; an
/// empty defending army loses outright with the attacker intact. Otherwise
/// the side with strictly greater power wins and keeps
/// `floor(count - count * loss_ratio)` units; ties go to the defender.
pub fn resolve_combat(attacker: Army, defender: Army) -> CombatResult {
    if attacker.count <= 0 {
        return CombatResult {
            attacker_won: false,
            attacker_survivors: 0,
            defender_survivors: defender.count,
        };
    }

    if defender.count <= 0 {
        return CombatResult {
            attacker_won: true,
            attacker_survivors: attacker.count,
            defender_survivors: 0,
        };
    }

    let attacker_power =
        i64::from(attacker.count).saturating_mul(units::attack_power(attacker.unit_type));
    let defender_power =
        i64::from(defender.count).saturating_mul(units::defense_power(defender.unit_type));

    if attacker_power > defender_power {
        CombatResult {
            attacker_won: true,
            attacker_survivors: winner_survivors(attacker.count, defender_power, attacker_power),
            defender_survivors: 0,
        }
    } else {
        CombatResult {
            attacker_won: false,
            attacker_survivors: 0,
            defender_survivors: winner_survivors(defender.count, attacker_power, defender_power),
        }
    }
}

/// Survivors on the winning side: loss ratio `loser_power / winner_power`
/// clamped to `[0.05, 0.95]`, applied as
/// `max(0, floor(count - count * ratio))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn winner_survivors(count: i32, loser_power: i64, winner_power: i64) -> i32 {
    let ratio = (loser_power as f64 / winner_power as f64).clamp(MIN_LOSS_RATIO, MAX_LOSS_RATIO);
    let survivors = (f64::from(count) - f64::from(count) * ratio).floor();
    if survivors <= 0.0 {
        0
    } else {
        survivors as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attacker_can_win_and_keep_survivors() {
        // 30 spearmen (600 attack) vs 10 swordsmen (500 defense).
        let result = resolve_combat(
            Army::new(UnitType::Spearman, 30),
            Army::new(UnitType::Swordsman, 10),
        );

        assert!(result.attacker_won);
        assert!(result.attacker_survivors > 0);
        assert!(result.attacker_survivors <= 30);
        assert_eq!(result.defender_survivors, 0);
        // Ratio 500/600 -> floor(30 - 25.0) = 5 survivors.
        assert_eq!(result.attacker_survivors, 5);
    }

    #[test]
    fn defender_wins_when_power_is_greater() {
        // 10 spearmen (200 attack) vs 10 swordsmen (500 defense).
        let result = resolve_combat(
            Army::new(UnitType::Spearman, 10),
            Army::new(UnitType::Swordsman, 10),
        );

        assert!(!result.attacker_won);
        assert_eq!(result.attacker_survivors, 0);
        // Ratio 200/500 = 0.4 -> floor(10 - 4.0) = 6 survivors.
        assert_eq!(result.defender_survivors, 6);
    }

    #[test]
    fn equal_power_favors_the_defender() {
        // 15 spearmen (300 attack) vs 20 spearmen (300 defense).
        let result = resolve_combat(
            Army::new(UnitType::Spearman, 15),
            Army::new(UnitType::Spearman, 20),
        );

        assert!(!result.attacker_won);
        assert_eq!(result.attacker_survivors, 0);
        assert!(result.defender_survivors > 0);
    }

    #[test]
    fn empty_attacker_loses_with_defender_intact() {
        let result = resolve_combat(
            Army::new(UnitType::Spearman, 0),
            Army::new(UnitType::Swordsman, 8),
        );

        assert!(!result.attacker_won);
        assert_eq!(result.defender_survivors, 8);
    }

    #[test]
    fn empty_defender_loses_with_attacker_intact() {
        let result = resolve_combat(
            Army::new(UnitType::Swordsman, 12),
            Army::new(UnitType::Spearman, 0),
        );

        assert!(result.attacker_won);
        assert_eq!(result.attacker_survivors, 12);
        assert_eq!(result.defender_survivors, 0);
    }

    #[test]
    fn lopsided_victory_still_costs_at_least_five_percent() {
        // 1000 spearmen vs 1 spearman: ratio clamps to 0.05.
        let result = resolve_combat(
            Army::new(UnitType::Spearman, 1_000),
            Army::new(UnitType::Spearman, 1),
        );

        assert!(result.attacker_won);
        assert_eq!(result.attacker_survivors, 950);
    }

    #[test]
    fn narrow_victory_never_wipes_the_winner_below_the_cap() {
        // 100 swordsmen attack (2500) vs 166 spearmen defense (2490):
        // ratio 0.996 clamps to 0.95, floor(100 - 95) = 5 survive.
        let result = resolve_combat(
            Army::new(UnitType::Swordsman, 100),
            Army::new(UnitType::Spearman, 166),
        );

        assert!(result.attacker_won);
        assert_eq!(result.attacker_survivors, 5);
    }

    #[test]
    fn survivors_are_always_within_army_bounds() {
        for attackers in [1, 3, 10, 50, 500] {
            for defenders in [1, 3, 10, 50, 500] {
                let result = resolve_combat(
                    Army::new(UnitType::Spearman, attackers),
                    Army::new(UnitType::Swordsman, defenders),
                );
                if result.attacker_won {
                    assert_eq!(result.defender_survivors, 0);
                    assert!(result.attacker_survivors >= 0);
                    assert!(result.attacker_survivors <= attackers);
                } else {
                    assert_eq!(result.attacker_survivors, 0);
                    assert!(result.defender_survivors >= 0);
                    assert!(result.defender_survivors <= defenders);
                }
            }
        }
    }

    #[test]
    fn garrison_prefers_swordsmen() {
        use chrono::Utc;
        use palisade_types::{AccountId, Position, VillageId};

        let mut village = Village {
            id: VillageId::new(),
            account_id: AccountId::new(),
            name: "Fort".to_owned(),
            position: Position::new(0, 0),
            wood: 0,
            clay: 0,
            iron: 0,
            main_building_level: 1,
            timber_camp_level: 1,
            clay_pit_level: 1,
            iron_mine_level: 1,
            warehouse_level: 1,
            spearmen: 9,
            swordsmen: 2,
            last_tick_at: Utc::now(),
            created_at: Utc::now(),
        };

        assert_eq!(
            defending_army(&village),
            Army::new(UnitType::Swordsman, 2)
        );
        village.swordsmen = 0;
        assert_eq!(defending_army(&village), Army::new(UnitType::Spearman, 9));
    }
}
