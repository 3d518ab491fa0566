//! Lazy resource accrual and warehouse capacity.
//!
//! There is no background loop: a village's stocks are only ever advanced
//! by [`tick`], which credits `floor(production_per_hour / 3600 * elapsed)`
//! per resource and clamps at the warehouse capacity. The guards in [`tick`]
//! are what make the catch-up discipline safe under concurrent,
//! out-of-order access:
//!
//! - a stale `now` (clock skew) advances the timestamp only -- no
//!   negative-time accrual;
//! - elapsed time under one second advances the timestamp only -- rapid
//!   repeated calls cannot thrash truncation;
//! - two calls with the same `now` leave the stocks unchanged the second
//!   time, which is the idempotency property every orchestrator caller
//!   depends on.

use chrono::{DateTime, Utc};
use palisade_types::{ProductionRates, Village};

/// Hourly production of a level-0 resource building.
const BASE_PRODUCTION_PER_HOUR: i32 = 35;

/// Additional hourly production per building level.
const PRODUCTION_PER_LEVEL: i32 = 20;

/// Storage capacity of a level-1 warehouse.
const BASE_WAREHOUSE_CAPACITY: i32 = 1_000;

/// Additional capacity per warehouse level past the first.
const WAREHOUSE_CAPACITY_PER_LEVEL: i32 = 600;

/// Hourly production of a resource building at the given level.
pub const fn production_per_hour(level: i32) -> i32 {
    BASE_PRODUCTION_PER_HOUR.saturating_add(PRODUCTION_PER_LEVEL.saturating_mul(level))
}

/// Storage cap granted by a warehouse at the given level.
pub const fn warehouse_capacity(level: i32) -> i32 {
    BASE_WAREHOUSE_CAPACITY
        .saturating_add(WAREHOUSE_CAPACITY_PER_LEVEL.saturating_mul(level.saturating_sub(1)))
}

/// Current per-hour production rates of a village.
pub const fn production_rates(village: &Village) -> ProductionRates {
    ProductionRates {
        wood_per_hour: production_per_hour(village.timber_camp_level),
        clay_per_hour: production_per_hour(village.clay_pit_level),
        iron_per_hour: production_per_hour(village.iron_mine_level),
    }
}

/// Advance a village's stocks to `now`.
///
/// Credits each resource from its building's production over the elapsed
/// wall time, clamped at the warehouse capacity, then stamps
/// `last_tick_at = now`. See the module docs for the skew, sub-second, and
/// idempotency guards.
pub fn tick(village: &mut Village, now: DateTime<Utc>) {
    if now < village.last_tick_at {
        village.last_tick_at = now;
        return;
    }

    let elapsed_seconds = (now - village.last_tick_at).as_seconds_f64();
    if elapsed_seconds < 1.0 {
        village.last_tick_at = now;
        return;
    }

    let capacity = warehouse_capacity(village.warehouse_level);
    village.wood = capacity.min(
        village
            .wood
            .saturating_add(produced(village.timber_camp_level, elapsed_seconds)),
    );
    village.clay = capacity.min(
        village
            .clay
            .saturating_add(produced(village.clay_pit_level, elapsed_seconds)),
    );
    village.iron = capacity.min(
        village
            .iron
            .saturating_add(produced(village.iron_mine_level, elapsed_seconds)),
    );
    village.last_tick_at = now;
}

/// Units produced by a building at `level` over `elapsed_seconds`, rounded
/// down. Fractional production is lost, not carried over.
#[allow(clippy::cast_possible_truncation)]
fn produced(level: i32, elapsed_seconds: f64) -> i32 {
    let per_hour = f64::from(production_per_hour(level));
    let amount = (per_hour / 3600.0 * elapsed_seconds).floor();
    if amount >= f64::from(i32::MAX) {
        i32::MAX
    } else if amount <= 0.0 {
        0
    } else {
        amount as i32
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use palisade_types::{AccountId, Position, VillageId};

    use super::*;

    fn village_at(last_tick_at: DateTime<Utc>) -> Village {
        Village {
            id: VillageId::new(),
            account_id: AccountId::new(),
            name: "Test".to_owned(),
            position: Position::new(0, 0),
            wood: 500,
            clay: 500,
            iron: 500,
            main_building_level: 1,
            timber_camp_level: 1,
            clay_pit_level: 1,
            iron_mine_level: 1,
            warehouse_level: 1,
            spearmen: 0,
            swordsmen: 0,
            last_tick_at,
            created_at: last_tick_at,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn production_scales_linearly_with_level() {
        assert_eq!(production_per_hour(0), 35);
        assert_eq!(production_per_hour(1), 55);
        assert_eq!(production_per_hour(3), 95);
    }

    #[test]
    fn warehouse_capacity_scales_from_level_one() {
        assert_eq!(warehouse_capacity(1), 1_000);
        assert_eq!(warehouse_capacity(3), 2_200);
    }

    #[test]
    fn accrual_is_clamped_at_warehouse_capacity() {
        // Level-3 camp idle for exactly 2 hours at 990/1000: the 190 units
        // of raw production must clamp to the cap, not reach 1180.
        let now = noon();
        let mut village = village_at(now - Duration::hours(2));
        village.wood = 990;
        village.clay = 990;
        village.iron = 990;
        village.timber_camp_level = 3;
        village.clay_pit_level = 3;
        village.iron_mine_level = 3;

        tick(&mut village, now);

        assert_eq!(village.wood, 1_000);
        assert_eq!(village.clay, 1_000);
        assert_eq!(village.iron, 1_000);
        assert_eq!(village.last_tick_at, now);
    }

    #[test]
    fn uncapped_accrual_matches_hourly_rate() {
        let now = noon();
        let mut village = village_at(now - Duration::hours(2));
        village.wood = 0;
        village.timber_camp_level = 3;

        tick(&mut village, now);

        // 95/h for 2h.
        assert_eq!(village.wood, 190);
    }

    #[test]
    fn second_tick_with_same_now_is_a_noop() {
        let now = noon();
        let mut village = village_at(now - Duration::hours(1));

        tick(&mut village, now);
        let after_first = village.clone();
        tick(&mut village, now);

        assert_eq!(village, after_first);
    }

    #[test]
    fn stale_now_only_advances_timestamp() {
        let now = noon();
        let mut village = village_at(now + Duration::hours(1));

        tick(&mut village, now);

        assert_eq!(village.wood, 500);
        assert_eq!(village.clay, 500);
        assert_eq!(village.iron, 500);
        assert_eq!(village.last_tick_at, now);
    }

    #[test]
    fn sub_second_elapsed_only_advances_timestamp() {
        let now = noon();
        let mut village = village_at(now - Duration::milliseconds(400));

        tick(&mut village, now);

        assert_eq!(village.wood, 500);
        assert_eq!(village.last_tick_at, now);
    }

    #[test]
    fn production_rates_follow_building_levels() {
        let mut village = village_at(noon());
        village.timber_camp_level = 2;
        village.clay_pit_level = 4;
        village.iron_mine_level = 1;

        let rates = production_rates(&village);
        assert_eq!(rates.wood_per_hour, 75);
        assert_eq!(rates.clay_per_hour, 115);
        assert_eq!(rates.iron_per_hour, 55);
    }
}
