//! Distance-based travel timing.
//!
//! Distance between villages is the continuous Euclidean distance of their
//! positions; it is multiplied by the unit's seconds-per-tile and rounded
//! up only at that final stage. Speed differences between unit kinds are
//! therefore exact multiplicative factors of one shared distance.

use chrono::{DateTime, Duration, Utc};
use palisade_types::{Position, UnitType};

use crate::units;

/// One-way travel time between two positions for the given unit kind, in
/// whole seconds (rounded up).
#[allow(clippy::cast_possible_truncation)]
pub fn travel_duration_seconds(source: Position, target: Position, unit: UnitType) -> i64 {
    let distance = source.distance_to(target);
    #[allow(clippy::cast_precision_loss)]
    let seconds = (distance * units::seconds_per_tile(unit) as f64).ceil();
    if seconds >= 9.2e18 {
        i64::MAX
    } else if seconds <= 0.0 {
        0
    } else {
        seconds as i64
    }
}

/// Arrival timestamp for an army departing at `departed_at`.
pub fn arrival_time(
    departed_at: DateTime<Utc>,
    source: Position,
    target: Position,
    unit: UnitType,
) -> DateTime<Utc> {
    let travel = Duration::seconds(travel_duration_seconds(source, target, unit));
    departed_at
        .checked_add_signed(travel)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn arrival_uses_distance_and_unit_speed() {
        // Distance (10,10) -> (13,14) is exactly 5 tiles; a spearman at
        // 312 s/tile arrives after 1560 s = 26 minutes.
        let departed = Utc
            .with_ymd_and_hms(2026, 2, 21, 12, 0, 0)
            .single()
            .unwrap_or_default();
        let arrival = arrival_time(
            departed,
            Position::new(10, 10),
            Position::new(13, 14),
            UnitType::Spearman,
        );
        assert_eq!(arrival, departed + Duration::minutes(26));
    }

    #[test]
    fn travel_time_rounds_up_fractional_seconds() {
        // Distance (0,0) -> (1,1) = sqrt(2); 312 * 1.4142... = 441.23...
        let seconds =
            travel_duration_seconds(Position::new(0, 0), Position::new(1, 1), UnitType::Spearman);
        assert_eq!(seconds, 442);
    }

    #[test]
    fn swordsmen_are_slower_than_spearmen() {
        let source = Position::new(0, 0);
        let target = Position::new(10, 0);
        let spearman = travel_duration_seconds(source, target, UnitType::Spearman);
        let swordsman = travel_duration_seconds(source, target, UnitType::Swordsman);
        assert_eq!(spearman, 3_120);
        assert_eq!(swordsman, 3_600);
    }

    #[test]
    fn zero_distance_means_immediate_arrival() {
        let at = Position::new(5, 5);
        assert_eq!(travel_duration_seconds(at, at, UnitType::Swordsman), 0);
    }
}
