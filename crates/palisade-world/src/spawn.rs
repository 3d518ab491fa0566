//! Starting-village placement.
//!
//! New accounts get a village at a deterministic position derived from the
//! world seed, chosen to keep a minimum Euclidean distance from every
//! existing village. The search walks up to 4000 hash-driven candidate
//! positions; if none qualifies (a crowded world), it falls back to the
//! world center rather than failing registration.

use palisade_types::Position;
use tracing::warn;

use crate::terrain::coordinate_hash;

/// Maximum candidate positions examined before giving up.
const MAX_ATTEMPTS: i32 = 4_000;

/// Pick a spawn position for a new village.
///
/// Candidates are derived from `coordinate_hash(seed, attempt, dimension)`,
/// so the sequence is stable for a given seed and world size. Returns the
/// first candidate at least `minimum_distance` tiles (Euclidean) from all
/// `existing` villages, or the world center after [`MAX_ATTEMPTS`].
pub fn assign_starting_location(
    existing: &[Position],
    seed: i32,
    width: i32,
    height: i32,
    minimum_distance: i32,
) -> Position {
    let center = Position::new(width / 2, height / 2);
    if width <= 0 || height <= 0 {
        return center;
    }

    let min_distance = f64::from(minimum_distance);
    for attempt in 0..MAX_ATTEMPTS {
        let x = fold_to_dimension(coordinate_hash(seed, attempt, width), width);
        let y = fold_to_dimension(coordinate_hash(seed, attempt, height), height);
        let candidate = Position::new(x, y);

        if existing
            .iter()
            .all(|village| village.distance_to(candidate) >= min_distance)
        {
            return candidate;
        }
    }

    warn!(
        existing = existing.len(),
        minimum_distance, "no spawn candidate found, falling back to world center"
    );
    center
}

/// Fold a hash value into `[0, dimension)`. `dimension` must be positive.
fn fold_to_dimension(hash: i32, dimension: i32) -> i32 {
    let folded = hash
        .unsigned_abs()
        .checked_rem(dimension.unsigned_abs())
        .unwrap_or(0);
    i32::try_from(folded).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_minimum_distance_when_a_point_exists() {
        let existing = vec![Position::new(10, 10), Position::new(35, 35)];
        let location = assign_starting_location(&existing, 5, 50, 50, 10);

        for village in &existing {
            assert!(village.distance_to(location) >= 10.0);
        }
    }

    #[test]
    fn is_deterministic_for_a_given_seed() {
        let first = assign_starting_location(&[], 9, 64, 64, 10);
        let second = assign_starting_location(&[], 9, 64, 64, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn stays_inside_the_world() {
        for seed in 0..50 {
            let location = assign_starting_location(&[], seed, 64, 64, 10);
            assert!((0..64).contains(&location.x));
            assert!((0..64).contains(&location.y));
        }
    }

    #[test]
    fn falls_back_to_center_when_world_is_saturated() {
        // A village on every tile of a tiny world leaves no valid point.
        let mut existing = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                existing.push(Position::new(x, y));
            }
        }
        let location = assign_starting_location(&existing, 1, 4, 4, 3);
        assert_eq!(location, Position::new(2, 2));
    }
}
