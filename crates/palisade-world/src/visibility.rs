//! Chunk window arithmetic and fog-of-war filtering.
//!
//! A chunk is a fixed-size rectangular window of world tiles addressed by
//! `(chunk_x, chunk_y)`. Fog-of-war reveals only the tiles within a
//! Euclidean radius of at least one village the viewer owns; a viewer with
//! no villages sees nothing.
//!
//! Chunk coordinates are expected to be clamped to the world's valid chunk
//! range by the caller; this module does not clamp.

use palisade_types::{Position, WorldTile};

/// Inclusive tile bounds of a chunk window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    /// Westmost tile column.
    pub min_x: i32,
    /// Northmost tile row.
    pub min_y: i32,
    /// Eastmost tile column (inclusive).
    pub max_x: i32,
    /// Southmost tile row (inclusive).
    pub max_y: i32,
}

impl ChunkBounds {
    /// Compute the tile bounds of chunk `(chunk_x, chunk_y)` with the given
    /// edge length.
    pub const fn of_chunk(chunk_x: i32, chunk_y: i32, chunk_size: i32) -> Self {
        let min_x = chunk_x.saturating_mul(chunk_size);
        let min_y = chunk_y.saturating_mul(chunk_size);
        Self {
            min_x,
            min_y,
            max_x: min_x.saturating_add(chunk_size).saturating_sub(1),
            max_y: min_y.saturating_add(chunk_size).saturating_sub(1),
        }
    }

    /// Whether the given tile coordinate lies inside the window.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Keep only the tiles within `radius` (Euclidean, inclusive) of at least
/// one of the viewer's village positions.
///
/// Returns an empty vector when `positions` is empty: a player with no
/// villages has explored nothing.
pub fn fog_filter(tiles: Vec<WorldTile>, positions: &[Position], radius: f64) -> Vec<WorldTile> {
    if positions.is_empty() {
        return Vec::new();
    }

    tiles
        .into_iter()
        .filter(|tile| {
            let at = Position::new(tile.x, tile.y);
            positions.iter().any(|pos| pos.distance_to(at) <= radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use palisade_types::Terrain;

    use super::*;

    fn tile(x: i32, y: i32) -> WorldTile {
        WorldTile {
            x,
            y,
            terrain: Terrain::Plains,
        }
    }

    #[test]
    fn chunk_bounds_are_inclusive() {
        let bounds = ChunkBounds::of_chunk(2, 1, 16);
        assert_eq!(bounds.min_x, 32);
        assert_eq!(bounds.max_x, 47);
        assert_eq!(bounds.min_y, 16);
        assert_eq!(bounds.max_y, 31);
        assert!(bounds.contains(32, 16));
        assert!(bounds.contains(47, 31));
        assert!(!bounds.contains(48, 31));
    }

    #[test]
    fn no_villages_means_no_tiles() {
        let tiles = vec![tile(0, 0), tile(1, 1)];
        assert!(fog_filter(tiles, &[], 8.0).is_empty());
    }

    #[test]
    fn tiles_outside_radius_are_withheld() {
        let tiles = vec![tile(0, 0), tile(5, 0), tile(20, 0)];
        let visible = fog_filter(tiles, &[Position::new(0, 0)], 8.0);
        let coords: Vec<i32> = visible.iter().map(|t| t.x).collect();
        assert_eq!(coords, vec![0, 5]);
    }

    #[test]
    fn radius_is_inclusive_and_euclidean() {
        // (3,4) is exactly 5 tiles from the origin.
        let tiles = vec![tile(3, 4), tile(4, 4)];
        let visible = fog_filter(tiles, &[Position::new(0, 0)], 5.0);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.first().map(|t| (t.x, t.y)), Some((3, 4)));
    }

    #[test]
    fn any_village_can_reveal_a_tile() {
        let tiles = vec![tile(0, 0), tile(30, 30)];
        let positions = [Position::new(0, 1), Position::new(30, 31)];
        let visible = fog_filter(tiles, &positions, 2.0);
        assert_eq!(visible.len(), 2);
    }
}
