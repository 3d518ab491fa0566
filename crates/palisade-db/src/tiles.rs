//! World-tile seeding and window queries.
//!
//! Tiles are immutable once written. Seeding is idempotent at the table
//! level: if any tile row exists the generator's output is discarded, so
//! concurrent first requests cannot produce a torn map.

use palisade_types::{Terrain, WorldTile};
use sqlx::PgConnection;

use crate::error::DbError;

/// Whether the world map has been generated yet.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn any_exist(conn: &mut PgConnection) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM world_tiles)")
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

/// Batch-insert generated tiles with a single `UNNEST` statement.
///
/// `ON CONFLICT DO NOTHING` makes the write safe against a concurrent
/// seeder that won the race after our [`any_exist`] check.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert_batch(conn: &mut PgConnection, tiles: &[WorldTile]) -> Result<(), DbError> {
    if tiles.is_empty() {
        return Ok(());
    }

    let mut xs = Vec::with_capacity(tiles.len());
    let mut ys = Vec::with_capacity(tiles.len());
    let mut terrains = Vec::with_capacity(tiles.len());
    for tile in tiles {
        xs.push(tile.x);
        ys.push(tile.y);
        terrains.push(tile.terrain.as_str().to_owned());
    }

    sqlx::query(
        r"INSERT INTO world_tiles (x, y, terrain)
          SELECT * FROM UNNEST($1::INTEGER[], $2::INTEGER[], $3::VARCHAR[])
          ON CONFLICT (x, y) DO NOTHING",
    )
    .bind(&xs)
    .bind(&ys)
    .bind(&terrains)
    .execute(conn)
    .await?;

    tracing::info!(tiles = tiles.len(), "world tiles seeded");
    Ok(())
}

/// Tiles inside the inclusive window, ordered row-major.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if a stored terrain string is unknown.
pub async fn list_in_window(
    conn: &mut PgConnection,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
) -> Result<Vec<WorldTile>, DbError> {
    let rows: Vec<(i32, i32, String)> = sqlx::query_as(
        r"SELECT x, y, terrain FROM world_tiles
          WHERE x >= $1 AND x <= $2 AND y >= $3 AND y <= $4
          ORDER BY y, x",
    )
    .bind(min_x)
    .bind(max_x)
    .bind(min_y)
    .bind(max_y)
    .fetch_all(conn)
    .await?;

    rows.into_iter()
        .map(|(x, y, terrain)| {
            let terrain: Terrain = terrain.parse()?;
            Ok(WorldTile { x, y, terrain })
        })
        .collect()
}
