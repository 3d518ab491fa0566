//! Village rows: reads, row locks, and state writes.
//!
//! The orchestrator locks the villages it is about to mutate with
//! `SELECT ... FOR UPDATE` so two overlapping catch-up passes over the
//! same village serialize at the store instead of double-applying accrual.

use palisade_types::{AccountId, Position, Village, VillageId};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DbError;

/// Column list shared by every village query.
const VILLAGE_COLUMNS: &str = "id, account_id, name, x, y, wood, clay, iron, \
     main_building_level, timber_camp_level, clay_pit_level, iron_mine_level, \
     warehouse_level, spearmen, swordsmen, last_tick_at, created_at";

/// A row from the `villages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VillageRow {
    /// Village UUID.
    pub id: Uuid,
    /// Owning account UUID.
    pub account_id: Uuid,
    /// Display name.
    pub name: String,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Wood stock.
    pub wood: i32,
    /// Clay stock.
    pub clay: i32,
    /// Iron stock.
    pub iron: i32,
    /// Main building level.
    pub main_building_level: i32,
    /// Timber camp level.
    pub timber_camp_level: i32,
    /// Clay pit level.
    pub clay_pit_level: i32,
    /// Iron mine level.
    pub iron_mine_level: i32,
    /// Warehouse level.
    pub warehouse_level: i32,
    /// Garrisoned spearmen.
    pub spearmen: i32,
    /// Garrisoned swordsmen.
    pub swordsmen: i32,
    /// Last applied resource accrual.
    pub last_tick_at: chrono::DateTime<chrono::Utc>,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<VillageRow> for Village {
    fn from(row: VillageRow) -> Self {
        Self {
            id: VillageId::from(row.id),
            account_id: AccountId::from(row.account_id),
            name: row.name,
            position: Position::new(row.x, row.y),
            wood: row.wood,
            clay: row.clay,
            iron: row.iron,
            main_building_level: row.main_building_level,
            timber_camp_level: row.timber_camp_level,
            clay_pit_level: row.clay_pit_level,
            iron_mine_level: row.iron_mine_level,
            warehouse_level: row.warehouse_level,
            spearmen: row.spearmen,
            swordsmen: row.swordsmen,
            last_tick_at: row.last_tick_at,
            created_at: row.created_at,
        }
    }
}

/// Insert a freshly created village.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert(conn: &mut PgConnection, village: &Village) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO villages (id, account_id, name, x, y, wood, clay, iron,
              main_building_level, timber_camp_level, clay_pit_level, iron_mine_level,
              warehouse_level, spearmen, swordsmen, last_tick_at, created_at)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(village.id.into_inner())
    .bind(village.account_id.into_inner())
    .bind(&village.name)
    .bind(village.position.x)
    .bind(village.position.y)
    .bind(village.wood)
    .bind(village.clay)
    .bind(village.iron)
    .bind(village.main_building_level)
    .bind(village.timber_camp_level)
    .bind(village.clay_pit_level)
    .bind(village.iron_mine_level)
    .bind(village.warehouse_level)
    .bind(village.spearmen)
    .bind(village.swordsmen)
    .bind(village.last_tick_at)
    .bind(village.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Fetch a village without locking it.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn get(conn: &mut PgConnection, id: VillageId) -> Result<Option<Village>, DbError> {
    let row = sqlx::query_as::<_, VillageRow>(&format!(
        "SELECT {VILLAGE_COLUMNS} FROM villages WHERE id = $1"
    ))
    .bind(id.into_inner())
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Village::from))
}

/// Fetch a village and take a row lock for the current transaction.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn get_locked(
    conn: &mut PgConnection,
    id: VillageId,
) -> Result<Option<Village>, DbError> {
    let row = sqlx::query_as::<_, VillageRow>(&format!(
        "SELECT {VILLAGE_COLUMNS} FROM villages WHERE id = $1 FOR UPDATE"
    ))
    .bind(id.into_inner())
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Village::from))
}

/// Fetch a village locked for update, but only if `account` owns it.
///
/// Callers treat `None` uniformly for "does not exist" and "not yours":
/// ownership failures reveal nothing beyond existence.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn get_owned_locked(
    conn: &mut PgConnection,
    id: VillageId,
    account: AccountId,
) -> Result<Option<Village>, DbError> {
    let row = sqlx::query_as::<_, VillageRow>(&format!(
        "SELECT {VILLAGE_COLUMNS} FROM villages WHERE id = $1 AND account_id = $2 FOR UPDATE"
    ))
    .bind(id.into_inner())
    .bind(account.into_inner())
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Village::from))
}

/// Fetch all villages of an account, locked for update, ordered by
/// creation time.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn list_for_account_locked(
    conn: &mut PgConnection,
    account: AccountId,
) -> Result<Vec<Village>, DbError> {
    let rows = sqlx::query_as::<_, VillageRow>(&format!(
        "SELECT {VILLAGE_COLUMNS} FROM villages WHERE account_id = $1 ORDER BY created_at FOR UPDATE"
    ))
    .bind(account.into_inner())
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(Village::from).collect())
}

/// Write back every mutable field of a village.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn save_state(conn: &mut PgConnection, village: &Village) -> Result<(), DbError> {
    sqlx::query(
        r"UPDATE villages
          SET wood = $2, clay = $3, iron = $4,
              main_building_level = $5, timber_camp_level = $6, clay_pit_level = $7,
              iron_mine_level = $8, warehouse_level = $9,
              spearmen = $10, swordsmen = $11, last_tick_at = $12
          WHERE id = $1",
    )
    .bind(village.id.into_inner())
    .bind(village.wood)
    .bind(village.clay)
    .bind(village.iron)
    .bind(village.main_building_level)
    .bind(village.timber_camp_level)
    .bind(village.clay_pit_level)
    .bind(village.iron_mine_level)
    .bind(village.warehouse_level)
    .bind(village.spearmen)
    .bind(village.swordsmen)
    .bind(village.last_tick_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Positions of every village in the world (for spawn placement).
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn all_positions(conn: &mut PgConnection) -> Result<Vec<Position>, DbError> {
    let rows: Vec<(i32, i32)> = sqlx::query_as("SELECT x, y FROM villages")
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|(x, y)| Position::new(x, y)).collect())
}

/// Villages of *other* accounts whose position lies inside the inclusive
/// window, for the shell's visible-villages list.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn list_foreign_in_window(
    conn: &mut PgConnection,
    viewer: AccountId,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
) -> Result<Vec<Village>, DbError> {
    let rows = sqlx::query_as::<_, VillageRow>(&format!(
        "SELECT {VILLAGE_COLUMNS} FROM villages
         WHERE account_id <> $1
           AND x >= $2 AND x <= $3 AND y >= $4 AND y <= $5
         ORDER BY y, x"
    ))
    .bind(viewer.into_inner())
    .bind(min_x)
    .bind(max_x)
    .bind(min_y)
    .bind(max_y)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(Village::from).collect())
}
