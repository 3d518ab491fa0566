//! Troop movement rows and guarded status transitions.
//!
//! A movement leaves the `outbound` state exactly once. The transition is a
//! check-and-set `UPDATE ... WHERE status = 'outbound'` whose row count
//! tells the caller whether it won; losers skip the side effects entirely.

use chrono::{DateTime, Utc};
use palisade_types::{
    AccountId, Mission, MovementId, MovementStatus, Resources, TroopMovement, UnitType, VillageId,
};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DbError;

/// Column list shared by every movement query.
const MOVEMENT_COLUMNS: &str = "id, source_village_id, target_village_id, unit_type, \
     unit_count, mission, status, loot_wood, loot_clay, loot_iron, \
     departed_at, arrives_at, resolved_at";

/// A row from the `troop_movements` table, enum columns still encoded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovementRow {
    /// Movement UUID.
    pub id: Uuid,
    /// Source village UUID.
    pub source_village_id: Uuid,
    /// Target village UUID.
    pub target_village_id: Uuid,
    /// Encoded unit kind.
    pub unit_type: String,
    /// Army size.
    pub unit_count: i32,
    /// Encoded mission.
    pub mission: String,
    /// Encoded lifecycle state.
    pub status: String,
    /// Wood carried home.
    pub loot_wood: i32,
    /// Clay carried home.
    pub loot_clay: i32,
    /// Iron carried home.
    pub loot_iron: i32,
    /// Departure timestamp.
    pub departed_at: DateTime<Utc>,
    /// Scheduled arrival timestamp.
    pub arrives_at: DateTime<Utc>,
    /// Terminal-transition timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<MovementRow> for TroopMovement {
    type Error = DbError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let unit_type: UnitType = row.unit_type.parse()?;
        let mission: Mission = row.mission.parse()?;
        let status: MovementStatus = row.status.parse()?;
        Ok(Self {
            id: MovementId::from(row.id),
            source_village_id: VillageId::from(row.source_village_id),
            target_village_id: VillageId::from(row.target_village_id),
            unit_type,
            unit_count: row.unit_count,
            mission,
            status,
            loot: Resources::new(row.loot_wood, row.loot_clay, row.loot_iron),
            departed_at: row.departed_at,
            arrives_at: row.arrives_at,
            resolved_at: row.resolved_at,
        })
    }
}

fn decode_all(rows: Vec<MovementRow>) -> Result<Vec<TroopMovement>, DbError> {
    rows.into_iter().map(TroopMovement::try_from).collect()
}

/// Insert a newly dispatched movement.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert(conn: &mut PgConnection, movement: &TroopMovement) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO troop_movements (id, source_village_id, target_village_id,
              unit_type, unit_count, mission, status,
              loot_wood, loot_clay, loot_iron, departed_at, arrives_at, resolved_at)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(movement.id.into_inner())
    .bind(movement.source_village_id.into_inner())
    .bind(movement.target_village_id.into_inner())
    .bind(movement.unit_type.as_str())
    .bind(movement.unit_count)
    .bind(movement.mission.as_str())
    .bind(movement.status.as_str())
    .bind(movement.loot.wood)
    .bind(movement.loot.clay)
    .bind(movement.loot.iron)
    .bind(movement.departed_at)
    .bind(movement.arrives_at)
    .bind(movement.resolved_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Fetch a movement by id without locking it.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if an enum column fails to decode.
pub async fn get(
    conn: &mut PgConnection,
    id: MovementId,
) -> Result<Option<TroopMovement>, DbError> {
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM troop_movements WHERE id = $1"
    ))
    .bind(id.into_inner())
    .fetch_optional(conn)
    .await?;
    row.map(TroopMovement::try_from).transpose()
}

/// Outbound movements whose arrival time has passed, oldest arrival first,
/// locked for the current transaction.
///
/// `SKIP LOCKED` lets concurrent catch-up passes partition the due set
/// instead of queueing behind each other.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if an enum column fails to decode.
pub async fn due_locked(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> Result<Vec<TroopMovement>, DbError> {
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM troop_movements
         WHERE status = 'outbound' AND arrives_at <= $1
         ORDER BY arrives_at
         FOR UPDATE SKIP LOCKED"
    ))
    .bind(now)
    .fetch_all(conn)
    .await?;
    decode_all(rows)
}

/// Transition an outbound movement to `resolved`. Returns whether this call
/// won the transition.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn mark_resolved(
    conn: &mut PgConnection,
    id: MovementId,
    now: DateTime<Utc>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        r"UPDATE troop_movements SET status = 'resolved', resolved_at = $2
          WHERE id = $1 AND status = 'outbound'",
    )
    .bind(id.into_inner())
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Transition an outbound movement to `canceled`. Returns whether this call
/// won the transition.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn mark_canceled(
    conn: &mut PgConnection,
    id: MovementId,
    now: DateTime<Utc>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        r"UPDATE troop_movements SET status = 'canceled', resolved_at = $2
          WHERE id = $1 AND status = 'outbound'",
    )
    .bind(id.into_inner())
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Outbound movements whose source or target village belongs to `account`,
/// soonest arrival first.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if an enum column fails to decode.
pub async fn list_outbound_for_account(
    conn: &mut PgConnection,
    account: AccountId,
) -> Result<Vec<TroopMovement>, DbError> {
    let rows = sqlx::query_as::<_, MovementRow>(
        r"SELECT m.id, m.source_village_id, m.target_village_id, m.unit_type,
                 m.unit_count, m.mission, m.status, m.loot_wood, m.loot_clay,
                 m.loot_iron, m.departed_at, m.arrives_at, m.resolved_at
          FROM troop_movements m
          WHERE m.status = 'outbound'
            AND EXISTS (
                SELECT 1 FROM villages v
                WHERE v.account_id = $1
                  AND v.id IN (m.source_village_id, m.target_village_id))
          ORDER BY m.arrives_at",
    )
    .bind(account.into_inner())
    .fetch_all(conn)
    .await?;
    decode_all(rows)
}
