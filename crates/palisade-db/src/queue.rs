//! Building queue rows and guarded completion.
//!
//! Queue items are paid for at insert time, so completion applies the level
//! bump unconditionally. The `completed_at IS NULL` guard on completion
//! keeps the bump exactly-once under concurrent catch-up passes.

use chrono::{DateTime, Utc};
use palisade_types::{BuildingQueueItem, BuildingType, QueueItemId, VillageId};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DbError;

/// A row from the `building_queue` table, enum column still encoded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueueRow {
    /// Item UUID.
    pub id: Uuid,
    /// Village UUID.
    pub village_id: Uuid,
    /// Encoded building kind.
    pub building_type: String,
    /// Enqueue timestamp.
    pub created_at: DateTime<Utc>,
    /// Scheduled completion timestamp.
    pub completes_at: DateTime<Utc>,
    /// Applied-completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<QueueRow> for BuildingQueueItem {
    type Error = DbError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let building_type: BuildingType = row.building_type.parse()?;
        Ok(Self {
            id: QueueItemId::from(row.id),
            village_id: VillageId::from(row.village_id),
            building_type,
            created_at: row.created_at,
            completes_at: row.completes_at,
            completed_at: row.completed_at,
        })
    }
}

fn decode_all(rows: Vec<QueueRow>) -> Result<Vec<BuildingQueueItem>, DbError> {
    rows.into_iter().map(BuildingQueueItem::try_from).collect()
}

/// Insert a newly enqueued upgrade.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert(conn: &mut PgConnection, item: &BuildingQueueItem) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO building_queue (id, village_id, building_type,
              created_at, completes_at, completed_at)
          VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(item.id.into_inner())
    .bind(item.village_id.into_inner())
    .bind(item.building_type.as_str())
    .bind(item.created_at)
    .bind(item.completes_at)
    .bind(item.completed_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Number of pending (not yet completed) items for a village. The enqueue
/// path uses this as the queue depth for the sequencing penalty.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails.
pub async fn pending_count(conn: &mut PgConnection, village: VillageId) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM building_queue WHERE village_id = $1 AND completed_at IS NULL",
    )
    .bind(village.into_inner())
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Pending items whose completion time has passed, oldest first, locked for
/// the current transaction.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if a building column fails to decode.
pub async fn due_locked(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> Result<Vec<BuildingQueueItem>, DbError> {
    let rows = sqlx::query_as::<_, QueueRow>(
        r"SELECT id, village_id, building_type, created_at, completes_at, completed_at
          FROM building_queue
          WHERE completed_at IS NULL AND completes_at <= $1
          ORDER BY completes_at
          FOR UPDATE SKIP LOCKED",
    )
    .bind(now)
    .fetch_all(conn)
    .await?;
    decode_all(rows)
}

/// Stamp a pending item as completed. Returns whether this call won the
/// transition.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the update fails.
pub async fn mark_completed(
    conn: &mut PgConnection,
    id: QueueItemId,
    now: DateTime<Utc>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        r"UPDATE building_queue SET completed_at = $2
          WHERE id = $1 AND completed_at IS NULL",
    )
    .bind(id.into_inner())
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Pending items for a village, soonest completion first.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if a building column fails to decode.
pub async fn list_pending_for_village(
    conn: &mut PgConnection,
    village: VillageId,
) -> Result<Vec<BuildingQueueItem>, DbError> {
    let rows = sqlx::query_as::<_, QueueRow>(
        r"SELECT id, village_id, building_type, created_at, completes_at, completed_at
          FROM building_queue
          WHERE village_id = $1 AND completed_at IS NULL
          ORDER BY completes_at",
    )
    .bind(village.into_inner())
    .fetch_all(conn)
    .await?;
    decode_all(rows)
}
