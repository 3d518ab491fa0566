//! Write-once battle reports.
//!
//! Reports are denormalized at resolution time (village names copied in) so
//! they stay readable after the world moves on. They are inserted once and
//! never updated.

use chrono::{DateTime, Utc};
use palisade_types::{AccountId, BattleOutcome, BattleReport, ReportId, Resources, UnitType};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DbError;

/// A row from the `battle_reports` table, enum columns still encoded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    /// Report UUID.
    pub id: Uuid,
    /// Attacking account UUID.
    pub attacker_account_id: Uuid,
    /// Defending account UUID.
    pub defender_account_id: Uuid,
    /// Attacking village name at resolution time.
    pub attacker_village_name: String,
    /// Defending village name at resolution time.
    pub defender_village_name: String,
    /// Encoded unit kind.
    pub unit_type: String,
    /// Units the attacker sent.
    pub attacker_sent: i32,
    /// Attacker survivors.
    pub attacker_survivors: i32,
    /// Defender survivors.
    pub defender_survivors: i32,
    /// Wood plundered.
    pub loot_wood: i32,
    /// Clay plundered.
    pub loot_clay: i32,
    /// Iron plundered.
    pub loot_iron: i32,
    /// Encoded outcome.
    pub outcome: String,
    /// Resolution timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for BattleReport {
    type Error = DbError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let unit_type: UnitType = row.unit_type.parse()?;
        let outcome: BattleOutcome = row.outcome.parse()?;
        Ok(Self {
            id: ReportId::from(row.id),
            attacker_account_id: AccountId::from(row.attacker_account_id),
            defender_account_id: AccountId::from(row.defender_account_id),
            attacker_village_name: row.attacker_village_name,
            defender_village_name: row.defender_village_name,
            unit_type,
            attacker_sent: row.attacker_sent,
            attacker_survivors: row.attacker_survivors,
            defender_survivors: row.defender_survivors,
            loot: Resources::new(row.loot_wood, row.loot_clay, row.loot_iron),
            outcome,
            created_at: row.created_at,
        })
    }
}

/// Insert a freshly written report.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn insert(conn: &mut PgConnection, report: &BattleReport) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO battle_reports (id, attacker_account_id, defender_account_id,
              attacker_village_name, defender_village_name, unit_type,
              attacker_sent, attacker_survivors, defender_survivors,
              loot_wood, loot_clay, loot_iron, outcome, created_at)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(report.id.into_inner())
    .bind(report.attacker_account_id.into_inner())
    .bind(report.defender_account_id.into_inner())
    .bind(&report.attacker_village_name)
    .bind(&report.defender_village_name)
    .bind(report.unit_type.as_str())
    .bind(report.attacker_sent)
    .bind(report.attacker_survivors)
    .bind(report.defender_survivors)
    .bind(report.loot.wood)
    .bind(report.loot.clay)
    .bind(report.loot.iron)
    .bind(report.outcome.as_str())
    .bind(report.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// The most recent reports involving `account` on either side, newest
/// first, capped at `limit`.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the query fails and
/// [`DbError::CorruptRow`] if an enum column fails to decode.
pub async fn recent_for_account(
    conn: &mut PgConnection,
    account: AccountId,
    limit: i64,
) -> Result<Vec<BattleReport>, DbError> {
    let rows = sqlx::query_as::<_, ReportRow>(
        r"SELECT id, attacker_account_id, defender_account_id,
                 attacker_village_name, defender_village_name, unit_type,
                 attacker_sent, attacker_survivors, defender_survivors,
                 loot_wood, loot_clay, loot_iron, outcome, created_at
          FROM battle_reports
          WHERE attacker_account_id = $1 OR defender_account_id = $1
          ORDER BY created_at DESC
          LIMIT $2",
    )
    .bind(account.into_inner())
    .bind(limit)
    .fetch_all(conn)
    .await?;
    rows.into_iter().map(BattleReport::try_from).collect()
}
