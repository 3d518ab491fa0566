//! Shell assembly: turning post-catch-up state into the viewer payload.
//!
//! Runs strictly after [`crate::catchup::run`] in the same transaction, so
//! every quantity in the payload is already consistent with the request's
//! "now". Assembly is read-only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use palisade_db::{movements, queue, reports, tiles, villages};
use palisade_economy::{production_rates, upgrade_costs, warehouse_capacity};
use palisade_military::movement as travel;
use palisade_types::{
    AccountId, BuildingLevels, Mission, MovementView, Perspective, Position, QueueEntryView,
    ReportView, TileView, TroopMovement, Village, VillageId, VillageKind, VillageOverview,
    VisibleVillage, WorldShell, WorldWindow,
};
use palisade_world::{ChunkBounds, fog_filter};
use sqlx::PgConnection;

use crate::config::GameConfig;
use crate::error::GameError;

/// Name shown when a movement endpoint no longer resolves to a village.
const UNKNOWN_VILLAGE: &str = "Unknown";

/// Assemble the full shell payload for one viewer.
///
/// # Errors
///
/// Returns [`GameError::Db`] if the store fails.
pub async fn assemble(
    conn: &mut PgConnection,
    config: &GameConfig,
    account: AccountId,
    chunk_x: i32,
    chunk_y: i32,
    chunk_size: i32,
    now: DateTime<Utc>,
) -> Result<WorldShell, GameError> {
    let owned = villages::list_for_account_locked(conn, account).await?;
    let owned_positions: Vec<Position> = owned.iter().map(|v| v.position).collect();

    let clamped = config.world.clamp_chunk_size(chunk_size);
    let bounds = ChunkBounds::of_chunk(chunk_x, chunk_y, clamped);
    let world = assemble_window(conn, config, &bounds, &owned_positions, chunk_x, chunk_y, clamped)
        .await?;

    let in_flight = movements::list_outbound_for_account(conn, account).await?;
    let movement_views = assemble_movements(conn, account, &owned, &in_flight).await?;

    let reports = assemble_reports(conn, config, account).await?;
    let build_queue = assemble_queue(conn, &owned).await?;
    let visible_villages = assemble_visible_villages(conn, config, account, &bounds).await?;

    let villages = owned.iter().map(village_overview).collect();

    Ok(WorldShell {
        account_id: account,
        server_time: now,
        world,
        villages,
        movements: movement_views,
        reports,
        build_queue,
        visible_villages,
    })
}

/// The fog-filtered tile window.
async fn assemble_window(
    conn: &mut PgConnection,
    config: &GameConfig,
    bounds: &ChunkBounds,
    owned_positions: &[Position],
    chunk_x: i32,
    chunk_y: i32,
    chunk_size: i32,
) -> Result<WorldWindow, GameError> {
    let window_tiles =
        tiles::list_in_window(conn, bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y).await?;
    let revealed = fog_filter(
        window_tiles,
        owned_positions,
        f64::from(config.world.visibility_radius),
    );
    Ok(WorldWindow {
        width: config.world.width,
        height: config.world.height,
        seed: config.world.seed,
        chunk_x,
        chunk_y,
        chunk_size,
        tiles: revealed
            .into_iter()
            .map(|tile| TileView {
                x: tile.x,
                y: tile.y,
                terrain: tile.terrain,
            })
            .collect(),
    })
}

/// Detailed view of one owned village.
fn village_overview(village: &Village) -> VillageOverview {
    VillageOverview {
        id: village.id,
        name: village.name.clone(),
        x: village.position.x,
        y: village.position.y,
        resources: village.resources(),
        spearmen: village.spearmen,
        swordsmen: village.swordsmen,
        production: production_rates(village),
        warehouse_capacity: warehouse_capacity(village.warehouse_level),
        buildings: BuildingLevels {
            main_building: village.main_building_level,
            timber_camp: village.timber_camp_level,
            clay_pit: village.clay_pit_level,
            iron_mine: village.iron_mine_level,
            warehouse: village.warehouse_level,
        },
        upgrade_costs: upgrade_costs(village),
        created_at: village.created_at,
    }
}

/// In-flight movements with names, distances, and cancel eligibility.
async fn assemble_movements(
    conn: &mut PgConnection,
    viewer: AccountId,
    owned: &[Village],
    in_flight: &[TroopMovement],
) -> Result<Vec<MovementView>, GameError> {
    // Endpoint villages, fetched once each. Owned villages are already in
    // hand; the rest come from the store.
    let mut endpoints: HashMap<VillageId, Village> =
        owned.iter().map(|v| (v.id, v.clone())).collect();
    for movement in in_flight {
        for id in [movement.source_village_id, movement.target_village_id] {
            if !endpoints.contains_key(&id) {
                if let Some(village) = villages::get(conn, id).await? {
                    endpoints.insert(id, village);
                }
            }
        }
    }

    let views = in_flight
        .iter()
        .map(|movement| {
            let source = endpoints.get(&movement.source_village_id);
            let target = endpoints.get(&movement.target_village_id);
            let (distance_tiles, duration_seconds) = match (source, target) {
                (Some(s), Some(t)) => (
                    s.position.distance_to(t.position),
                    travel::travel_duration_seconds(s.position, t.position, movement.unit_type),
                ),
                _ => (0.0, 0),
            };
            let can_cancel = movement.mission == Mission::Attack
                && source.is_some_and(|s| s.account_id == viewer);
            MovementView {
                id: movement.id,
                source_village_id: movement.source_village_id,
                target_village_id: movement.target_village_id,
                source_village_name: source
                    .map_or_else(|| UNKNOWN_VILLAGE.to_owned(), |s| s.name.clone()),
                target_village_name: target
                    .map_or_else(|| UNKNOWN_VILLAGE.to_owned(), |t| t.name.clone()),
                unit_type: movement.unit_type,
                unit_count: movement.unit_count,
                mission: movement.mission,
                status: movement.status,
                arrives_at: movement.arrives_at,
                distance_tiles,
                duration_seconds,
                loot: movement.loot,
                can_cancel,
            }
        })
        .collect();
    Ok(views)
}

/// Recent battle reports, tagged with the viewer's side.
async fn assemble_reports(
    conn: &mut PgConnection,
    config: &GameConfig,
    viewer: AccountId,
) -> Result<Vec<ReportView>, GameError> {
    let recent = reports::recent_for_account(conn, viewer, config.shell.report_limit).await?;
    Ok(recent
        .into_iter()
        .map(|report| {
            let perspective = if report.attacker_account_id == viewer {
                Perspective::Attack
            } else {
                Perspective::Defense
            };
            ReportView {
                id: report.id,
                attacker_village_name: report.attacker_village_name,
                defender_village_name: report.defender_village_name,
                unit_type: report.unit_type,
                attacker_sent: report.attacker_sent,
                attacker_survivors: report.attacker_survivors,
                defender_survivors: report.defender_survivors,
                loot: report.loot,
                outcome: report.outcome,
                perspective,
                created_at: report.created_at,
            }
        })
        .collect())
}

/// Pending build-queue entries across all owned villages, soonest first.
async fn assemble_queue(
    conn: &mut PgConnection,
    owned: &[Village],
) -> Result<Vec<QueueEntryView>, GameError> {
    let mut entries = Vec::new();
    for village in owned {
        let pending = queue::list_pending_for_village(conn, village.id).await?;
        entries.extend(pending.into_iter().map(|item| QueueEntryView {
            id: item.id,
            village_id: item.village_id,
            building_type: item.building_type,
            completes_at: item.completes_at,
        }));
    }
    entries.sort_by_key(|entry| entry.completes_at);
    Ok(entries)
}

/// Foreign villages inside the window, tagged abandoned vs player.
async fn assemble_visible_villages(
    conn: &mut PgConnection,
    config: &GameConfig,
    viewer: AccountId,
    bounds: &ChunkBounds,
) -> Result<Vec<VisibleVillage>, GameError> {
    let foreign = villages::list_foreign_in_window(
        conn,
        viewer,
        bounds.min_x,
        bounds.max_x,
        bounds.min_y,
        bounds.max_y,
    )
    .await?;
    Ok(foreign
        .into_iter()
        .map(|village| {
            let kind = if village.account_id.into_inner() == config.npc.account_id {
                VillageKind::Abandoned
            } else {
                VillageKind::Player
            };
            VisibleVillage {
                id: village.id,
                name: village.name,
                x: village.position.x,
                y: village.position.y,
                kind,
                troops: village.spearmen.saturating_add(village.swordsmen),
            }
        })
        .collect())
}
