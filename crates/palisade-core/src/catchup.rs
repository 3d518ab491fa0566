//! The catch-up pass: advancing the world to "now" on every request.
//!
//! There is no background loop. Each request runs this pass inside its own
//! transaction before doing anything else: accrue resources for the
//! caller's villages, make sure the map exists, then fire every due
//! movement and build item exactly once. The exactly-once guarantee comes
//! from the guarded status transitions in `palisade-db`: whichever
//! transaction wins the check-and-set applies the side effects, everyone
//! else skips.

use chrono::{DateTime, Utc};
use palisade_db::{movements, queue, reports, tiles, villages};
use palisade_economy::production;
use palisade_military::combat::{self, Army};
use palisade_military::{movement as travel, plunder};
use palisade_types::{
    AccountId, BattleOutcome, BattleReport, Mission, MovementId, MovementStatus, ReportId,
    Resources, TroopMovement, Village,
};
use palisade_world as world;
use sqlx::PgConnection;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::GameError;

/// Run the full catch-up pass for one caller.
///
/// Economy ticking comes first (construction and combat both consume stocks
/// the tick just updated); movement and queue resolution are independent of
/// each other.
///
/// # Errors
///
/// Returns [`GameError::Db`] if the store fails.
pub async fn run(
    conn: &mut PgConnection,
    config: &GameConfig,
    account: AccountId,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    tick_owned_villages(conn, account, now).await?;
    ensure_world_tiles(conn, config).await?;
    resolve_due_movements(conn, now).await?;
    resolve_due_queue(conn, now).await?;
    Ok(())
}

/// Apply elapsed-time accrual to every village the caller owns.
async fn tick_owned_villages(
    conn: &mut PgConnection,
    account: AccountId,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let owned = villages::list_for_account_locked(conn, account).await?;
    for mut village in owned {
        production::tick(&mut village, now);
        villages::save_state(conn, &village).await?;
    }
    Ok(())
}

/// Generate and persist the world map if no tile exists yet.
///
/// # Errors
///
/// Returns [`GameError::Db`] if the store fails.
pub async fn ensure_world_tiles(
    conn: &mut PgConnection,
    config: &GameConfig,
) -> Result<(), GameError> {
    if tiles::any_exist(conn).await? {
        return Ok(());
    }
    let generated = world::generate(config.world.seed, config.world.width, config.world.height);
    tiles::insert_batch(conn, &generated).await?;
    Ok(())
}

/// Fire every outbound movement whose arrival time has passed.
async fn resolve_due_movements(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let due = movements::due_locked(conn, now).await?;
    for movement in due {
        if !movements::mark_resolved(conn, movement.id, now).await? {
            // Another pass won this movement.
            continue;
        }
        match movement.mission {
            Mission::Attack => resolve_attack(conn, &movement, now).await?,
            Mission::Return => resolve_return(conn, &movement, now).await?,
        }
    }
    Ok(())
}

/// Resolve an arrived attack: combat, report, plunder, and (for surviving
/// attackers) the return leg home.
async fn resolve_attack(
    conn: &mut PgConnection,
    movement: &TroopMovement,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let Some(source) = villages::get_locked(conn, movement.source_village_id).await? else {
        warn!(movement_id = %movement.id, "attack source village missing, movement dropped");
        return Ok(());
    };
    let Some(mut target) = villages::get_locked(conn, movement.target_village_id).await? else {
        warn!(movement_id = %movement.id, "attack target village missing, movement dropped");
        return Ok(());
    };

    // Bring the defender's stocks up to date so plunder sees real holdings.
    production::tick(&mut target, now);

    let attacker = Army::new(movement.unit_type, movement.unit_count);
    let defender = combat::defending_army(&target);
    let result = combat::resolve_combat(attacker, defender);

    let mut loot = Resources::ZERO;
    if result.attacker_won {
        target.set_troop_count(defender.unit_type, 0);
        if result.attacker_survivors > 0 {
            loot = plunder::take_plunder(movement.unit_type, result.attacker_survivors, &mut target);
            enqueue_return_leg(conn, movement, &source, &target, result.attacker_survivors, loot, now)
                .await?;
        }
    } else {
        target.set_troop_count(defender.unit_type, result.defender_survivors);
    }
    villages::save_state(conn, &target).await?;

    let outcome = if result.attacker_won {
        BattleOutcome::Victory
    } else {
        BattleOutcome::Defeat
    };
    let report = BattleReport {
        id: ReportId::new(),
        attacker_account_id: source.account_id,
        defender_account_id: target.account_id,
        attacker_village_name: source.name.clone(),
        defender_village_name: target.name.clone(),
        unit_type: movement.unit_type,
        attacker_sent: movement.unit_count,
        attacker_survivors: result.attacker_survivors,
        defender_survivors: result.defender_survivors,
        loot,
        outcome,
        created_at: now,
    };
    reports::insert(conn, &report).await?;

    info!(
        movement_id = %movement.id,
        attacker = %source.name,
        defender = %target.name,
        outcome = outcome.as_str(),
        attacker_survivors = result.attacker_survivors,
        defender_survivors = result.defender_survivors,
        loot_total = loot.total(),
        "attack resolved"
    );
    Ok(())
}

/// Insert the return leg carrying survivors and loot back to the source.
async fn enqueue_return_leg(
    conn: &mut PgConnection,
    attack: &TroopMovement,
    source: &Village,
    target: &Village,
    survivors: i32,
    loot: Resources,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let return_leg = TroopMovement {
        id: MovementId::new(),
        // The battle site is the origin of the journey home.
        source_village_id: attack.target_village_id,
        target_village_id: attack.source_village_id,
        unit_type: attack.unit_type,
        unit_count: survivors,
        mission: Mission::Return,
        status: MovementStatus::Outbound,
        loot,
        departed_at: now,
        arrives_at: travel::arrival_time(now, target.position, source.position, attack.unit_type),
        resolved_at: None,
    };
    movements::insert(conn, &return_leg).await?;
    debug!(
        movement_id = %return_leg.id,
        survivors,
        arrives_at = %return_leg.arrives_at,
        "return leg enqueued"
    );
    Ok(())
}

/// Resolve an arrived return leg: credit survivors and loot into the home
/// village.
async fn resolve_return(
    conn: &mut PgConnection,
    movement: &TroopMovement,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let Some(mut home) = villages::get_locked(conn, movement.target_village_id).await? else {
        warn!(movement_id = %movement.id, "return home village missing, movement dropped");
        return Ok(());
    };
    production::tick(&mut home, now);
    plunder::apply_return_home(&mut home, movement.unit_type, movement.unit_count, movement.loot);
    villages::save_state(conn, &home).await?;
    debug!(
        movement_id = %movement.id,
        village = %home.name,
        units = movement.unit_count,
        loot_total = movement.loot.total(),
        "return leg resolved"
    );
    Ok(())
}

/// Apply every due build-queue item. The cost was paid at enqueue time, so
/// the level bump is unconditional once the completion guard is won.
async fn resolve_due_queue(conn: &mut PgConnection, now: DateTime<Utc>) -> Result<(), GameError> {
    let due = queue::due_locked(conn, now).await?;
    for item in due {
        if !queue::mark_completed(conn, item.id, now).await? {
            continue;
        }
        let Some(mut village) = villages::get_locked(conn, item.village_id).await? else {
            warn!(queue_item_id = %item.id, "queued upgrade's village missing, item dropped");
            continue;
        };
        palisade_economy::complete_queued(&mut village, item.building_type);
        villages::save_state(conn, &village).await?;
        debug!(
            queue_item_id = %item.id,
            village = %village.name,
            building = item.building_type.as_str(),
            "queued upgrade applied"
        );
    }
    Ok(())
}
