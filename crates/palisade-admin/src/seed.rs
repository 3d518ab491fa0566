//! NPC ("abandoned") village seeding.
//!
//! Runs once at world setup, never in the request path. Placement and
//! garrison rolls come from one seeded RNG, so the same configuration
//! reproduces the same camps.

use chrono::{DateTime, Utc};
use palisade_core::GameError;
use palisade_core::config::GameConfig;
use palisade_db::villages;
use palisade_types::{AccountId, Position, Village, VillageId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgConnection;
use tracing::info;

/// Insert the configured number of abandoned villages.
///
/// Idempotent at the account level: if the NPC account already owns any
/// village, seeding is skipped entirely.
///
/// # Errors
///
/// Returns [`GameError::Db`] if the store fails.
pub async fn seed_npc_villages(
    conn: &mut PgConnection,
    config: &GameConfig,
    now: DateTime<Utc>,
) -> Result<u32, GameError> {
    let npc_account = AccountId::from(config.npc.account_id);
    let existing = villages::list_for_account_locked(conn, npc_account).await?;
    if !existing.is_empty() {
        info!(existing = existing.len(), "NPC villages already seeded, skipping");
        return Ok(0);
    }

    let mut rng = StdRng::seed_from_u64(config.npc.seed);
    let mut seeded = 0_u32;
    for number in 1..=config.npc.village_count {
        let village = roll_camp(&mut rng, config, npc_account, number, now);
        villages::insert(conn, &village).await?;
        seeded = seeded.saturating_add(1);
    }

    info!(seeded, "NPC villages created");
    Ok(seeded)
}

/// Roll one barbarian camp from the seeding RNG.
fn roll_camp(
    rng: &mut StdRng,
    config: &GameConfig,
    npc_account: AccountId,
    number: u32,
    now: DateTime<Utc>,
) -> Village {
    let position = Position::new(
        rng.random_range(0..config.world.width.max(1)),
        rng.random_range(0..config.world.height.max(1)),
    );
    // Guard against degenerate config ranges.
    let spearmen_max = config
        .npc
        .spearmen_max
        .max(config.npc.spearmen_min.saturating_add(1));
    let spearmen = rng.random_range(config.npc.spearmen_min..spearmen_max);
    let swordsmen = rng.random_range(0..config.npc.swordsmen_max.max(1));

    Village {
        id: VillageId::new(),
        account_id: npc_account,
        name: format!("Barbarian Camp {number}"),
        position,
        wood: config.npc.starting_resources,
        clay: config.npc.starting_resources,
        iron: config.npc.starting_resources,
        main_building_level: 1,
        timber_camp_level: 1,
        clay_pit_level: 1,
        iron_mine_level: 1,
        warehouse_level: 1,
        spearmen,
        swordsmen,
        last_tick_at: now,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camps_are_reproducible_for_a_seed() {
        let config = GameConfig::default();
        let npc_account = AccountId::from(config.npc.account_id);
        let now = Utc::now();

        let mut first_rng = StdRng::seed_from_u64(config.npc.seed);
        let mut second_rng = StdRng::seed_from_u64(config.npc.seed);
        for number in 1..=config.npc.village_count {
            let a = roll_camp(&mut first_rng, &config, npc_account, number, now);
            let b = roll_camp(&mut second_rng, &config, npc_account, number, now);
            assert_eq!(a.position, b.position);
            assert_eq!(a.spearmen, b.spearmen);
            assert_eq!(a.swordsmen, b.swordsmen);
        }
    }

    #[test]
    fn camp_rolls_stay_inside_configured_bounds() {
        let config = GameConfig::default();
        let npc_account = AccountId::from(config.npc.account_id);
        let now = Utc::now();

        let mut rng = StdRng::seed_from_u64(config.npc.seed);
        for number in 1..=config.npc.village_count {
            let camp = roll_camp(&mut rng, &config, npc_account, number, now);
            assert!((0..config.world.width).contains(&camp.position.x));
            assert!((0..config.world.height).contains(&camp.position.y));
            assert!(camp.spearmen >= config.npc.spearmen_min);
            assert!(camp.spearmen < config.npc.spearmen_max);
            assert!(camp.swordsmen < config.npc.swordsmen_max);
            assert_eq!(camp.wood, 700);
        }
    }
}
