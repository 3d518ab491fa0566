//! The game service: one public operation per caller-facing verb.
//!
//! Every operation opens one transaction, runs the catch-up pass for the
//! caller, applies its own mutation, and commits. Nothing survives in
//! process memory between calls; two service instances against the same
//! database behave as one.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use palisade_db::{DbError, PostgresPool, movements, queue, villages};
use palisade_economy::{construction, production};
use palisade_military::{movement as travel, plunder, recruit};
use palisade_types::{
    AccountId, BuildingQueueItem, BuildingType, Mission, MovementId, MovementStatus, QueueItemId,
    Resources, TroopMovement, UnitType, Village, VillageId, WorldShell,
};
use palisade_world::assign_starting_location;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::catchup;
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::shell;

/// Starting stock of each resource in a player's first village.
const STARTING_RESOURCES: i32 = 500;

/// Longest accepted village name.
const MAX_VILLAGE_NAME_LEN: usize = 128;

/// Outcome of a farm run: how far down the target list it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmRunOutcome {
    /// Attacks actually dispatched.
    pub launched: u32,
    /// Distinct existing targets in the run, whether reached or not.
    pub attempted: u32,
}

/// The game core's public surface.
#[derive(Debug, Clone)]
pub struct GameService {
    pool: PostgresPool,
    config: GameConfig,
    clock: Arc<dyn Clock>,
}

impl GameService {
    /// Create a service running on the wall clock.
    pub fn new(pool: PostgresPool, config: GameConfig) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    /// Create a service with an explicit clock (tests use [`FixedClock`]).
    ///
    /// [`FixedClock`]: crate::clock::FixedClock
    pub const fn with_clock(pool: PostgresPool, config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            config,
            clock,
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run the catch-up pass and assemble the viewer's shell payload.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Db`] if the store fails.
    #[instrument(skip(self), fields(%account))]
    pub async fn world_shell(
        &self,
        account: AccountId,
        chunk_x: i32,
        chunk_y: i32,
        chunk_size: i32,
    ) -> Result<WorldShell, GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;
        let payload =
            shell::assemble(&mut tx, &self.config, account, chunk_x, chunk_y, chunk_size, now)
                .await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(payload)
    }

    /// Create an account's starting village at a deterministic spawn
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] for an empty or oversized
    /// name and [`GameError::Db`] if the store fails.
    #[instrument(skip(self, name), fields(%account))]
    pub async fn create_starting_village(
        &self,
        account: AccountId,
        name: &str,
    ) -> Result<Village, GameError> {
        let name = name.trim();
        if name.is_empty() || name.len() > MAX_VILLAGE_NAME_LEN {
            return Err(GameError::InvalidArgument(format!(
                "village name must be 1..={MAX_VILLAGE_NAME_LEN} characters"
            )));
        }

        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::ensure_world_tiles(&mut tx, &self.config).await?;

        let existing = villages::all_positions(&mut tx).await?;
        let position = assign_starting_location(
            &existing,
            self.config.world.seed,
            self.config.world.width,
            self.config.world.height,
            self.config.world.min_spawn_distance,
        );

        let village = Village {
            id: VillageId::new(),
            account_id: account,
            name: name.to_owned(),
            position,
            wood: STARTING_RESOURCES,
            clay: STARTING_RESOURCES,
            iron: STARTING_RESOURCES,
            main_building_level: 1,
            timber_camp_level: 1,
            clay_pit_level: 1,
            iron_mine_level: 1,
            warehouse_level: 1,
            spearmen: 0,
            swordsmen: 0,
            last_tick_at: now,
            created_at: now,
        };
        villages::insert(&mut tx, &village).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(village_id = %village.id, x = position.x, y = position.y, "starting village created");
        Ok(village)
    }

    /// Upgrade a building immediately, paying its full cost now.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the caller does not own the
    /// village and [`GameError::InsufficientResources`] if it cannot pay.
    #[instrument(skip(self), fields(%account, %village_id))]
    pub async fn upgrade_building_now(
        &self,
        account: AccountId,
        village_id: VillageId,
        building: BuildingType,
    ) -> Result<Village, GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;

        let mut village = owned_village(&mut tx, village_id, account).await?;
        construction::try_upgrade(&mut village, building, now)?;
        villages::save_state(&mut tx, &village).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            building = building.as_str(),
            level = village.building_level(building),
            "building upgraded"
        );
        Ok(village)
    }

    /// Pay for a building upgrade now and schedule its completion.
    ///
    /// Completion time grows with the target level and with the number of
    /// items already pending on the village.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the caller does not own the
    /// village and [`GameError::InsufficientResources`] if it cannot pay.
    #[instrument(skip(self), fields(%account, %village_id))]
    pub async fn queue_building_upgrade(
        &self,
        account: AccountId,
        village_id: VillageId,
        building: BuildingType,
    ) -> Result<BuildingQueueItem, GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;

        let mut village = owned_village(&mut tx, village_id, account).await?;
        let depth = queue::pending_count(&mut tx, village_id).await?;
        let completes_at = construction::try_queue_upgrade(&mut village, building, now, depth)?;

        let item = BuildingQueueItem {
            id: QueueItemId::new(),
            village_id,
            building_type: building,
            created_at: now,
            completes_at,
            completed_at: None,
        };
        queue::insert(&mut tx, &item).await?;
        villages::save_state(&mut tx, &village).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            building = building.as_str(),
            depth,
            completes_at = %completes_at,
            "upgrade queued"
        );
        Ok(item)
    }

    /// Recruit units into a village's garrison.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] for non-positive counts,
    /// [`GameError::NotFound`] if the caller does not own the village, and
    /// [`GameError::InsufficientResources`] if it cannot pay.
    #[instrument(skip(self), fields(%account, %village_id))]
    pub async fn recruit_units(
        &self,
        account: AccountId,
        village_id: VillageId,
        unit: UnitType,
        count: i32,
    ) -> Result<Village, GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;

        let mut village = owned_village(&mut tx, village_id, account).await?;
        recruit::try_recruit(&mut village, unit, count)?;
        villages::save_state(&mut tx, &village).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(unit = unit.as_str(), count, "units recruited");
        Ok(village)
    }

    /// Dispatch an attack from one of the caller's villages.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] for self-attacks or
    /// non-positive counts, [`GameError::NotFound`] for an unowned source
    /// or missing target, and [`GameError::InsufficientTroops`] when the
    /// garrison is short.
    #[instrument(skip(self), fields(%account, %source_village_id, %target_village_id))]
    pub async fn launch_attack(
        &self,
        account: AccountId,
        source_village_id: VillageId,
        target_village_id: VillageId,
        unit: UnitType,
        count: i32,
    ) -> Result<TroopMovement, GameError> {
        if source_village_id == target_village_id {
            return Err(GameError::InvalidArgument(
                "a village cannot attack itself".to_owned(),
            ));
        }

        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;

        let mut source = owned_village(&mut tx, source_village_id, account).await?;
        let Some(target) = villages::get(&mut tx, target_village_id).await? else {
            return Err(GameError::NotFound {
                entity: "target village",
            });
        };

        let movement = dispatch_attack(&mut tx, &mut source, &target, unit, count, now).await?;
        villages::save_state(&mut tx, &source).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            movement_id = %movement.id,
            unit = unit.as_str(),
            count,
            arrives_at = %movement.arrives_at,
            "attack launched"
        );
        Ok(movement)
    }

    /// Cancel an outbound attack before it arrives, returning its troops
    /// home instantly.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] for an unknown movement,
    /// [`GameError::Ownership`] if the caller does not own the source,
    /// [`GameError::InvalidArgument`] for non-attack missions, and
    /// [`GameError::Stale`] once the movement has already resolved.
    #[instrument(skip(self), fields(%account, %movement_id))]
    pub async fn cancel_movement(
        &self,
        account: AccountId,
        movement_id: MovementId,
    ) -> Result<(), GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        // The catch-up pass may resolve a due movement first; cancellation
        // then correctly fails as stale.
        catchup::run(&mut tx, &self.config, account, now).await?;

        let Some(movement) = movements::get(&mut tx, movement_id).await? else {
            return Err(GameError::NotFound { entity: "movement" });
        };
        let Some(mut source) = villages::get_locked(&mut tx, movement.source_village_id).await?
        else {
            return Err(GameError::NotFound {
                entity: "source village",
            });
        };
        if source.account_id != account {
            return Err(GameError::Ownership);
        }
        if movement.mission != Mission::Attack {
            return Err(GameError::InvalidArgument(
                "only attack movements can be canceled".to_owned(),
            ));
        }
        if movement.status != MovementStatus::Outbound
            || !movements::mark_canceled(&mut tx, movement_id, now).await?
        {
            return Err(GameError::Stale);
        }

        production::tick(&mut source, now);
        // No loot was collected; only the troops come home.
        plunder::apply_return_home(
            &mut source,
            movement.unit_type,
            movement.unit_count,
            Resources::ZERO,
        );
        villages::save_state(&mut tx, &source).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(units = movement.unit_count, "movement canceled, troops returned");
        Ok(())
    }

    /// Attack each target in order with the same army size, stopping at the
    /// first insufficiency.
    ///
    /// The target list is deduplicated and the source village excluded;
    /// `attempted` counts every remaining target that exists, including
    /// those never reached because the troops ran out, while `launched`
    /// counts only the dispatched waves.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the caller does not own the
    /// source village and [`GameError::InvalidArgument`] for non-positive
    /// counts or a target list with no valid entries.
    #[instrument(skip(self, target_village_ids), fields(%account, %source_village_id))]
    pub async fn launch_farm_run(
        &self,
        account: AccountId,
        source_village_id: VillageId,
        unit: UnitType,
        count: i32,
        target_village_ids: &[VillageId],
    ) -> Result<FarmRunOutcome, GameError> {
        if count <= 0 {
            return Err(GameError::InvalidArgument(format!(
                "unit count must be positive, got {count}"
            )));
        }

        let now = self.clock.now();
        let mut tx = self.pool.inner().begin().await.map_err(DbError::from)?;
        catchup::run(&mut tx, &self.config, account, now).await?;

        let mut source = owned_village(&mut tx, source_village_id, account).await?;

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for &target_id in target_village_ids {
            if target_id == source_village_id || !seen.insert(target_id) {
                continue;
            }
            if let Some(target) = villages::get(&mut tx, target_id).await? {
                targets.push(target);
            }
        }
        if targets.is_empty() {
            return Err(GameError::InvalidArgument(
                "no valid farm targets".to_owned(),
            ));
        }

        let mut outcome = FarmRunOutcome {
            launched: 0,
            attempted: u32::try_from(targets.len()).unwrap_or(u32::MAX),
        };
        for target in &targets {
            match dispatch_attack(&mut tx, &mut source, target, unit, count, now).await {
                Ok(_) => outcome.launched = outcome.launched.saturating_add(1),
                Err(GameError::InsufficientTroops { .. }) => break,
                Err(other) => return Err(other),
            }
        }

        villages::save_state(&mut tx, &source).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            launched = outcome.launched,
            attempted = outcome.attempted,
            "farm run finished"
        );
        Ok(outcome)
    }
}

/// Fetch a village locked for update, mapping absence (or foreign
/// ownership) to [`GameError::NotFound`].
async fn owned_village(
    conn: &mut PgConnection,
    village_id: VillageId,
    account: AccountId,
) -> Result<Village, GameError> {
    villages::get_owned_locked(conn, village_id, account)
        .await?
        .ok_or(GameError::NotFound { entity: "village" })
}

/// Withdraw troops from `source` and insert the outbound attack movement.
/// The caller persists `source` afterwards.
async fn dispatch_attack(
    conn: &mut PgConnection,
    source: &mut Village,
    target: &Village,
    unit: UnitType,
    count: i32,
    now: DateTime<Utc>,
) -> Result<TroopMovement, GameError> {
    recruit::try_dispatch(source, unit, count)?;
    let movement = TroopMovement {
        id: MovementId::new(),
        source_village_id: source.id,
        target_village_id: target.id,
        unit_type: unit,
        unit_count: count,
        mission: Mission::Attack,
        status: MovementStatus::Outbound,
        loot: Resources::ZERO,
        departed_at: now,
        arrives_at: travel::arrival_time(now, source.position, target.position, unit),
        resolved_at: None,
    };
    movements::insert(conn, &movement).await?;
    Ok(movement)
}
