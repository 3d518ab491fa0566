//! World setup binary for Palisade.
//!
//! Runs the one-time administrative steps that must never happen in the
//! request path: applying migrations, generating and persisting the world
//! map, and seeding the NPC ("abandoned") villages. Safe to re-run -- every
//! step is idempotent.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `palisade-config.yaml`
//! 3. Connect to `PostgreSQL` and apply migrations
//! 4. Generate and persist the world tiles (no-op if any exist)
//! 5. Seed the NPC villages (no-op if the NPC account owns any)

mod seed;

use std::path::Path;

use chrono::Utc;
use palisade_core::catchup;
use palisade_core::config::GameConfig;
use palisade_db::{DbError, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "palisade-config.yaml";

/// Application entry point for world setup.
///
/// # Errors
///
/// Returns an error if configuration loading, the database connection, or
/// any seeding step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("palisade-admin starting");

    // 2. Load configuration.
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_owned());
    let config = load_config(Path::new(&config_path))?;
    info!(
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        npc_villages = config.npc.village_count,
        "Configuration loaded"
    );

    // 3. Connect and migrate.
    let pool = PostgresPool::connect_url(&config.infrastructure.database_url).await?;
    pool.run_migrations().await?;

    // 4 + 5. Seed the world inside one transaction.
    let now = Utc::now();
    let mut tx = pool.inner().begin().await.map_err(DbError::from)?;
    catchup::ensure_world_tiles(&mut tx, &config).await?;
    let seeded = seed::seed_npc_villages(&mut tx, &config, now).await?;
    tx.commit().await.map_err(DbError::from)?;

    info!(npc_villages_seeded = seeded, "world setup complete");
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<GameConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(GameConfig::from_file(path)?)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        // Parsing the empty document still applies environment overrides.
        Ok(GameConfig::parse("{}")?)
    }
}
