//! Engine binary for the Chaos Garden simulation.
//!
//! Wires the tick orchestrator to `PostgreSQL` and runs it on a schedule.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `garden-config.yaml` (`GARDEN_CONFIG`
//!    overrides the path, `DATABASE_URL` the connection string)
//! 3. Connect the `PostgreSQL` pool and bootstrap the schema
//! 4. Seed the garden if no committed state exists yet
//! 5. Run the tick loop until `max_ticks` or ctrl-c

mod error;
mod seeder;

use std::path::PathBuf;
use std::time::Duration;

use garden_core::{GardenConfig, run_simulation_tick};
use garden_core::tick::TickError;
use garden_db::{GardenStore, PgStore, PostgresConfig};
use garden_types::random::{RandomSource, SeededSource};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point for the garden engine.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Structured logging; RUST_LOG wins over the config default.
    let config = load_config();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "garden-engine starting"
    );

    // 2. Randomness: seeded for replays, entropy otherwise.
    let mut rng: Box<dyn RandomSource> = match config.world.seed {
        Some(seed) => Box::new(SeededSource::from_seed(seed)),
        None => Box::new(SeededSource::from_entropy()),
    };

    // 3. Store.
    let store = PgStore::connect(&PostgresConfig::new(&config.infrastructure.postgres_url))
        .await?;
    store.ensure_schema().await?;
    info!("PostgreSQL connected, schema ready");

    // 4. Seed a fresh garden.
    if store.latest_garden_state().await?.is_none() {
        info!("no committed state found; seeding a fresh garden");
        seeder::seed_garden(&store, &config, rng.as_mut()).await?;
    }

    // 5. The loop.
    run_loop(&store, &config, rng.as_mut()).await;

    info!("garden-engine stopped");
    Ok(())
}

/// Fire ticks on the configured interval until a bound or ctrl-c.
async fn run_loop(store: &PgStore, config: &GardenConfig, rng: &mut dyn RandomSource) {
    let mut interval =
        tokio::time::interval(Duration::from_millis(config.world.tick_interval_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut committed: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match run_simulation_tick(store, config, rng).await {
                    Ok(outcome) => {
                        if outcome.executed {
                            committed += 1;
                        } else {
                            info!(
                                tick = outcome.tick,
                                skip_reason = ?outcome.skip_reason,
                                "tick attempt skipped"
                            );
                        }
                        if config.world.max_ticks > 0 && committed >= config.world.max_ticks {
                            info!(committed, "max_ticks reached, shutting down");
                            return;
                        }
                    }
                    Err(TickError::MissingBaseline { tick }) => {
                        // Recoverable per the failure contract: reseed.
                        warn!(tick, "baseline state missing; reseeding the garden");
                        if let Err(err) = seeder::seed_garden(store, config, rng).await {
                            error!(error = %err, "reseeding failed, shutting down");
                            return;
                        }
                    }
                    Err(err) => {
                        // The tick rolled back; the next interval retries
                        // against unchanged state.
                        error!(error = %err, "tick failed and was rolled back");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, shutting down");
                return;
            }
        }
    }
}

/// Load configuration from `GARDEN_CONFIG` or `./garden-config.yaml`,
/// falling back to defaults when no file exists.
fn load_config() -> GardenConfig {
    let path = std::env::var("GARDEN_CONFIG")
        .map_or_else(|_| PathBuf::from("garden-config.yaml"), PathBuf::from);
    if path.exists() {
        match GardenConfig::from_file(&path) {
            Ok(config) => return config,
            Err(err) => {
                eprintln!("failed to load {}: {err}; using defaults", path.display());
            }
        }
    }
    let mut config = GardenConfig::default();
    config.infrastructure.apply_env_overrides();
    config
}
