//! The tick orchestrator: the only mutator of the garden.
//!
//! One call to [`run_simulation_tick`] advances the world by exactly one
//! tick, or skips with a reason. The shape per attempt:
//!
//! 1. Read the high-water mark and take the single-writer lock (skip with
//!    `lock_unavailable` if another writer holds it).
//! 2. Re-check the mark after acquiring -- a racer may have committed the
//!    requested tick already (`already_processed`).
//! 3. Load the baseline state, advance environment and weather, load the
//!    living and decomposable sets, age and weather every living entity.
//! 4. Roll the wild-spore chance, then run the behavior passes in the
//!    fixed order plants, herbivores, carnivores, fungi.
//! 5. Collect deaths, take the census, emit population and ambient
//!    events.
//! 6. Commit: state, entity rows, dead markers, delete-then-flush the
//!    tick's events, and advance the high-water mark last.
//!
//! Any error between lock and commit aborts the tick with nothing
//! written; the lock is released on every path (its TTL is the fallback
//! for a crashed writer).

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use garden_db::{GardenStore, StoreError};
use garden_entities::death::{self, DeathCause};
use garden_entities::exposure;
use garden_entities::pass::{BehaviorContext, KillRecord, PassOutcome};
use garden_entities::{carnivore, fungus, herbivore, plant, spawn};
use garden_types::entity::Entity;
use garden_types::enums::{EventKind, Severity, SkipReason};
use garden_types::events::EventBuffer;
use garden_types::geometry::GardenBounds;
use garden_types::ids::{EntityId, GardenStateId};
use garden_types::population::{KindCounts, PopulationSummary};
use garden_types::random::{self, RandomSource};
use garden_types::state::{GardenState, TickOutcome};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ambient::{self, AmbientContext};
use crate::config::GardenConfig;
use crate::population;

/// Errors that can abort a tick attempt.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A persistence operation failed; the tick rolled back.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The baseline state for the high-water mark is missing. The world
    /// must be reseeded before ticking can resume.
    #[error("no committed state found for tick {tick}; the garden must be reseeded")]
    MissingBaseline {
        /// The tick whose state was expected.
        tick: u64,
    },

    /// The tick counter cannot advance any further.
    #[error("tick counter overflow")]
    TickOverflow,

    /// A mandatory bound was violated; committing would corrupt the world.
    #[error("invariant violation: {context}")]
    InvariantViolation {
        /// Which entity and bound went wrong.
        context: String,
    },
}

/// Advance the garden by one tick, or skip with a reason.
///
/// This is the whole write path: the scheduled runner calls it on an
/// interval, and nothing else mutates the store. The injected `rng` is the
/// single randomness source for the tick.
pub async fn run_simulation_tick(
    store: &dyn GardenStore,
    config: &GardenConfig,
    rng: &mut dyn RandomSource,
) -> Result<TickOutcome, TickError> {
    let started = Instant::now();
    let last = store.last_completed_tick().await?;
    let owner = Uuid::new_v4().to_string();

    if !store
        .try_acquire_lock(&owner, Utc::now(), config.world.simulation_lock_ttl_ms)
        .await?
    {
        info!(last_completed_tick = last, "tick skipped: lock unavailable");
        let populations = summary_at(store, last).await?;
        return Ok(TickOutcome::skipped(
            last,
            elapsed_ms(started),
            populations,
            SkipReason::LockUnavailable,
        ));
    }

    let result = execute_locked(store, config, rng, last, started).await;

    if let Err(release_err) = store.release_lock(&owner).await {
        warn!(error = %release_err, "failed to release simulation lock; TTL will reclaim it");
    }
    result
}

/// The lock-holding body of a tick attempt.
async fn execute_locked(
    store: &dyn GardenStore,
    config: &GardenConfig,
    rng: &mut dyn RandomSource,
    last_seen: u64,
    started: Instant,
) -> Result<TickOutcome, TickError> {
    // Re-check after acquiring: another writer may have won the race
    // between our first read and the lock.
    let last = store.last_completed_tick().await?;
    let tick = last_seen.checked_add(1).ok_or(TickError::TickOverflow)?;
    if last >= tick {
        info!(tick, last_completed_tick = last, "tick skipped: already processed");
        let populations = summary_at(store, last).await?;
        return Ok(TickOutcome::skipped(
            last,
            elapsed_ms(started),
            populations,
            SkipReason::AlreadyProcessed,
        ));
    }

    let previous = store
        .garden_state_by_tick(last)
        .await?
        .ok_or(TickError::MissingBaseline { tick: last })?;

    let state_id = GardenStateId::new();
    let mut events = EventBuffer::new(tick, state_id);
    let bounds = config.world.bounds();

    // Environment first: the weather machine's draws precede everything.
    let (environment, shifts, weather_changed) =
        garden_world::advance_environment(&previous.environment, tick, &config.climate, rng);
    if weather_changed
        && let Some(phase) = environment.weather
    {
        events.push(
            EventKind::EnvironmentChange,
            Severity::Medium,
            format!("The weather turned: {} now rules the garden.", phase.current.display_name()),
            Vec::new(),
            &["atmosphere"],
            serde_json::json!({
                "weather": phase.current.as_db_str(),
                "previous": phase.previous.map(|w| w.as_db_str()),
            }),
        );
    }
    for shift in &shifts {
        events.push(
            EventKind::EnvironmentChange,
            Severity::High,
            shift.description(),
            Vec::new(),
            &["atmosphere", "chaos"],
            serde_json::json!({
                "temperature": environment.temperature,
                "moisture": environment.moisture,
            }),
        );
    }

    let mut living = store.living_entities().await?;
    let mut corpses = store.decomposable_dead_entities().await?;

    // Age once, wear once, before any behavior runs.
    for entity in &mut living {
        entity.age += 1;
        exposure::apply_exposure(entity, &environment, &config.kernel);
    }

    let mut births: u64 = 0;
    if random::chance(rng, config.kernel.wild_fungus_spawn_probability) {
        let sprout = spawn::wild_fungus(tick, state_id, bounds, rng);
        info!(tick, fungus = %sprout.id, "wild spore took root");
        events.push(
            EventKind::Birth,
            Severity::Low,
            format!("{} sprouted from a wild spore.", sprout.name),
            vec![sprout.id],
            &["biology", "chaos"],
            serde_json::json!({ "lineage": "wild" }),
        );
        births += 1;
        living.push(sprout);
    }

    let interp = config.climate.weather_transition_interpolation_ticks;
    let ctx = BehaviorContext {
        tick,
        garden_state_id: state_id,
        environment: &environment,
        modifiers: garden_world::effective_modifiers(environment.weather.as_ref(), interp),
        bounds,
        config: &config.kernel,
    };

    // The fixed pass order: plants grow before herbivores graze, grazers
    // thin before hunters strike, fungi feed only on last tick's dead.
    let mut passes = PassOutcome::default();
    passes.absorb(plant::run_plant_pass(&mut living, &ctx, rng, &mut events));
    passes.absorb(herbivore::run_herbivore_pass(&mut living, &ctx, rng, &mut events));
    passes.absorb(carnivore::run_carnivore_pass(&mut living, &ctx, rng, &mut events));
    let fungus_outcome =
        fungus::run_fungus_pass(&mut living, &mut corpses, &ctx, rng, &mut events);
    let decomposed = fungus_outcome.decomposed_entity_ids;
    passes.absorb(fungus_outcome.pass);

    let newborns = passes.offspring;
    births += newborns.len() as u64;
    let kill_causes: BTreeMap<EntityId, KillRecord> = passes
        .kills
        .iter()
        .map(|kill| (kill.victim, *kill))
        .collect();

    // Deaths: state-based checks for the still-standing, bookkeeping for
    // the already-killed. Pass kills carry their own events.
    let mut newly_dead = KindCounts::ZERO;
    let mut dead_ids = Vec::new();
    for entity in &mut living {
        if entity.is_alive {
            let Some(cause) = death::check_death(entity, &config.kernel) else {
                continue;
            };
            death::finalize_death(entity, tick);
            events.push(
                EventKind::Death,
                Severity::Medium,
                death_line(&entity.name, cause),
                vec![entity.id],
                &["biology"],
                serde_json::json!({ "cause": cause.to_string(), "age": entity.age }),
            );
            newly_dead.bump(entity.kind());
            dead_ids.push(entity.id);
        } else {
            let cause = kill_causes
                .get(&entity.id)
                .map_or(DeathCause::Unknown, |kill| kill.cause);
            debug!(tick, entity = %entity.id, %cause, "killed during pass");
            newly_dead.bump(entity.kind());
            dead_ids.push(entity.id);
        }
    }

    let summary = population::summarize(
        &living,
        &newborns,
        &corpses,
        &previous.population,
        &newly_dead,
    );
    population::emit_population_events(&previous.population, &summary, &mut events);

    let spotlight = {
        let lit: Vec<&Entity> = living
            .iter()
            .chain(newborns.iter())
            .filter(|e| e.is_alive)
            .collect();
        random::pick(rng, &lit).map(|e| (e.name.clone(), e.species.clone()))
    };
    ambient::emit_ambient(
        &AmbientContext {
            tick,
            time: garden_world::time_of_day(tick, config.climate.ticks_per_day),
            environment: &environment,
            summary: &summary,
            spotlight,
        },
        rng,
        &mut events,
    );

    // Everything below is the commit. Stamp first, validate, then write in
    // the fixed order with the high-water mark last.
    let now = Utc::now();
    let mut rows = living;
    rows.extend(newborns);
    rows.extend(corpses);
    for row in &mut rows {
        row.garden_state_id = state_id;
        row.updated_at = now;
    }
    validate_rows(&rows, bounds)?;

    let state = GardenState {
        id: state_id,
        tick,
        timestamp: now,
        environment,
        population: summary,
    };

    store.save_garden_state(&state).await?;
    store.save_entities(&rows).await?;
    store.mark_entities_dead(&dead_ids, tick).await?;
    store.delete_events_by_tick(tick).await?;
    store.save_events(events.events()).await?;
    store.set_last_completed_tick(tick).await?;

    let deaths = dead_ids.len() as u64;
    info!(
        tick,
        duration_ms = elapsed_ms(started),
        births,
        deaths,
        decomposed = decomposed.len(),
        total_living = summary.total_living(),
        events = events.len(),
        "tick committed"
    );

    Ok(TickOutcome {
        executed: true,
        tick,
        duration_ms: elapsed_ms(started),
        new_entities: births,
        deaths,
        populations: summary,
        skip_reason: None,
    })
}

/// The committed census at a tick, or an empty one if the state is gone.
async fn summary_at(
    store: &dyn GardenStore,
    tick: u64,
) -> Result<PopulationSummary, StoreError> {
    Ok(store
        .garden_state_by_tick(tick)
        .await?
        .map(|state| state.population)
        .unwrap_or_default())
}

/// Renderer-independent one-liner for a state-based death.
fn death_line(name: &str, cause: DeathCause) -> String {
    match cause {
        DeathCause::Starvation => format!("{name} starved."),
        DeathCause::OldAge => format!("{name} died of old age."),
        DeathCause::FailingHealth => format!("{name} wasted away, health spent."),
        DeathCause::Predation => format!("{name} was taken by a predator."),
        DeathCause::Decomposed => format!("{name} returned fully to the soil."),
        DeathCause::Unknown => format!("{name} died."),
    }
}

/// The mandatory bounds, checked on every row about to be persisted.
fn validate_rows(rows: &[Entity], bounds: GardenBounds) -> Result<(), TickError> {
    for entity in rows {
        if !(0.0..=100.0).contains(&entity.energy) {
            return Err(TickError::InvariantViolation {
                context: format!("entity {} energy {} out of range", entity.id, entity.energy),
            });
        }
        if !(0.0..=100.0).contains(&entity.health) {
            return Err(TickError::InvariantViolation {
                context: format!("entity {} health {} out of range", entity.id, entity.health),
            });
        }
        if !bounds.contains(entity.position) {
            return Err(TickError::InvariantViolation {
                context: format!(
                    "entity {} position ({}, {}) outside the garden",
                    entity.id, entity.position.x, entity.position.y
                ),
            });
        }
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
