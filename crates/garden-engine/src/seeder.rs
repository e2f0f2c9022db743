//! World seeding for a fresh garden.
//!
//! A fresh store has no baseline state, and a tick cannot run without one.
//! Seeding commits tick 0: a starting environment under clear skies, the
//! configured founder population scattered across the rectangle, a BIRTH
//! event per founder, and the high-water mark at 0.

use chrono::Utc;
use garden_core::GardenConfig;
use garden_db::GardenStore;
use garden_entities::spawn;
use garden_types::entity::Entity;
use garden_types::enums::{EntityKind, EventKind, Severity};
use garden_types::events::EventBuffer;
use garden_types::environment::Environment;
use garden_types::ids::GardenStateId;
use garden_types::population::PopulationSummary;
use garden_types::random::{self, RandomSource};
use garden_types::state::GardenState;
use garden_world::weather;
use tracing::info;

use crate::error::EngineError;

/// Seed an empty store with the configured founder population.
///
/// Returns the committed tick-0 state.
pub async fn seed_garden(
    store: &dyn GardenStore,
    config: &GardenConfig,
    rng: &mut dyn RandomSource,
) -> Result<GardenState, EngineError> {
    let bounds = config.world.bounds();
    let state_id = GardenStateId::new();
    let mut events = EventBuffer::new(0, state_id);

    let phase = weather::enter_state(garden_types::enums::WeatherKind::Clear, None, 0, rng);
    let environment = Environment {
        tick: 0,
        temperature: config.climate.temperature_diurnal_baseline,
        sunlight: garden_world::sunlight_for_tick(0, config.climate.ticks_per_day),
        moisture: 0.5,
        weather: Some(phase),
    };

    let counts = [
        (EntityKind::Plant, config.seeding.plants),
        (EntityKind::Herbivore, config.seeding.herbivores),
        (EntityKind::Carnivore, config.seeding.carnivores),
        (EntityKind::Fungus, config.seeding.fungi),
    ];

    let mut founders: Vec<Entity> = Vec::new();
    let mut summary = PopulationSummary::default();
    for (kind, count) in counts {
        for _ in 0..count {
            let position = random::random_position(rng, bounds);
            let entity = spawn::seed_entity(kind, position, 0, state_id, rng);
            events.push(
                EventKind::Birth,
                Severity::Low,
                format!("{} was planted at the founding of the garden.", entity.name),
                vec![entity.id],
                &["biology"],
                serde_json::json!({ "lineage": "origin" }),
            );
            summary.living.bump(kind);
            founders.push(entity);
        }
    }

    events.push(
        EventKind::Ambient,
        Severity::Low,
        format!(
            "The garden awakens: {} residents under clear skies.",
            founders.len()
        ),
        Vec::new(),
        &["atmosphere", "milestone"],
        serde_json::json!({ "founders": founders.len() }),
    );

    let state = GardenState {
        id: state_id,
        tick: 0,
        timestamp: Utc::now(),
        environment,
        population: summary,
    };

    store.save_garden_state(&state).await.map_err(EngineError::Store)?;
    store.save_entities(&founders).await.map_err(EngineError::Store)?;
    store.delete_events_by_tick(0).await.map_err(EngineError::Store)?;
    store.save_events(events.events()).await.map_err(EngineError::Store)?;
    store.set_last_completed_tick(0).await.map_err(EngineError::Store)?;

    info!(
        founders = founders.len(),
        plants = config.seeding.plants,
        herbivores = config.seeding.herbivores,
        carnivores = config.seeding.carnivores,
        fungi = config.seeding.fungi,
        "garden seeded at tick 0"
    );
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_db::MemoryStore;
    use garden_types::random::SeededSource;

    use super::*;

    #[tokio::test]
    async fn seeding_commits_a_baseline() {
        let store = MemoryStore::new();
        let config = GardenConfig::default();
        let mut rng = SeededSource::from_seed(2026);

        let state = seed_garden(&store, &config, &mut rng).await.unwrap();
        assert_eq!(state.tick, 0);
        assert_eq!(store.last_completed_tick().await.unwrap(), 0);

        let loaded = store.garden_state_by_tick(0).await.unwrap().unwrap();
        assert_eq!(loaded.population.total_living(), 12 + 6 + 2 + 3);

        let living = store.living_entities().await.unwrap();
        assert_eq!(living.len(), 23);
        let bounds = config.world.bounds();
        for entity in &living {
            assert!(bounds.contains(entity.position));
            assert_eq!(entity.born_at_tick, 0);
        }

        // Tick 0 sits at the bottom of the sunlight curve.
        assert!(state.environment.sunlight.abs() < 1e-9);

        let events = store.events_by_tick(0).await;
        let births = events.iter().filter(|e| e.kind == EventKind::Birth).count();
        assert_eq!(births, 23);
        assert!(events.iter().any(|e| e.kind == EventKind::Ambient));
    }
}
