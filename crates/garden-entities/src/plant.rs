//! The plant behavior pass.
//!
//! Plants are rooted converters: sunlight in, biomass out. Per tick each
//! living plant photosynthesizes (scaled by its own rate, the moisture
//! tent, and the weather), pays base metabolism, regenerates a sliver of
//! health when well-fed, and rolls for reproduction.

use garden_types::entity::Entity;
use garden_types::enums::EntityKind;
use garden_types::events::EventBuffer;
use garden_types::random::RandomSource;

use crate::exposure;
use crate::pass::{self, BehaviorContext, PassOutcome};

/// Run the plant pass over the living set.
pub fn run_plant_pass(
    entities: &mut [Entity],
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
    events: &mut EventBuffer,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for entity in entities.iter_mut() {
        if !entity.is_alive || entity.kind() != EntityKind::Plant {
            continue;
        }
        let Some(traits) = entity.traits.as_plant().copied() else {
            continue;
        };

        let gain = ctx.config.base_photosynthesis_rate
            * ctx.environment.sunlight
            * traits.photosynthesis_rate
            * exposure::moisture_growth_multiplier(ctx.environment.moisture)
            * ctx.modifiers.photosynthesis_modifier;
        entity.gain_energy(gain);

        pass::charge_metabolism(entity, ctx, false, false);

        if entity.energy > ctx.config.plant_health_regen_threshold {
            entity.health =
                (entity.health + ctx.config.plant_health_regen_amount).min(100.0);
        }

        if let Some(child) = pass::try_reproduce(entity, true, ctx, rng, events) {
            outcome.offspring.push(child);
        }
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_types::environment::{Environment, WeatherModifiers};
    use garden_types::enums::EventKind;
    use garden_types::geometry::{GardenBounds, Position};
    use garden_types::ids::GardenStateId;
    use garden_types::random::{ScriptedSource, SeededSource};

    use super::*;
    use crate::config::KernelConfig;
    use crate::spawn;

    fn env(sunlight: f64, moisture: f64) -> Environment {
        Environment {
            tick: 24,
            temperature: 20.0,
            sunlight,
            moisture,
            weather: None,
        }
    }

    fn ctx<'a>(environment: &'a Environment, config: &'a KernelConfig) -> BehaviorContext<'a> {
        BehaviorContext {
            tick: 24,
            garden_state_id: GardenStateId::new(),
            environment,
            modifiers: WeatherModifiers::NEUTRAL,
            bounds: GardenBounds::default(),
            config,
        }
    }

    fn plant_at(x: f64, y: f64, energy: f64, ctx: &BehaviorContext<'_>) -> Entity {
        let mut rng = SeededSource::from_seed(1);
        let mut e = spawn::seed_entity(
            EntityKind::Plant,
            Position::new(x, y),
            0,
            ctx.garden_state_id,
            &mut rng,
        );
        e.energy = energy;
        e
    }

    #[test]
    fn midday_sun_raises_energy() {
        let cfg = KernelConfig::default();
        let environment = env(0.5, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        // No reproduction roll fires (draw 0.99 > rate).
        let mut rng = ScriptedSource::constant(0.99);
        let mut entities = vec![plant_at(100.0, 100.0, 50.0, &context)];

        let outcome = run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        // gain = 4.0 * 0.5 * 1.0 * 1.5 * 1.0 = 3.0; cost = 0.5.
        assert!((entities[0].energy - 52.5).abs() < 1e-9);
        assert!(outcome.offspring.is_empty());
    }

    #[test]
    fn darkness_drains_energy() {
        let cfg = KernelConfig::default();
        let environment = env(0.0, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);
        let mut entities = vec![plant_at(100.0, 100.0, 50.0, &context)];

        run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        assert!((entities[0].energy - 49.5).abs() < 1e-9);
    }

    #[test]
    fn well_fed_plant_regenerates_health() {
        let cfg = KernelConfig::default();
        let environment = env(0.5, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);
        let mut entities = vec![plant_at(100.0, 100.0, 90.0, &context)];
        entities[0].health = 80.0;

        run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        assert!((entities[0].health - 80.5).abs() < 1e-9);
    }

    #[test]
    fn reproduction_spawns_a_seedling_and_events() {
        let cfg = KernelConfig::default();
        let environment = env(0.5, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        // First draw: reproduction roll 0.0 always passes. The rest drive
        // placement, mutation misses, and naming.
        let mut rng = ScriptedSource::new(&[0.0], 0.99);
        let mut entities = vec![plant_at(400.0, 300.0, 95.0, &context)];
        let before = entities[0].energy;

        let outcome = run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        assert_eq!(outcome.offspring.len(), 1);
        let child = &outcome.offspring[0];
        assert_eq!(child.kind(), EntityKind::Plant);
        assert!(
            entities[0].position.distance_to(child.position) <= cfg.seed_spread_radius + 1e-9
        );
        // Parent paid the cost on top of the photosynthesis delta.
        assert!(entities[0].energy < before);
        assert!(events.contains_kind(EventKind::Reproduction));
        assert!(events.contains_kind(EventKind::Birth));
    }

    #[test]
    fn below_threshold_no_roll_is_consumed() {
        let cfg = KernelConfig::default();
        let environment = env(0.0, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        // If a roll were consumed it would pass (0.0) and spawn; the energy
        // gate must keep the queue untouched.
        let mut rng = ScriptedSource::new(&[0.0], 0.99);
        let mut entities = vec![plant_at(100.0, 100.0, 20.0, &context)];

        let outcome = run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        assert!(outcome.offspring.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn dead_plants_are_skipped() {
        let cfg = KernelConfig::default();
        let environment = env(0.5, 0.5);
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);
        let mut entities = vec![plant_at(100.0, 100.0, 50.0, &context)];
        entities[0].is_alive = false;
        let before = entities[0].energy;

        run_plant_pass(&mut entities, &context, &mut rng, &mut events);
        assert!((entities[0].energy - before).abs() < f64::EPSILON);
    }
}
