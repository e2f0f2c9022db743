//! The carnivore behavior pass.
//!
//! Hunters with the same movement shape as herbivores but pointed the
//! other way down the food chain. A carnivore locks onto the nearest
//! living herbivore inside its perception radius, closes, and kills on
//! contact, taking a capped share of the prey's energy. Other carnivores
//! stalking the same prey inside the coordination radius are observed and
//! reported on the kill.

use garden_types::entity::Entity;
use garden_types::enums::{EntityKind, EventKind, Severity};
use garden_types::events::EventBuffer;
use garden_types::ids::EntityId;
use garden_types::random::{self, RandomSource};
use tracing::debug;

use crate::death::DeathCause;
use crate::pass::{self, BehaviorContext, KillRecord, PassOutcome};

/// What one carnivore decided to do this tick.
enum Action {
    /// Kill the herbivore at this index in the living set.
    Hunt(usize),
    /// Close in on the herbivore at this index, pouncing on arrival.
    Stalk(usize),
    /// Wander toward a sampled point, paying the aimless surcharge.
    Explore(garden_types::geometry::Position),
}

/// Run the carnivore pass over the living set.
pub fn run_carnivore_pass(
    entities: &mut [Entity],
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
    events: &mut EventBuffer,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for i in 0..entities.len() {
        if !entities[i].is_alive || entities[i].kind() != EntityKind::Carnivore {
            continue;
        }
        let Some(traits) = entities[i].traits.as_carnivore().copied() else {
            continue;
        };

        let action = match pass::nearest_living(
            entities,
            entities[i].position,
            EntityKind::Herbivore,
            entities[i].id,
            traits.perception_radius,
        ) {
            Some(prey_idx) => {
                let dist = entities[i].position.distance_to(entities[prey_idx].position);
                if dist <= ctx.config.eating_distance {
                    Action::Hunt(prey_idx)
                } else {
                    Action::Stalk(prey_idx)
                }
            }
            None => Action::Explore(random::position_near(
                rng,
                entities[i].position,
                ctx.config.exploration_range,
                ctx.bounds,
            )),
        };

        let mut aimless = false;
        match action {
            Action::Hunt(prey_idx) => {
                hunt(entities, i, prey_idx, ctx, events, &mut outcome);
            }
            Action::Stalk(prey_idx) => {
                let target = entities[prey_idx].position;
                pass::move_toward(&mut entities[i], target, traits.movement_speed, ctx);
                // A stalk that closes to contact is a pounce.
                if entities[prey_idx].is_alive
                    && entities[i].position.distance_to(target) <= ctx.config.eating_distance
                {
                    hunt(entities, i, prey_idx, ctx, events, &mut outcome);
                }
            }
            Action::Explore(target) => {
                aimless = true;
                pass::move_toward(&mut entities[i], target, traits.movement_speed, ctx);
            }
        }

        pass::charge_metabolism(&mut entities[i], ctx, true, aimless);

        if let Some(child) = pass::try_reproduce(&mut entities[i], false, ctx, rng, events) {
            outcome.offspring.push(child);
        }
    }

    outcome
}

/// Other living carnivores inside the coordination radius of `prey` whose
/// own nearest target is that same prey. Observable for pack dynamics;
/// today they only enrich the kill report.
pub fn find_competing_carnivores(
    entities: &[Entity],
    hunter: EntityId,
    prey_idx: usize,
    coordination_radius: f64,
) -> Vec<EntityId> {
    let prey = &entities[prey_idx];
    entities
        .iter()
        .filter(|e| e.is_alive && e.kind() == EntityKind::Carnivore && e.id != hunter)
        .filter(|e| e.position.distance_to(prey.position) <= coordination_radius)
        .filter(|e| {
            let reach = e
                .traits
                .as_carnivore()
                .map_or(0.0, |t| t.perception_radius);
            pass::nearest_living(entities, e.position, EntityKind::Herbivore, e.id, reach)
                .map(|idx| entities[idx].id)
                == Some(prey.id)
        })
        .map(|e| e.id)
        .collect()
}

/// Kill on contact: the hunter takes a capped share of the prey's energy,
/// the prey dies with nothing left behind.
fn hunt(
    entities: &mut [Entity],
    hunter_idx: usize,
    prey_idx: usize,
    ctx: &BehaviorContext<'_>,
    events: &mut EventBuffer,
    outcome: &mut PassOutcome,
) {
    let competitors =
        find_competing_carnivores(entities, entities[hunter_idx].id, prey_idx, ctx.config.coordination_radius);

    let prey_id = entities[prey_idx].id;
    let prey_name = entities[prey_idx].name.clone();
    let hunter_id = entities[hunter_idx].id;
    let hunter_name = entities[hunter_idx].name.clone();

    let share = ctx.config.energy_from_prey.min(entities[prey_idx].energy.max(0.0));
    entities[hunter_idx].gain_energy(share);

    let prey = &mut entities[prey_idx];
    prey.is_alive = false;
    prey.death_tick = Some(ctx.tick);
    prey.energy = 0.0;

    debug!(
        tick = ctx.tick,
        hunter = %hunter_id,
        prey = %prey_id,
        share,
        competitors = competitors.len(),
        "hunt succeeded"
    );

    outcome.kills.push(KillRecord {
        victim: prey_id,
        killer: hunter_id,
        cause: DeathCause::Predation,
    });
    events.push(
        EventKind::Death,
        Severity::Medium,
        format!("{prey_name} was hunted down by {hunter_name}."),
        vec![prey_id, hunter_id],
        &["interspecies", "tension"],
        serde_json::json!({
            "cause": "predation",
            "predator": hunter_id,
            "energy_taken": share,
            "competing_carnivores": competitors,
        }),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_types::environment::{Environment, WeatherModifiers};
    use garden_types::geometry::{GardenBounds, Position};
    use garden_types::ids::GardenStateId;
    use garden_types::random::{ScriptedSource, SeededSource};

    use super::*;
    use crate::config::KernelConfig;
    use crate::spawn;

    fn test_env() -> Environment {
        Environment {
            tick: 24,
            temperature: 20.0,
            sunlight: 0.5,
            moisture: 0.5,
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

    fn make(kind: EntityKind, x: f64, y: f64, ctx: &BehaviorContext<'_>) -> Entity {
        let mut rng = SeededSource::from_seed(23);
        spawn::seed_entity(kind, Position::new(x, y), 0, ctx.garden_state_id, &mut rng)
    }

    #[test]
    fn adjacent_prey_is_killed_and_drained() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Herbivore, 100.0, 100.0, &context),
            make(EntityKind::Carnivore, 104.0, 100.0, &context),
        ];
        entities[0].energy = 70.0;
        entities[1].energy = 40.0;

        let outcome = run_carnivore_pass(&mut entities, &context, &mut rng, &mut events);
        assert!(!entities[0].is_alive);
        assert!(entities[0].energy.abs() < f64::EPSILON);
        // Gained the 30-point cap, paid 0.5 base metabolism.
        assert!((entities[1].energy - 69.5).abs() < 1e-9);
        assert_eq!(outcome.kills.len(), 1);
        assert_eq!(outcome.kills[0].cause, DeathCause::Predation);

        let death = events
            .events()
            .iter()
            .find(|e| e.kind == EventKind::Death)
            .unwrap();
        assert!(death.description.contains("hunted"));
        assert_eq!(death.entities_affected[0], entities[0].id);
    }

    #[test]
    fn lean_prey_yields_only_its_energy() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Herbivore, 100.0, 100.0, &context),
            make(EntityKind::Carnivore, 104.0, 100.0, &context),
        ];
        entities[0].energy = 12.0;
        entities[1].energy = 40.0;

        run_carnivore_pass(&mut entities, &context, &mut rng, &mut events);
        assert!((entities[1].energy - 51.5).abs() < 1e-9);
    }

    #[test]
    fn distant_prey_is_stalked() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Herbivore, 200.0, 100.0, &context),
            make(EntityKind::Carnivore, 100.0, 100.0, &context),
        ];
        entities[1].energy = 40.0;

        run_carnivore_pass(&mut entities, &context, &mut rng, &mut events);
        // Closed 14 px at default speed; prey survives.
        assert!((entities[1].position.x - 114.0).abs() < 1e-9);
        assert!(entities[0].is_alive);
    }

    #[test]
    fn out_of_sight_prey_means_wandering() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = SeededSource::from_seed(31);

        let mut entities = vec![
            make(EntityKind::Herbivore, 700.0, 500.0, &context),
            make(EntityKind::Carnivore, 100.0, 100.0, &context),
        ];
        entities[1].energy = 40.0;

        run_carnivore_pass(&mut entities, &context, &mut rng, &mut events);
        // Paid the aimless surcharge on top of base metabolism.
        assert!(entities[1].energy < 40.0 - 0.75 + 1e-9);
        assert!(entities[0].is_alive);
    }

    #[test]
    fn competitors_target_the_same_prey() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);

        let mut rng = SeededSource::from_seed(37);
        let mut entities = vec![
            spawn::seed_entity(
                EntityKind::Herbivore,
                Position::new(400.0, 300.0),
                0,
                context.garden_state_id,
                &mut rng,
            ),
            spawn::seed_entity(
                EntityKind::Carnivore,
                Position::new(404.0, 300.0),
                0,
                context.garden_state_id,
                &mut rng,
            ),
            spawn::seed_entity(
                EntityKind::Carnivore,
                Position::new(450.0, 300.0),
                0,
                context.garden_state_id,
                &mut rng,
            ),
            // Far corner: out of the coordination radius.
            spawn::seed_entity(
                EntityKind::Carnivore,
                Position::new(780.0, 580.0),
                0,
                context.garden_state_id,
                &mut rng,
            ),
        ];
        let hunter = entities[1].id;
        let rival = entities[2].id;

        let competitors = find_competing_carnivores(&entities, hunter, 0, cfg.coordination_radius);
        assert_eq!(competitors, vec![rival]);

        // A rival already busy with closer prey of its own does not compete.
        entities.push(spawn::seed_entity(
            EntityKind::Herbivore,
            Position::new(452.0, 300.0),
            0,
            context.garden_state_id,
            &mut rng,
        ));
        let competitors = find_competing_carnivores(&entities, hunter, 0, cfg.coordination_radius);
        assert!(competitors.is_empty());
    }

    #[test]
    fn hunt_event_reports_competitors() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Herbivore, 400.0, 300.0, &context),
            make(EntityKind::Carnivore, 404.0, 300.0, &context),
            make(EntityKind::Carnivore, 440.0, 300.0, &context),
        ];
        entities[0].energy = 50.0;

        run_carnivore_pass(&mut entities, &context, &mut rng, &mut events);
        let death = events
            .events()
            .iter()
            .find(|e| e.kind == EventKind::Death)
            .unwrap();
        let listed = death.metadata["competing_carnivores"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(listed, 1);
    }
}
