//! The herbivore behavior pass.
//!
//! Grazers with a survival instinct. Each tick a herbivore first scans for
//! carnivores inside its threat radius; fleeing supersedes feeding. With no
//! threat it heads for the nearest living plant and eats it on contact;
//! with nothing perceived it wanders, paying the aimless surcharge.

use garden_types::entity::Entity;
use garden_types::enums::{EntityKind, EventKind, Severity};
use garden_types::events::EventBuffer;
use garden_types::geometry::Position;
use garden_types::random::{self, RandomSource};
use tracing::debug;

use crate::death::DeathCause;
use crate::pass::{self, BehaviorContext, KillRecord, PassOutcome};

/// Largest evasion jitter applied to a flee vector, in radians (45 deg).
const FLEE_JITTER_RADIANS: f64 = std::f64::consts::FRAC_PI_4;

/// What one herbivore decided to do this tick.
enum Action {
    /// Run from a threat toward the given point.
    Flee(Position),
    /// Consume the plant at this index in the living set.
    Eat(usize),
    /// Walk toward the plant at this index, eating on arrival.
    Approach(usize),
    /// Wander toward a sampled point, paying the aimless surcharge.
    Explore(Position),
}

/// Run the herbivore pass over the living set.
pub fn run_herbivore_pass(
    entities: &mut [Entity],
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
    events: &mut EventBuffer,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for i in 0..entities.len() {
        if !entities[i].is_alive || entities[i].kind() != EntityKind::Herbivore {
            continue;
        }
        let Some(traits) = entities[i].traits.as_herbivore().copied() else {
            continue;
        };

        let action = decide(entities, i, &traits, ctx, rng);
        let mut aimless = false;
        match action {
            Action::Flee(target) => {
                pass::move_toward(&mut entities[i], target, traits.movement_speed, ctx);
            }
            Action::Approach(plant_idx) => {
                let target = entities[plant_idx].position;
                pass::move_toward(&mut entities[i], target, traits.movement_speed, ctx);
                // Close enough after the walk counts as reaching the meal.
                if entities[plant_idx].is_alive
                    && entities[i].position.distance_to(target) <= ctx.config.eating_distance
                {
                    graze(entities, i, plant_idx, ctx, events, &mut outcome);
                }
            }
            Action::Explore(target) => {
                aimless = true;
                pass::move_toward(&mut entities[i], target, traits.movement_speed, ctx);
            }
            Action::Eat(plant_idx) => {
                graze(entities, i, plant_idx, ctx, events, &mut outcome);
            }
        }

        pass::charge_metabolism(&mut entities[i], ctx, true, aimless);

        if let Some(child) = pass::try_reproduce(&mut entities[i], false, ctx, rng, events) {
            outcome.offspring.push(child);
        }
    }

    outcome
}

/// Pick this tick's action from the herbivore's perception.
fn decide(
    entities: &[Entity],
    i: usize,
    traits: &garden_types::entity::HerbivoreTraits,
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
) -> Action {
    let me = &entities[i];

    if let Some(threat_idx) = most_dangerous_threat(entities, i, traits.threat_detection_radius)
    {
        let target = flee_target(
            me.position,
            entities[threat_idx].position,
            traits.movement_speed,
            ctx,
            rng,
        );
        debug!(
            tick = ctx.tick,
            herbivore = %me.id,
            threat = %entities[threat_idx].id,
            "fleeing"
        );
        return Action::Flee(target);
    }

    if let Some(plant_idx) = pass::nearest_living(
        entities,
        me.position,
        EntityKind::Plant,
        me.id,
        traits.perception_radius,
    ) {
        let dist = me.position.distance_to(entities[plant_idx].position);
        if dist <= ctx.config.eating_distance {
            return Action::Eat(plant_idx);
        }
        return Action::Approach(plant_idx);
    }

    let target = random::position_near(rng, me.position, ctx.config.exploration_range, ctx.bounds);
    Action::Explore(target)
}

/// The most dangerous carnivore in range: threat rises with its energy and
/// with proximity.
fn most_dangerous_threat(entities: &[Entity], i: usize, radius: f64) -> Option<usize> {
    let me = &entities[i];
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in entities.iter().enumerate() {
        if !candidate.is_alive || candidate.kind() != EntityKind::Carnivore {
            continue;
        }
        let dist = me.position.distance_to(candidate.position);
        if dist > radius {
            continue;
        }
        let score = candidate.energy / (dist + 1.0);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Compute where to run: directly away from the threat, with an evasion
/// jitter, biased toward the garden center when cornered near an edge.
fn flee_target(
    me: Position,
    threat: Position,
    flee_distance: f64,
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
) -> Position {
    let (mut dx, mut dy) = (me.x - threat.x, me.y - threat.y);
    let len = dx.hypot(dy);
    if len < f64::EPSILON {
        // Standing on the threat; any direction is away.
        dx = 1.0;
        dy = 0.0;
    } else {
        dx /= len;
        dy /= len;
    }

    let jitter = random::range(rng, -FLEE_JITTER_RADIANS, FLEE_JITTER_RADIANS);
    let (sin_j, cos_j) = jitter.sin_cos();
    let (jx, jy) = (cos_j * dx - sin_j * dy, sin_j * dx + cos_j * dy);
    let (mut fx, mut fy) = (jx, jy);

    if ctx.bounds.distance_to_edge(me) < ctx.config.edge_flee_margin {
        let center = ctx.bounds.center();
        let (mut cx, mut cy) = (center.x - me.x, center.y - me.y);
        let clen = cx.hypot(cy);
        if clen > f64::EPSILON {
            cx /= clen;
            cy /= clen;
            fx = (fx + cx) / 2.0;
            fy = (fy + cy) / 2.0;
            let flen = fx.hypot(fy);
            if flen > f64::EPSILON {
                fx /= flen;
                fy /= flen;
            } else {
                fx = cx;
                fy = cy;
            }
        }
    }

    ctx.bounds.clamp(Position {
        x: me.x + fx * flee_distance,
        y: me.y + fy * flee_distance,
    })
}

/// Consume a plant on contact: the grazer gains a fixed ration, the plant
/// dies with nothing left to decompose.
fn graze(
    entities: &mut [Entity],
    eater_idx: usize,
    plant_idx: usize,
    ctx: &BehaviorContext<'_>,
    events: &mut EventBuffer,
    outcome: &mut PassOutcome,
) {
    let plant_id = entities[plant_idx].id;
    let plant_name = entities[plant_idx].name.clone();
    let eater_id = entities[eater_idx].id;
    let eater_name = entities[eater_idx].name.clone();

    entities[eater_idx].gain_energy(ctx.config.energy_from_plant);

    let plant = &mut entities[plant_idx];
    plant.is_alive = false;
    plant.death_tick = Some(ctx.tick);
    plant.energy = 0.0;

    outcome.kills.push(KillRecord {
        victim: plant_id,
        killer: eater_id,
        cause: DeathCause::Predation,
    });
    events.push(
        EventKind::Death,
        Severity::Medium,
        format!("{plant_name} was eaten down to the roots by {eater_name}."),
        vec![plant_id, eater_id],
        &["interspecies", "biology"],
        serde_json::json!({ "cause": "predation", "predator": eater_id }),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_types::environment::{Environment, WeatherModifiers};
    use garden_types::geometry::GardenBounds;
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
        let mut rng = SeededSource::from_seed(17);
        spawn::seed_entity(kind, Position::new(x, y), 0, ctx.garden_state_id, &mut rng)
    }

    #[test]
    fn herbivore_eats_adjacent_plant() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Plant, 100.0, 100.0, &context),
            make(EntityKind::Herbivore, 103.0, 100.0, &context),
        ];
        entities[1].energy = 50.0;

        let outcome = run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        assert!(!entities[0].is_alive);
        assert!(entities[0].energy.abs() < f64::EPSILON);
        assert_eq!(entities[0].death_tick, Some(24));
        // 50 + 30 gained - 0.5 metabolism.
        assert!((entities[1].energy - 79.5).abs() < 1e-9);
        assert_eq!(outcome.kills.len(), 1);
        assert_eq!(outcome.kills[0].cause, DeathCause::Predation);
        assert!(events.contains_kind(EventKind::Death));
    }

    #[test]
    fn herbivore_walks_toward_distant_plant() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.99);

        let mut entities = vec![
            make(EntityKind::Plant, 160.0, 100.0, &context),
            make(EntityKind::Herbivore, 100.0, 100.0, &context),
        ];
        entities[1].energy = 50.0;

        run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        // Moved 10 px toward the plant and paid 10 * 0.05 + 0.5 base.
        assert!((entities[1].position.x - 110.0).abs() < 1e-9);
        assert!((entities[1].energy - 49.0).abs() < 1e-9);
        assert!(entities[0].is_alive);
    }

    #[test]
    fn flee_supersedes_feeding() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        // Jitter draw of 0.5 is a zero-angle jitter.
        let mut rng = ScriptedSource::constant(0.5);

        let mut entities = vec![
            make(EntityKind::Plant, 403.0, 300.0, &context),
            make(EntityKind::Herbivore, 400.0, 300.0, &context),
            make(EntityKind::Carnivore, 440.0, 300.0, &context),
        ];
        entities[2].energy = 90.0;

        let outcome = run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        // The adjacent plant was NOT eaten; the herbivore ran away from the
        // carnivore (negative x direction).
        assert!(entities[0].is_alive);
        assert!(outcome.kills.is_empty());
        assert!(entities[1].position.x < 400.0);
    }

    #[test]
    fn cornered_flee_bends_inward() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = ScriptedSource::constant(0.5);

        // Herbivore pinned near the left edge with the threat inside the
        // garden: a pure away-vector would push it off the map.
        let mut entities = vec![
            make(EntityKind::Herbivore, 5.0, 300.0, &context),
            make(EntityKind::Carnivore, 40.0, 300.0, &context),
        ];
        entities[1].energy = 90.0;

        run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        let pos = entities[0].position;
        assert!(context.bounds.contains(pos));
        // The inward bias keeps it from hugging the x=0 wall.
        assert!(pos.x >= 0.0);
        assert!(entities[0].energy < 80.0);
    }

    #[test]
    fn no_perception_wanders_with_surcharge() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        let mut rng = SeededSource::from_seed(5);

        let mut entities = vec![make(EntityKind::Herbivore, 400.0, 300.0, &context)];
        entities[0].energy = 50.0;

        run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        // Base 0.5 + aimless 0.25 + movement cost for whatever was covered.
        assert!(entities[0].energy < 50.0 - 0.75 + 1e-9);
    }

    #[test]
    fn well_fed_herbivore_reproduces() {
        let cfg = KernelConfig::default();
        let environment = test_env();
        let context = ctx(&environment, &cfg);
        let mut events = EventBuffer::new(24, context.garden_state_id);
        // Draws: explore target (2), reproduction roll (0.0 passes), then
        // offspring placement/mutation/naming.
        let mut rng = ScriptedSource::new(&[0.5, 0.5, 0.0], 0.99);

        let mut entities = vec![make(EntityKind::Herbivore, 400.0, 300.0, &context)];
        entities[0].energy = 95.0;

        let outcome = run_herbivore_pass(&mut entities, &context, &mut rng, &mut events);
        assert_eq!(outcome.offspring.len(), 1);
        assert_eq!(outcome.offspring[0].kind(), EntityKind::Herbivore);
        assert!(events.contains_kind(EventKind::Reproduction));
    }
}
