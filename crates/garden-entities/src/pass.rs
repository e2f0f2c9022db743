//! The shared behavior-pass context and outcome types.
//!
//! Every per-kind pass receives the same read-only context and reports the
//! same outcome shape: entities it spawned and entities it killed. Kills
//! are applied in place during the pass (a plant eaten mid-pass is dead for
//! the next grazer); the records exist so the orchestrator can account for
//! causes without re-deriving them.

use garden_types::entity::Entity;
use garden_types::enums::{EventKind, Severity};
use garden_types::environment::{Environment, WeatherModifiers};
use garden_types::events::EventBuffer;
use garden_types::geometry::GardenBounds;
use garden_types::ids::{EntityId, GardenStateId};
use garden_types::random::{self, RandomSource};
use tracing::debug;

use crate::config::KernelConfig;
use crate::death::DeathCause;
use crate::exposure;
use crate::spawn;

/// Read-only world context handed to each behavior pass.
#[derive(Debug)]
pub struct BehaviorContext<'a> {
    /// The tick being processed.
    pub tick: u64,
    /// The state id this tick will commit under.
    pub garden_state_id: GardenStateId,
    /// This tick's environment readings.
    pub environment: &'a Environment,
    /// Effective weather modifiers for this tick.
    pub modifiers: WeatherModifiers,
    /// The world rectangle.
    pub bounds: GardenBounds,
    /// Kernel tunables.
    pub config: &'a KernelConfig,
}

/// One kill applied during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillRecord {
    /// The entity that died.
    pub victim: EntityId,
    /// The entity that caused the death.
    pub killer: EntityId,
    /// Why the victim died.
    pub cause: DeathCause,
}

/// What a behavior pass produced.
#[derive(Debug, Default)]
pub struct PassOutcome {
    /// Entities born during the pass. Not processed until the next tick.
    pub offspring: Vec<Entity>,
    /// Kills applied during the pass, in order.
    pub kills: Vec<KillRecord>,
}

impl PassOutcome {
    /// Fold another outcome into this one, preserving order.
    pub fn absorb(&mut self, other: Self) {
        self.offspring.extend(other.offspring);
        self.kills.extend(other.kills);
    }
}

/// Move an entity toward a target and charge the movement cost.
///
/// Speed is the entity's own, bent by the weather movement modifier; the
/// cost is per pixel actually covered. The landing position is clamped to
/// the garden rectangle.
pub(crate) fn move_toward(
    entity: &mut Entity,
    target: garden_types::geometry::Position,
    speed: f64,
    ctx: &BehaviorContext<'_>,
) {
    let effective = (speed * ctx.modifiers.movement_modifier).max(0.0);
    let (next, covered) = entity.position.step_toward(target, effective);
    entity.position = ctx.bounds.clamp(next);
    let efficiency = entity.traits.metabolism_efficiency().max(0.1);
    entity.spend_energy(covered * ctx.config.movement_energy_cost_per_pixel / efficiency);
}

/// Charge the per-tick base metabolism.
///
/// `temperature_scaled` applies the warm-blooded curve (herbivores and
/// carnivores); `aimless` adds the wander surcharge for entities moving
/// with no target in sight.
pub(crate) fn charge_metabolism(
    entity: &mut Entity,
    ctx: &BehaviorContext<'_>,
    temperature_scaled: bool,
    aimless: bool,
) {
    let mut cost = ctx.config.base_energy_cost_per_tick;
    if temperature_scaled {
        cost *= exposure::temperature_metabolism_multiplier(
            ctx.environment.temperature,
            ctx.config,
        );
    }
    if aimless {
        cost += ctx.config.aimless_metabolism_surcharge;
    }
    let efficiency = entity.traits.metabolism_efficiency().max(0.1);
    entity.spend_energy(cost / efficiency);
}

/// Attempt reproduction for one parent.
///
/// Checks the kind's energy threshold, rolls the reproduction probability
/// (bent by weather for the rooted kinds), charges the cost, and emits the
/// REPRODUCTION, BIRTH, and any MUTATION events. Returns the child.
pub(crate) fn try_reproduce(
    parent: &mut Entity,
    weather_bent: bool,
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
    events: &mut EventBuffer,
) -> Option<Entity> {
    let kind = parent.kind();
    if parent.energy < ctx.config.reproduction_threshold(kind) {
        return None;
    }
    let mut probability = parent.traits.reproduction_rate();
    if weather_bent {
        probability *= ctx.modifiers.reproduction_modifier;
    }
    if !random::chance(rng, probability) {
        return None;
    }

    parent.spend_energy(ctx.config.reproduction_cost(kind));
    let (child, shifts) = spawn::offspring_of(parent, ctx, rng);
    debug!(
        tick = ctx.tick,
        parent = %parent.id,
        child = %child.id,
        kind = %kind,
        "reproduction"
    );

    events.push(
        EventKind::Reproduction,
        Severity::Low,
        reproduction_line(kind, &parent.name, &child.name),
        vec![parent.id, child.id],
        &["biology"],
        serde_json::json!({ "parent": parent.id, "species": child.species }),
    );
    events.push(
        EventKind::Birth,
        Severity::Low,
        format!("{} entered the garden.", child.name),
        vec![child.id],
        &["biology"],
        serde_json::json!({ "lineage": child.lineage.as_string() }),
    );
    for shift in &shifts {
        events.push(
            EventKind::Mutation,
            Severity::Low,
            format!(
                "{}'s {} drifted from {:.3} to {:.3}.",
                child.name, shift.trait_name, shift.old_value, shift.new_value
            ),
            vec![child.id, parent.id],
            &["evolution"],
            serde_json::json!({
                "trait": shift.trait_name,
                "old": shift.old_value,
                "new": shift.new_value,
            }),
        );
    }
    Some(child)
}

fn reproduction_line(
    kind: garden_types::enums::EntityKind,
    parent: &str,
    child: &str,
) -> String {
    use garden_types::enums::EntityKind;
    match kind {
        EntityKind::Plant => format!("{parent} scattered seeds; {child} took root nearby."),
        EntityKind::Herbivore => format!("{parent} gave birth; {child} joined the herd."),
        EntityKind::Carnivore => format!("{parent} reared young; {child} prowls the garden."),
        EntityKind::Fungus => format!("{parent} released spores; {child} crept up from the loam."),
    }
}

/// Index of the nearest living entity of `kind`, excluding `exclude`.
pub(crate) fn nearest_living(
    entities: &[Entity],
    from: garden_types::geometry::Position,
    kind: garden_types::enums::EntityKind,
    exclude: EntityId,
    within: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in entities.iter().enumerate() {
        if !candidate.is_alive || candidate.kind() != kind || candidate.id == exclude {
            continue;
        }
        let dist = from.distance_to(candidate.position);
        if dist > within {
            continue;
        }
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}
