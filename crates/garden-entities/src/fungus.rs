//! The fungus behavior pass.
//!
//! Fungi close the loop: they drain decomposable corpses back into living
//! energy. The candidate corpses are the ones that entered the tick dead;
//! entities killed earlier in this same tick are left for the next one.
//! A corpse drained to zero is fully decomposed and leaves the world's
//! queryable set.

use garden_types::entity::Entity;
use garden_types::enums::{EntityKind, EventKind, Severity};
use garden_types::events::EventBuffer;
use garden_types::ids::EntityId;
use garden_types::random::RandomSource;
use tracing::debug;

use crate::pass::{self, BehaviorContext, PassOutcome};

/// What the fungus pass produced, beyond the common outcome shape.
#[derive(Debug, Default)]
pub struct FungusPassOutcome {
    /// Offspring and (never any) kills.
    pub pass: PassOutcome,
    /// Corpses drained to zero this tick, now fully decomposed.
    pub decomposed_entity_ids: Vec<EntityId>,
}

/// Run the fungus pass.
///
/// `corpses` is the decomposable set loaded at tick start; it is mutated
/// in place as fungi feed.
pub fn run_fungus_pass(
    entities: &mut [Entity],
    corpses: &mut [Entity],
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
    events: &mut EventBuffer,
) -> FungusPassOutcome {
    let mut outcome = FungusPassOutcome::default();

    for i in 0..entities.len() {
        if !entities[i].is_alive || entities[i].kind() != EntityKind::Fungus {
            continue;
        }
        let Some(traits) = entities[i].traits.as_fungus().copied() else {
            continue;
        };

        if let Some(corpse_idx) =
            nearest_decomposable(corpses, &entities[i], traits.perception_radius)
        {
            let drain = traits.decomposition_rate * ctx.config.decomposition_energy_per_tick;
            let corpse = &mut corpses[corpse_idx];
            let taken = drain.min(corpse.energy);
            corpse.energy -= taken;
            entities[i].gain_energy(taken);

            if corpse.energy <= 0.0 {
                corpse.energy = 0.0;
                outcome.decomposed_entity_ids.push(corpse.id);
                debug!(
                    tick = ctx.tick,
                    fungus = %entities[i].id,
                    corpse = %corpse.id,
                    "corpse fully decomposed"
                );
                events.push(
                    EventKind::Death,
                    Severity::Low,
                    format!(
                        "{} finished breaking down the remains of {}.",
                        entities[i].name, corpse.name
                    ),
                    vec![corpse.id, entities[i].id],
                    &["biology", "ecology"],
                    serde_json::json!({ "cause": "decomposed", "decomposer": entities[i].id }),
                );
            }
        }

        pass::charge_metabolism(&mut entities[i], ctx, false, false);

        if let Some(child) = pass::try_reproduce(&mut entities[i], true, ctx, rng, events) {
            outcome.pass.offspring.push(child);
        }
    }

    outcome
}

/// Index of the nearest decomposable corpse within reach.
fn nearest_decomposable(corpses: &[Entity], fungus: &Entity, radius: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, corpse) in corpses.iter().enumerate() {
        if !corpse.is_decomposable() {
            continue;
        }
        let dist = fungus.position.distance_to(corpse.position);
        if dist > radius {
            continue;
        }
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}
