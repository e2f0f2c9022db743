//! Census assembly and population-change events.
//!
//! After the behavior passes finish, the orchestrator counts what is
//! living, what is dead-but-present, and folds this tick's deaths into the
//! monotonic all-time counters. The previous tick's census is then
//! compared against the new one for extinctions, collapses, explosions,
//! and notable deltas.

use garden_types::entity::Entity;
use garden_types::enums::{EntityKind, EventKind, Severity};
use garden_types::events::EventBuffer;
use garden_types::population::{KindCounts, PopulationSummary};
use tracing::debug;

/// Total living population below which the ecosystem counts as collapsed.
const COLLAPSE_FLOOR: u64 = 10;

/// Factor by which a kind must multiply in one tick to be an explosion.
const EXPLOSION_FACTOR: u64 = 3;

/// Net plant change that warrants a delta event.
const PLANT_DELTA_NOTABLE: i64 = 5;

/// Net herbivore change that warrants a delta event.
const HERBIVORE_DELTA_NOTABLE: i64 = 2;

/// Count the census for a tick.
///
/// `living` is the post-pass living set (kills already applied),
/// `newborns` this tick's births, `corpses` the decomposable set after
/// fungi fed. All-time-dead counters extend the previous summary's by
/// `newly_dead`.
pub fn summarize(
    living: &[Entity],
    newborns: &[Entity],
    corpses: &[Entity],
    previous: &PopulationSummary,
    newly_dead: &KindCounts,
) -> PopulationSummary {
    let mut summary = PopulationSummary {
        all_time_dead: previous.all_time_dead.plus(newly_dead),
        ..PopulationSummary::default()
    };

    for entity in living.iter().chain(newborns) {
        if entity.is_alive {
            summary.living.bump(entity.kind());
        } else if entity.energy > 0.0 {
            summary.dead_in_garden.bump(entity.kind());
        }
    }
    for corpse in corpses {
        if corpse.is_decomposable() {
            summary.dead_in_garden.bump(corpse.kind());
        }
    }
    summary
}

/// Emit EXTINCTION / ECOSYSTEM_COLLAPSE / POPULATION_EXPLOSION /
/// POPULATION_DELTA events from the tick-over-tick census comparison.
pub fn emit_population_events(
    previous: &PopulationSummary,
    current: &PopulationSummary,
    events: &mut EventBuffer,
) {
    for kind in EntityKind::ALL {
        let before = previous.living.get(kind);
        let after = current.living.get(kind);

        if before > 0 && after == 0 {
            events.push(
                EventKind::Extinction,
                Severity::Critical,
                format!("The last {kind} is gone. {before} became none."),
                Vec::new(),
                &["ecology", "milestone"],
                serde_json::json!({ "kind": kind.as_db_str(), "previous": before }),
            );
        }

        if before > 0 && after >= before.saturating_mul(EXPLOSION_FACTOR) {
            events.push(
                EventKind::PopulationExplosion,
                Severity::High,
                format!("A {kind} bloom: {before} became {after} in a single tick."),
                Vec::new(),
                &["ecology"],
                serde_json::json!({
                    "kind": kind.as_db_str(),
                    "previous": before,
                    "current": after,
                }),
            );
        }
    }

    let total_before = previous.total_living();
    let total_after = current.total_living();
    if total_before >= COLLAPSE_FLOOR && total_after < COLLAPSE_FLOOR {
        events.push(
            EventKind::EcosystemCollapse,
            Severity::Critical,
            format!(
                "The ecosystem has collapsed: {total_before} living residents reduced to {total_after}."
            ),
            Vec::new(),
            &["ecology", "chaos"],
            serde_json::json!({ "previous": total_before, "current": total_after }),
        );
    }

    let plant_delta = delta(previous.living.plants, current.living.plants);
    let herbivore_delta = delta(previous.living.herbivores, current.living.herbivores);
    if plant_delta.abs() > PLANT_DELTA_NOTABLE || herbivore_delta.abs() > HERBIVORE_DELTA_NOTABLE
    {
        debug!(plant_delta, herbivore_delta, "notable population delta");
        events.push(
            EventKind::PopulationDelta,
            Severity::Low,
            format!(
                "The census moved: plants {plant_delta:+}, herbivores {herbivore_delta:+}."
            ),
            Vec::new(),
            &["census"],
            serde_json::json!({
                "plant_delta": plant_delta,
                "herbivore_delta": herbivore_delta,
            }),
        );
    }
}

fn delta(before: u64, after: u64) -> i64 {
    i64::try_from(after).unwrap_or(i64::MAX) - i64::try_from(before).unwrap_or(i64::MAX)
}
