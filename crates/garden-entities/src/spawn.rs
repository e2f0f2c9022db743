//! Entity constructors: seeding, offspring, wild spores.
//!
//! Three ways into the world: the initial seeding (`lineage = origin`),
//! reproduction from a same-kind parent (`lineage = <parent id>`), and the
//! rare wild fungal spore (`lineage = wild`). All three route through the
//! same naming and trait machinery so every entity is fully formed at
//! birth.

use chrono::Utc;
use garden_types::entity::{
    CarnivoreTraits, Entity, EntityTraits, FungusTraits, HerbivoreTraits, Lineage, PlantTraits,
};
use garden_types::enums::EntityKind;
use garden_types::geometry::Position;
use garden_types::ids::{EntityId, GardenStateId};
use garden_types::random::{self, RandomSource};

use crate::mutation::{self, TraitShift};
use crate::naming;
use crate::pass::BehaviorContext;

/// Energy a freshly created entity starts with.
pub const STARTING_ENERGY: f64 = 80.0;

/// Health a freshly created entity starts with.
pub const STARTING_HEALTH: f64 = 100.0;

/// The stock trait bundle a kind starts with before any mutation.
pub const fn default_traits(kind: EntityKind) -> EntityTraits {
    match kind {
        EntityKind::Plant => EntityTraits::Plant(PlantTraits {
            reproduction_rate: 0.06,
            metabolism_efficiency: 1.0,
            photosynthesis_rate: 1.0,
        }),
        EntityKind::Herbivore => EntityTraits::Herbivore(HerbivoreTraits {
            reproduction_rate: 0.05,
            metabolism_efficiency: 1.0,
            movement_speed: 10.0,
            perception_radius: 90.0,
            threat_detection_radius: 70.0,
        }),
        EntityKind::Carnivore => EntityTraits::Carnivore(CarnivoreTraits {
            reproduction_rate: 0.04,
            metabolism_efficiency: 1.0,
            movement_speed: 14.0,
            perception_radius: 120.0,
        }),
        EntityKind::Fungus => EntityTraits::Fungus(FungusTraits {
            reproduction_rate: 0.05,
            metabolism_efficiency: 1.0,
            decomposition_rate: 1.0,
            perception_radius: 60.0,
        }),
    }
}

/// Build a fully formed entity record.
fn build(
    kind: EntityKind,
    position: Position,
    tick: u64,
    garden_state_id: GardenStateId,
    lineage: Lineage,
    traits: EntityTraits,
    rng: &mut dyn RandomSource,
) -> Entity {
    let name = naming::generate_name(kind, rng);
    let species = naming::species_of(&name);
    let now = Utc::now();
    Entity {
        id: EntityId::new(),
        garden_state_id,
        born_at_tick: tick,
        death_tick: None,
        is_alive: true,
        name,
        species,
        position,
        energy: STARTING_ENERGY,
        health: STARTING_HEALTH,
        age: 0,
        lineage,
        traits,
        created_at: now,
        updated_at: now,
    }
}

/// Create an original inhabitant at a chosen position.
pub fn seed_entity(
    kind: EntityKind,
    position: Position,
    tick: u64,
    garden_state_id: GardenStateId,
    rng: &mut dyn RandomSource,
) -> Entity {
    build(
        kind,
        position,
        tick,
        garden_state_id,
        Lineage::Origin,
        default_traits(kind),
        rng,
    )
}

/// Create a wild fungus at a random garden position.
///
/// Draw order: position (two draws), then name (two draws).
pub fn wild_fungus(
    tick: u64,
    garden_state_id: GardenStateId,
    bounds: garden_types::geometry::GardenBounds,
    rng: &mut dyn RandomSource,
) -> Entity {
    let position = random::random_position(rng, bounds);
    build(
        EntityKind::Fungus,
        position,
        tick,
        garden_state_id,
        Lineage::Wild,
        default_traits(EntityKind::Fungus),
        rng,
    )
}

/// Create a child of `parent` scattered within the kind's spread radius,
/// carrying a mutated copy of the parent's traits.
///
/// Draw order: position (two draws), then mutation rolls, then name.
pub fn offspring_of(
    parent: &Entity,
    ctx: &BehaviorContext<'_>,
    rng: &mut dyn RandomSource,
) -> (Entity, Vec<TraitShift>) {
    let kind = parent.kind();
    let position = random::position_near(
        rng,
        parent.position,
        ctx.config.offspring_radius(kind),
        ctx.bounds,
    );
    let (traits, shifts) = mutation::mutate_traits(&parent.traits, ctx.config, rng);
    let child = build(
        kind,
        position,
        ctx.tick,
        ctx.garden_state_id,
        Lineage::Parent(parent.id),
        traits,
        rng,
    );
    (child, shifts)
}
