//! The entity record and its per-kind trait bundles.
//!
//! An entity is one autonomous organism. The record is a tagged union over
//! the four kinds: common fields live on [`Entity`], kind-specific heritable
//! traits live in [`EntityTraits`]. Accessing the wrong variant is a
//! programming error, so behavior code matches on the tag exactly once per
//! pass and the accessors return `Option`.
//!
//! A dead entity with residual energy is a *decomposable corpse*: it keeps
//! its position and remains queryable until fungi drain it to zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EntityKind;
use crate::geometry::Position;
use crate::ids::{EntityId, GardenStateId};

/// Lowest representable energy or health.
pub const STAT_MIN: f64 = 0.0;

/// Highest representable energy or health.
pub const STAT_MAX: f64 = 100.0;

/// Where an entity came from.
///
/// Persisted as a plain string: `"origin"` for seeded entities, `"wild"`
/// for spontaneous fungal spores, or the parent's UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    /// Present since the initial seeding of the garden.
    Origin,
    /// Spawned by a wild-spore event (fungi only).
    Wild,
    /// Born to a parent of the same kind.
    Parent(EntityId),
}

impl Lineage {
    /// The persisted string form.
    pub fn as_string(&self) -> String {
        match self {
            Self::Origin => String::from("origin"),
            Self::Wild => String::from("wild"),
            Self::Parent(id) => id.to_string(),
        }
    }

    /// Parse the persisted string form. Unknown non-UUID strings fall back
    /// to [`Lineage::Origin`] so old rows never fail to load.
    pub fn parse(value: &str) -> Self {
        match value {
            "origin" => Self::Origin,
            "wild" => Self::Wild,
            other => uuid::Uuid::parse_str(other)
                .map_or(Self::Origin, |id| Self::Parent(EntityId::from(id))),
        }
    }
}

impl Serialize for Lineage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Lineage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl core::fmt::Display for Lineage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Heritable traits of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlantTraits {
    /// Per-tick probability of reproducing when energy allows.
    pub reproduction_rate: f64,
    /// Divides metabolic energy costs; higher is cheaper to run.
    pub metabolism_efficiency: f64,
    /// Multiplies photosynthesis gain.
    pub photosynthesis_rate: f64,
}

/// Heritable traits of a herbivore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HerbivoreTraits {
    /// Per-tick probability of reproducing when energy allows.
    pub reproduction_rate: f64,
    /// Divides metabolic energy costs; higher is cheaper to run.
    pub metabolism_efficiency: f64,
    /// Pixels covered per tick of movement.
    pub movement_speed: f64,
    /// How far away food is noticed, in pixels.
    pub perception_radius: f64,
    /// How far away carnivores are noticed, in pixels.
    pub threat_detection_radius: f64,
}

/// Heritable traits of a carnivore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CarnivoreTraits {
    /// Per-tick probability of reproducing when energy allows.
    pub reproduction_rate: f64,
    /// Divides metabolic energy costs; higher is cheaper to run.
    pub metabolism_efficiency: f64,
    /// Pixels covered per tick of movement.
    pub movement_speed: f64,
    /// How far away prey is noticed, in pixels.
    pub perception_radius: f64,
}

/// Heritable traits of a fungus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FungusTraits {
    /// Per-tick probability of reproducing when energy allows.
    pub reproduction_rate: f64,
    /// Divides metabolic energy costs; higher is cheaper to run.
    pub metabolism_efficiency: f64,
    /// Multiplies per-tick energy drained from corpses.
    pub decomposition_rate: f64,
    /// How far away corpses are noticed, in pixels.
    pub perception_radius: f64,
}

/// The kind tag plus that kind's heritable traits.
///
/// Serialized internally tagged (`"type": "plant"`, fields inline) so the
/// persisted `traits` JSON column is self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EntityTraits {
    /// Plant traits.
    Plant(PlantTraits),
    /// Herbivore traits.
    Herbivore(HerbivoreTraits),
    /// Carnivore traits.
    Carnivore(CarnivoreTraits),
    /// Fungus traits.
    Fungus(FungusTraits),
}

impl EntityTraits {
    /// The kind this trait bundle belongs to.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Plant(_) => EntityKind::Plant,
            Self::Herbivore(_) => EntityKind::Herbivore,
            Self::Carnivore(_) => EntityKind::Carnivore,
            Self::Fungus(_) => EntityKind::Fungus,
        }
    }

    /// Reproduction probability, common to every kind.
    pub const fn reproduction_rate(&self) -> f64 {
        match self {
            Self::Plant(t) => t.reproduction_rate,
            Self::Herbivore(t) => t.reproduction_rate,
            Self::Carnivore(t) => t.reproduction_rate,
            Self::Fungus(t) => t.reproduction_rate,
        }
    }

    /// Metabolism efficiency, common to every kind.
    pub const fn metabolism_efficiency(&self) -> f64 {
        match self {
            Self::Plant(t) => t.metabolism_efficiency,
            Self::Herbivore(t) => t.metabolism_efficiency,
            Self::Carnivore(t) => t.metabolism_efficiency,
            Self::Fungus(t) => t.metabolism_efficiency,
        }
    }

    /// The plant bundle, if this is a plant.
    pub const fn as_plant(&self) -> Option<&PlantTraits> {
        match self {
            Self::Plant(t) => Some(t),
            _ => None,
        }
    }

    /// The herbivore bundle, if this is a herbivore.
    pub const fn as_herbivore(&self) -> Option<&HerbivoreTraits> {
        match self {
            Self::Herbivore(t) => Some(t),
            _ => None,
        }
    }

    /// The carnivore bundle, if this is a carnivore.
    pub const fn as_carnivore(&self) -> Option<&CarnivoreTraits> {
        match self {
            Self::Carnivore(t) => Some(t),
            _ => None,
        }
    }

    /// The fungus bundle, if this is a fungus.
    pub const fn as_fungus(&self) -> Option<&FungusTraits> {
        match self {
            Self::Fungus(t) => Some(t),
            _ => None,
        }
    }
}

/// One autonomous organism, alive or decomposing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Entity {
    /// Stable identifier for the entity's whole lifetime.
    pub id: EntityId,
    /// The committed garden state this row was last written under.
    pub garden_state_id: GardenStateId,
    /// Tick the entity entered the world.
    pub born_at_tick: u64,
    /// Tick the entity died; `None` while alive.
    pub death_tick: Option<u64>,
    /// Whether the entity is alive.
    pub is_alive: bool,
    /// Display name; its leading token is the species.
    pub name: String,
    /// Canonical classifier derived from `name`, stable for life.
    pub species: String,
    /// Location inside the garden rectangle.
    pub position: Position,
    /// Stored energy in `[0, 100]`.
    pub energy: f64,
    /// Health in `[0, 100]`.
    pub health: f64,
    /// Ticks spent alive. Dead entities stop aging.
    pub age: u64,
    /// Where the entity came from.
    #[ts(as = "String")]
    pub lineage: Lineage,
    /// Kind tag plus heritable traits.
    pub traits: EntityTraits,
    /// Real-world creation time.
    pub created_at: DateTime<Utc>,
    /// Real-world time of the last persisted update.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// The entity's kind.
    pub const fn kind(&self) -> EntityKind {
        self.traits.kind()
    }

    /// Whether this is a dead entity that fungi can still drain.
    pub fn is_decomposable(&self) -> bool {
        !self.is_alive && self.energy > 0.0
    }

    /// Euclidean distance to another entity.
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.position.distance_to(other.position)
    }

    /// Add energy, capped at the stat maximum.
    pub fn gain_energy(&mut self, amount: f64) {
        self.energy = (self.energy + amount).min(STAT_MAX);
    }

    /// Remove energy, floored at the stat minimum.
    pub fn spend_energy(&mut self, amount: f64) {
        self.energy = (self.energy - amount).max(STAT_MIN);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_plant() -> Entity {
        Entity {
            id: EntityId::new(),
            garden_state_id: GardenStateId::new(),
            born_at_tick: 0,
            death_tick: None,
            is_alive: true,
            name: String::from("Fern Duskveil"),
            species: String::from("Fern"),
            position: Position::new(100.0, 100.0),
            energy: 85.0,
            health: 95.0,
            age: 3,
            lineage: Lineage::Origin,
            traits: EntityTraits::Plant(PlantTraits {
                reproduction_rate: 0.06,
                metabolism_efficiency: 1.0,
                photosynthesis_rate: 1.0,
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lineage_string_roundtrip() {
        assert_eq!(Lineage::parse("origin"), Lineage::Origin);
        assert_eq!(Lineage::parse("wild"), Lineage::Wild);
        let parent = EntityId::new();
        assert_eq!(
            Lineage::parse(&Lineage::Parent(parent).as_string()),
            Lineage::Parent(parent)
        );
        // Garbage degrades to origin instead of failing the row load.
        assert_eq!(Lineage::parse("???"), Lineage::Origin);
    }

    #[test]
    fn traits_json_is_internally_tagged() {
        let entity = sample_plant();
        let json = serde_json::to_value(&entity.traits).unwrap();
        assert_eq!(json["type"], "plant");
        assert!(json["photosynthesis_rate"].is_number());
    }

    #[test]
    fn entity_json_roundtrip() {
        let entity = sample_plant();
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn wrong_variant_accessor_returns_none() {
        let entity = sample_plant();
        assert!(entity.traits.as_plant().is_some());
        assert!(entity.traits.as_carnivore().is_none());
    }

    #[test]
    fn decomposable_requires_death_and_energy() {
        let mut entity = sample_plant();
        assert!(!entity.is_decomposable());
        entity.is_alive = false;
        assert!(entity.is_decomposable());
        entity.energy = 0.0;
        assert!(!entity.is_decomposable());
    }

    #[test]
    fn energy_changes_are_clamped() {
        let mut entity = sample_plant();
        entity.gain_energy(50.0);
        assert!((entity.energy - 100.0).abs() < f64::EPSILON);
        entity.spend_energy(250.0);
        assert!(entity.energy.abs() < f64::EPSILON);
    }
}
