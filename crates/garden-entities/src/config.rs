//! Configurable parameters for the entity kernel.
//!
//! One struct holds every tunable the behavior passes read: energy flows,
//! reproduction thresholds and costs, perception and spread radii,
//! lifespans, mutation odds, and exposure tolerances. Defaults are the
//! tuning the test-suite pins down; the engine config can override any of
//! them from YAML.

use garden_types::enums::EntityKind;
use serde::Deserialize;

/// Tunables for the four behavior passes and the shared vital mechanics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KernelConfig {
    /// Energy a plant gains per tick at full sun before multipliers.
    #[serde(default = "default_base_photosynthesis_rate")]
    pub base_photosynthesis_rate: f64,

    /// Baseline metabolic energy cost per tick for every living entity.
    #[serde(default = "default_base_energy_cost_per_tick")]
    pub base_energy_cost_per_tick: f64,

    /// Extra metabolic cost paid when wandering with no target in sight.
    #[serde(default = "default_aimless_metabolism_surcharge")]
    pub aimless_metabolism_surcharge: f64,

    /// Energy cost per pixel actually moved.
    #[serde(default = "default_movement_energy_cost_per_pixel")]
    pub movement_energy_cost_per_pixel: f64,

    /// Distance at which feeding and hunting connect, in pixels.
    #[serde(default = "default_eating_distance")]
    pub eating_distance: f64,

    /// Energy a herbivore gains from consuming one plant (capped by the
    /// plant's remaining energy).
    #[serde(default = "default_energy_from_plant")]
    pub energy_from_plant: f64,

    /// Energy a carnivore gains from one kill (capped by the prey's
    /// remaining energy).
    #[serde(default = "default_energy_from_prey")]
    pub energy_from_prey: f64,

    /// Minimum energy before a plant will attempt reproduction.
    #[serde(default = "default_plant_reproduction_threshold")]
    pub plant_reproduction_threshold: f64,

    /// Minimum energy before a herbivore will attempt reproduction.
    #[serde(default = "default_herbivore_reproduction_threshold")]
    pub herbivore_reproduction_threshold: f64,

    /// Minimum energy before a carnivore will attempt reproduction.
    #[serde(default = "default_carnivore_reproduction_threshold")]
    pub carnivore_reproduction_threshold: f64,

    /// Minimum energy before a fungus will attempt reproduction.
    #[serde(default = "default_fungus_reproduction_threshold")]
    pub fungus_reproduction_threshold: f64,

    /// Energy a plant spends on one offspring.
    #[serde(default = "default_plant_reproduction_cost")]
    pub plant_reproduction_cost: f64,

    /// Energy a herbivore spends on one offspring.
    #[serde(default = "default_herbivore_reproduction_cost")]
    pub herbivore_reproduction_cost: f64,

    /// Energy a carnivore spends on one offspring.
    #[serde(default = "default_carnivore_reproduction_cost")]
    pub carnivore_reproduction_cost: f64,

    /// Energy a fungus spends on one offspring.
    #[serde(default = "default_fungus_reproduction_cost")]
    pub fungus_reproduction_cost: f64,

    /// How far plant seeds scatter from the parent, in pixels.
    #[serde(default = "default_seed_spread_radius")]
    pub seed_spread_radius: f64,

    /// How far fungal spores scatter from the parent, in pixels.
    #[serde(default = "default_spore_spread_radius")]
    pub spore_spread_radius: f64,

    /// How far mobile offspring are placed from the parent, in pixels.
    #[serde(default = "default_litter_radius")]
    pub litter_radius: f64,

    /// Per-trait probability of mutating during reproduction.
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,

    /// Half-width of the uniform mutation factor band around 1.0.
    #[serde(default = "default_mutation_range")]
    pub mutation_range: f64,

    /// Lifespan of a plant, in ticks.
    #[serde(default = "default_max_age_plant")]
    pub max_age_plant: u64,

    /// Lifespan of a herbivore, in ticks.
    #[serde(default = "default_max_age_herbivore")]
    pub max_age_herbivore: u64,

    /// Lifespan of a carnivore, in ticks.
    #[serde(default = "default_max_age_carnivore")]
    pub max_age_carnivore: u64,

    /// Lifespan of a fungus, in ticks.
    #[serde(default = "default_max_age_fungus")]
    pub max_age_fungus: u64,

    /// How far an exploring entity samples wander targets, in pixels.
    #[serde(default = "default_exploration_range")]
    pub exploration_range: f64,

    /// Distance from a garden edge inside which fleeing biases inward.
    #[serde(default = "default_edge_flee_margin")]
    pub edge_flee_margin: f64,

    /// Radius around a prey within which carnivores observe competitors.
    #[serde(default = "default_coordination_radius")]
    pub coordination_radius: f64,

    /// Energy drained from a corpse per tick at decomposition rate 1.0.
    #[serde(default = "default_decomposition_energy_per_tick")]
    pub decomposition_energy_per_tick: f64,

    /// Per-tick probability of a wild fungal spore taking root.
    #[serde(default = "default_wild_fungus_spawn_probability")]
    pub wild_fungus_spawn_probability: f64,

    /// Energy above which a plant slowly regenerates health.
    #[serde(default = "default_plant_health_regen_threshold")]
    pub plant_health_regen_threshold: f64,

    /// Health regained per tick by a well-fed plant.
    #[serde(default = "default_plant_health_regen_amount")]
    pub plant_health_regen_amount: f64,

    /// The temperature every organism is happiest at, in degrees Celsius.
    #[serde(default = "default_ideal_temperature")]
    pub ideal_temperature: f64,

    /// Degrees of deviation from ideal tolerated before health wear starts.
    #[serde(default = "default_temperature_tolerance")]
    pub temperature_tolerance: f64,

    /// Health lost per degree beyond the tolerance band, per tick.
    #[serde(default = "default_temperature_health_penalty_per_degree")]
    pub temperature_health_penalty_per_degree: f64,

    /// Moisture below which parched ground drains energy.
    #[serde(default = "default_dry_moisture_floor")]
    pub dry_moisture_floor: f64,

    /// Maximum energy lost per tick to bone-dry ground.
    #[serde(default = "default_dry_energy_penalty")]
    pub dry_energy_penalty: f64,

    /// Moisture above which waterlogged ground wears health.
    #[serde(default = "default_wet_moisture_ceiling")]
    pub wet_moisture_ceiling: f64,

    /// Maximum health lost per tick to fully waterlogged ground.
    #[serde(default = "default_wet_health_penalty")]
    pub wet_health_penalty: f64,
}

impl KernelConfig {
    /// Lifespan for a kind, in ticks.
    pub const fn max_age(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Plant => self.max_age_plant,
            EntityKind::Herbivore => self.max_age_herbivore,
            EntityKind::Carnivore => self.max_age_carnivore,
            EntityKind::Fungus => self.max_age_fungus,
        }
    }

    /// Reproduction energy threshold for a kind.
    pub const fn reproduction_threshold(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Plant => self.plant_reproduction_threshold,
            EntityKind::Herbivore => self.herbivore_reproduction_threshold,
            EntityKind::Carnivore => self.carnivore_reproduction_threshold,
            EntityKind::Fungus => self.fungus_reproduction_threshold,
        }
    }

    /// Reproduction energy cost for a kind.
    pub const fn reproduction_cost(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Plant => self.plant_reproduction_cost,
            EntityKind::Herbivore => self.herbivore_reproduction_cost,
            EntityKind::Carnivore => self.carnivore_reproduction_cost,
            EntityKind::Fungus => self.fungus_reproduction_cost,
        }
    }

    /// How far offspring of a kind land from the parent.
    pub const fn offspring_radius(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Plant => self.seed_spread_radius,
            EntityKind::Fungus => self.spore_spread_radius,
            EntityKind::Herbivore | EntityKind::Carnivore => self.litter_radius,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            base_photosynthesis_rate: default_base_photosynthesis_rate(),
            base_energy_cost_per_tick: default_base_energy_cost_per_tick(),
            aimless_metabolism_surcharge: default_aimless_metabolism_surcharge(),
            movement_energy_cost_per_pixel: default_movement_energy_cost_per_pixel(),
            eating_distance: default_eating_distance(),
            energy_from_plant: default_energy_from_plant(),
            energy_from_prey: default_energy_from_prey(),
            plant_reproduction_threshold: default_plant_reproduction_threshold(),
            herbivore_reproduction_threshold: default_herbivore_reproduction_threshold(),
            carnivore_reproduction_threshold: default_carnivore_reproduction_threshold(),
            fungus_reproduction_threshold: default_fungus_reproduction_threshold(),
            plant_reproduction_cost: default_plant_reproduction_cost(),
            herbivore_reproduction_cost: default_herbivore_reproduction_cost(),
            carnivore_reproduction_cost: default_carnivore_reproduction_cost(),
            fungus_reproduction_cost: default_fungus_reproduction_cost(),
            seed_spread_radius: default_seed_spread_radius(),
            spore_spread_radius: default_spore_spread_radius(),
            litter_radius: default_litter_radius(),
            mutation_probability: default_mutation_probability(),
            mutation_range: default_mutation_range(),
            max_age_plant: default_max_age_plant(),
            max_age_herbivore: default_max_age_herbivore(),
            max_age_carnivore: default_max_age_carnivore(),
            max_age_fungus: default_max_age_fungus(),
            exploration_range: default_exploration_range(),
            edge_flee_margin: default_edge_flee_margin(),
            coordination_radius: default_coordination_radius(),
            decomposition_energy_per_tick: default_decomposition_energy_per_tick(),
            wild_fungus_spawn_probability: default_wild_fungus_spawn_probability(),
            plant_health_regen_threshold: default_plant_health_regen_threshold(),
            plant_health_regen_amount: default_plant_health_regen_amount(),
            ideal_temperature: default_ideal_temperature(),
            temperature_tolerance: default_temperature_tolerance(),
            temperature_health_penalty_per_degree:
                default_temperature_health_penalty_per_degree(),
            dry_moisture_floor: default_dry_moisture_floor(),
            dry_energy_penalty: default_dry_energy_penalty(),
            wet_moisture_ceiling: default_wet_moisture_ceiling(),
            wet_health_penalty: default_wet_health_penalty(),
        }
    }
}

const fn default_base_photosynthesis_rate() -> f64 {
    4.0
}

const fn default_base_energy_cost_per_tick() -> f64 {
    0.5
}

const fn default_aimless_metabolism_surcharge() -> f64 {
    0.25
}

const fn default_movement_energy_cost_per_pixel() -> f64 {
    0.05
}

const fn default_eating_distance() -> f64 {
    5.0
}

const fn default_energy_from_plant() -> f64 {
    30.0
}

const fn default_energy_from_prey() -> f64 {
    30.0
}

const fn default_plant_reproduction_threshold() -> f64 {
    80.0
}

const fn default_herbivore_reproduction_threshold() -> f64 {
    75.0
}

const fn default_carnivore_reproduction_threshold() -> f64 {
    85.0
}

const fn default_fungus_reproduction_threshold() -> f64 {
    70.0
}

const fn default_plant_reproduction_cost() -> f64 {
    25.0
}

const fn default_herbivore_reproduction_cost() -> f64 {
    40.0
}

const fn default_carnivore_reproduction_cost() -> f64 {
    45.0
}

const fn default_fungus_reproduction_cost() -> f64 {
    20.0
}

const fn default_seed_spread_radius() -> f64 {
    40.0
}

const fn default_spore_spread_radius() -> f64 {
    30.0
}

const fn default_litter_radius() -> f64 {
    25.0
}

const fn default_mutation_probability() -> f64 {
    0.1
}

const fn default_mutation_range() -> f64 {
    0.2
}

const fn default_max_age_plant() -> u64 {
    200
}

const fn default_max_age_herbivore() -> u64 {
    150
}

const fn default_max_age_carnivore() -> u64 {
    220
}

const fn default_max_age_fungus() -> u64 {
    180
}

const fn default_exploration_range() -> f64 {
    60.0
}

const fn default_edge_flee_margin() -> f64 {
    50.0
}

const fn default_coordination_radius() -> f64 {
    80.0
}

const fn default_decomposition_energy_per_tick() -> f64 {
    6.0
}

const fn default_wild_fungus_spawn_probability() -> f64 {
    0.006
}

const fn default_plant_health_regen_threshold() -> f64 {
    70.0
}

const fn default_plant_health_regen_amount() -> f64 {
    0.5
}

const fn default_ideal_temperature() -> f64 {
    20.0
}

const fn default_temperature_tolerance() -> f64 {
    8.0
}

const fn default_temperature_health_penalty_per_degree() -> f64 {
    0.05
}

const fn default_dry_moisture_floor() -> f64 {
    0.15
}

const fn default_dry_energy_penalty() -> f64 {
    0.4
}

const fn default_wet_moisture_ceiling() -> f64 {
    0.85
}

const fn default_wet_health_penalty() -> f64 {
    0.3
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_coherent() {
        let cfg = KernelConfig::default();
        assert!(cfg.plant_reproduction_cost < cfg.plant_reproduction_threshold);
        assert!(cfg.herbivore_reproduction_cost < cfg.herbivore_reproduction_threshold);
        assert!(cfg.carnivore_reproduction_cost < cfg.carnivore_reproduction_threshold);
        assert!(cfg.fungus_reproduction_cost < cfg.fungus_reproduction_threshold);
        assert!(cfg.wild_fungus_spawn_probability < 0.05);
    }

    #[test]
    fn per_kind_accessors_match_fields() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.max_age(EntityKind::Plant), cfg.max_age_plant);
        assert_eq!(cfg.max_age(EntityKind::Carnivore), cfg.max_age_carnivore);
        assert!(
            (cfg.reproduction_threshold(EntityKind::Fungus) - cfg.fungus_reproduction_threshold)
                .abs()
                < f64::EPSILON
        );
        assert!(
            (cfg.offspring_radius(EntityKind::Plant) - cfg.seed_spread_radius).abs()
                < f64::EPSILON
        );
        assert!(
            (cfg.offspring_radius(EntityKind::Herbivore) - cfg.litter_radius).abs() < f64::EPSILON
        );
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg: KernelConfig =
            serde_json::from_str(r#"{"energy_from_prey": 45.0}"#).unwrap();
        assert!((cfg.energy_from_prey - 45.0).abs() < f64::EPSILON);
        assert!((cfg.eating_distance - 5.0).abs() < f64::EPSILON);
    }
}
