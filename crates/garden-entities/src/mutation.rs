//! Per-trait mutation with shift reporting.
//!
//! Each heritable trait mutates independently: with probability
//! `mutation_probability` it is multiplied by a uniform factor in
//! `[1 - mutation_range, 1 + mutation_range]`. Shifts whose relative
//! change exceeds 1% are reported so the orchestrator can emit MUTATION
//! events; smaller drift stays silent.

use garden_types::entity::{
    CarnivoreTraits, EntityTraits, FungusTraits, HerbivoreTraits, PlantTraits,
};
use garden_types::random::{self, RandomSource};

use crate::config::KernelConfig;

/// Relative change below which a mutation is considered silent drift.
const REPORTABLE_SHIFT: f64 = 0.01;

/// Reproduction probabilities stay meaningful only inside `[0, 1]`.
const MAX_REPRODUCTION_RATE: f64 = 1.0;

/// Metabolism efficiency floor; below this a lineage would be unviable.
const MIN_METABOLISM_EFFICIENCY: f64 = 0.1;

/// One noticeable trait change between parent and child.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitShift {
    /// Which trait moved (snake_case field name).
    pub trait_name: &'static str,
    /// The parent's value.
    pub old_value: f64,
    /// The child's value.
    pub new_value: f64,
}

impl TraitShift {
    /// Relative change magnitude, against the parent's value.
    pub fn relative_change(&self) -> f64 {
        if self.old_value.abs() < f64::EPSILON {
            return 0.0;
        }
        ((self.new_value - self.old_value) / self.old_value).abs()
    }
}

/// Mutate a full trait bundle, returning the child bundle and the
/// noticeable shifts.
pub fn mutate_traits(
    parent: &EntityTraits,
    cfg: &KernelConfig,
    rng: &mut dyn RandomSource,
) -> (EntityTraits, Vec<TraitShift>) {
    let mut shifts = Vec::new();
    let child = match parent {
        EntityTraits::Plant(t) => EntityTraits::Plant(PlantTraits {
            reproduction_rate: mutate_one(
                "reproduction_rate",
                t.reproduction_rate,
                Some(MAX_REPRODUCTION_RATE),
                cfg,
                rng,
                &mut shifts,
            ),
            metabolism_efficiency: mutate_efficiency(t.metabolism_efficiency, cfg, rng, &mut shifts),
            photosynthesis_rate: mutate_one(
                "photosynthesis_rate",
                t.photosynthesis_rate,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
        }),
        EntityTraits::Herbivore(t) => EntityTraits::Herbivore(HerbivoreTraits {
            reproduction_rate: mutate_one(
                "reproduction_rate",
                t.reproduction_rate,
                Some(MAX_REPRODUCTION_RATE),
                cfg,
                rng,
                &mut shifts,
            ),
            metabolism_efficiency: mutate_efficiency(t.metabolism_efficiency, cfg, rng, &mut shifts),
            movement_speed: mutate_one(
                "movement_speed",
                t.movement_speed,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
            perception_radius: mutate_one(
                "perception_radius",
                t.perception_radius,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
            threat_detection_radius: mutate_one(
                "threat_detection_radius",
                t.threat_detection_radius,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
        }),
        EntityTraits::Carnivore(t) => EntityTraits::Carnivore(CarnivoreTraits {
            reproduction_rate: mutate_one(
                "reproduction_rate",
                t.reproduction_rate,
                Some(MAX_REPRODUCTION_RATE),
                cfg,
                rng,
                &mut shifts,
            ),
            metabolism_efficiency: mutate_efficiency(t.metabolism_efficiency, cfg, rng, &mut shifts),
            movement_speed: mutate_one(
                "movement_speed",
                t.movement_speed,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
            perception_radius: mutate_one(
                "perception_radius",
                t.perception_radius,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
        }),
        EntityTraits::Fungus(t) => EntityTraits::Fungus(FungusTraits {
            reproduction_rate: mutate_one(
                "reproduction_rate",
                t.reproduction_rate,
                Some(MAX_REPRODUCTION_RATE),
                cfg,
                rng,
                &mut shifts,
            ),
            metabolism_efficiency: mutate_efficiency(t.metabolism_efficiency, cfg, rng, &mut shifts),
            decomposition_rate: mutate_one(
                "decomposition_rate",
                t.decomposition_rate,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
            perception_radius: mutate_one(
                "perception_radius",
                t.perception_radius,
                None,
                cfg,
                rng,
                &mut shifts,
            ),
        }),
    };
    (child, shifts)
}

/// Mutate a single trait value. Consumes one draw for the probability
/// roll and, when it hits, one more for the factor.
fn mutate_one(
    trait_name: &'static str,
    value: f64,
    upper_bound: Option<f64>,
    cfg: &KernelConfig,
    rng: &mut dyn RandomSource,
    shifts: &mut Vec<TraitShift>,
) -> f64 {
    if !random::chance(rng, cfg.mutation_probability) {
        return value;
    }
    let mut mutated = random::apply_mutation(rng, value, cfg.mutation_range).max(0.0);
    if let Some(bound) = upper_bound {
        mutated = mutated.min(bound);
    }
    let shift = TraitShift {
        trait_name,
        old_value: value,
        new_value: mutated,
    };
    if shift.relative_change() > REPORTABLE_SHIFT {
        shifts.push(shift);
    }
    mutated
}

fn mutate_efficiency(
    value: f64,
    cfg: &KernelConfig,
    rng: &mut dyn RandomSource,
    shifts: &mut Vec<TraitShift>,
) -> f64 {
    mutate_one("metabolism_efficiency", value, None, cfg, rng, shifts)
        .max(MIN_METABOLISM_EFFICIENCY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_types::entity::PlantTraits;
    use garden_types::random::{ScriptedSource, SeededSource};

    use super::*;

    fn plant_traits() -> EntityTraits {
        EntityTraits::Plant(PlantTraits {
            reproduction_rate: 0.06,
            metabolism_efficiency: 1.0,
            photosynthesis_rate: 1.0,
        })
    }

    #[test]
    fn no_rolls_hit_no_change() {
        let cfg = KernelConfig::default();
        // Every probability roll misses (draw 0.99 > 0.1).
        let mut rng = ScriptedSource::constant(0.99);
        let (child, shifts) = mutate_traits(&plant_traits(), &cfg, &mut rng);
        assert_eq!(child, plant_traits());
        assert!(shifts.is_empty());
    }

    #[test]
    fn a_hit_mutates_within_band() {
        let cfg = KernelConfig::default();
        // First trait: roll hits (0.0), factor draw 1.0-eps pushes to the
        // top of the band. Remaining rolls miss.
        let mut rng = ScriptedSource::new(&[0.0, 0.999_999], 0.99);
        let (child, shifts) = mutate_traits(&plant_traits(), &cfg, &mut rng);
        let child_plant = child.as_plant().unwrap();
        assert!(child_plant.reproduction_rate > 0.06);
        assert!(child_plant.reproduction_rate <= 0.06 * 1.2 + 1e-9);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].trait_name, "reproduction_rate");
    }

    #[test]
    fn tiny_shifts_are_silent() {
        let cfg = KernelConfig::default();
        // Factor draw 0.5 is a factor of exactly 1.0: no relative change.
        let mut rng = ScriptedSource::new(&[0.0, 0.5], 0.99);
        let (child, shifts) = mutate_traits(&plant_traits(), &cfg, &mut rng);
        assert_eq!(child, plant_traits());
        assert!(shifts.is_empty());
    }

    #[test]
    fn reproduction_rate_is_capped_at_one() {
        let cfg = KernelConfig {
            mutation_probability: 1.0,
            mutation_range: 0.5,
            ..KernelConfig::default()
        };
        let high = EntityTraits::Plant(PlantTraits {
            reproduction_rate: 0.9,
            metabolism_efficiency: 1.0,
            photosynthesis_rate: 1.0,
        });
        let mut rng = SeededSource::from_seed(1);
        for _ in 0..100 {
            let (child, _) = mutate_traits(&high, &cfg, &mut rng);
            assert!(child.reproduction_rate() <= 1.0);
        }
    }

    #[test]
    fn efficiency_never_collapses_to_zero() {
        let cfg = KernelConfig {
            mutation_probability: 1.0,
            mutation_range: 1.0,
            ..KernelConfig::default()
        };
        let fragile = EntityTraits::Plant(PlantTraits {
            reproduction_rate: 0.06,
            metabolism_efficiency: 0.12,
            photosynthesis_rate: 1.0,
        });
        let mut rng = SeededSource::from_seed(2);
        for _ in 0..200 {
            let (child, _) = mutate_traits(&fragile, &cfg, &mut rng);
            assert!(child.metabolism_efficiency() >= MIN_METABOLISM_EFFICIENCY);
        }
    }

    #[test]
    fn mutation_preserves_the_kind() {
        let cfg = KernelConfig::default();
        let mut rng = SeededSource::from_seed(3);
        let (child, _) = mutate_traits(&plant_traits(), &cfg, &mut rng);
        assert_eq!(child.kind(), plant_traits().kind());
    }
}
