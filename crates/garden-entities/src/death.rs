//! Death causes, state checks, and corpse finalization.
//!
//! An entity dies when its energy or health reaches zero or its age passes
//! the kind's lifespan. Predation and full decomposition are recorded by
//! the pass that caused them; everything else is classified from the
//! entity's final state.

use garden_types::entity::Entity;
use garden_types::enums::EntityKind;

use crate::config::KernelConfig;

/// Why an entity died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Energy ran out.
    Starvation,
    /// Age passed the kind's lifespan.
    OldAge,
    /// Eaten by a herbivore or hunted by a carnivore.
    Predation,
    /// Health ran out with energy still in reserve.
    FailingHealth,
    /// A corpse was fully drained by fungi.
    Decomposed,
    /// None of the above applied; recorded as-is rather than guessed.
    Unknown,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::OldAge => write!(f, "old_age"),
            Self::Predation => write!(f, "predation"),
            Self::FailingHealth => write!(f, "failing_health"),
            Self::Decomposed => write!(f, "decomposed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Check whether a living entity meets a state-based death condition.
///
/// Returns `None` while the entity is viable. Does not mutate anything;
/// pair with [`finalize_death`] to actually kill.
pub fn check_death(entity: &Entity, cfg: &KernelConfig) -> Option<DeathCause> {
    if entity.age >= cfg.max_age(entity.kind()) {
        return Some(DeathCause::OldAge);
    }
    if entity.energy <= 0.0 {
        return Some(DeathCause::Starvation);
    }
    if entity.health <= 0.0 {
        return Some(DeathCause::FailingHealth);
    }
    None
}

/// Mark an entity dead at `tick` and apply the kind's corpse rule.
///
/// Plants and fungi keep their residual energy as decomposable biomass.
/// Herbivores and carnivores zero out: their bodies are consumed by the
/// event that killed them (predation) or waste away (starvation), so they
/// never enter the decomposable set.
pub fn finalize_death(entity: &mut Entity, tick: u64) {
    entity.is_alive = false;
    entity.death_tick = Some(tick);
    match entity.kind() {
        EntityKind::Plant | EntityKind::Fungus => {
            entity.energy = entity.energy.max(0.0);
        }
        EntityKind::Herbivore | EntityKind::Carnivore => {
            entity.energy = 0.0;
        }
    }
}
