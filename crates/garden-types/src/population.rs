//! Per-kind census counts and the population summary.
//!
//! The summary is recomputed every tick after behaviors finish and is
//! persisted inside the committed garden state. The all-time-dead counters
//! are monotonic: each tick adds that tick's deaths and never subtracts.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EntityKind;

/// A count for each of the four entity kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct KindCounts {
    /// Plant count.
    pub plants: u64,
    /// Herbivore count.
    pub herbivores: u64,
    /// Carnivore count.
    pub carnivores: u64,
    /// Fungus count.
    pub fungi: u64,
}

impl KindCounts {
    /// All counters at zero.
    pub const ZERO: Self = Self {
        plants: 0,
        herbivores: 0,
        carnivores: 0,
        fungi: 0,
    };

    /// The count for one kind.
    pub const fn get(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Plant => self.plants,
            EntityKind::Herbivore => self.herbivores,
            EntityKind::Carnivore => self.carnivores,
            EntityKind::Fungus => self.fungi,
        }
    }

    /// Increment the count for one kind.
    pub const fn bump(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Plant => self.plants += 1,
            EntityKind::Herbivore => self.herbivores += 1,
            EntityKind::Carnivore => self.carnivores += 1,
            EntityKind::Fungus => self.fungi += 1,
        }
    }

    /// Sum over all kinds.
    pub const fn total(&self) -> u64 {
        self.plants + self.herbivores + self.carnivores + self.fungi
    }

    /// Member-wise sum with another count set.
    pub const fn plus(&self, other: &Self) -> Self {
        Self {
            plants: self.plants + other.plants,
            herbivores: self.herbivores + other.herbivores,
            carnivores: self.carnivores + other.carnivores,
            fungi: self.fungi + other.fungi,
        }
    }
}

/// The per-tick census persisted inside the garden state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PopulationSummary {
    /// Living entities by kind.
    pub living: KindCounts,
    /// Dead-but-still-in-garden entities (energy > 0) by kind.
    pub dead_in_garden: KindCounts,
    /// Monotonic all-time death counters by kind.
    pub all_time_dead: KindCounts,
}

impl PopulationSummary {
    /// Total living entities.
    pub const fn total_living(&self) -> u64 {
        self.living.total()
    }

    /// Total entities physically present: living plus in-garden dead.
    pub const fn total_in_garden(&self) -> u64 {
        self.living.total() + self.dead_in_garden.total()
    }

    /// Whether the all-time-dead counters are each >= a previous summary's.
    ///
    /// This is the monotonicity invariant checked across consecutive ticks.
    pub const fn dead_counters_dominate(&self, previous: &Self) -> bool {
        self.all_time_dead.plants >= previous.all_time_dead.plants
            && self.all_time_dead.herbivores >= previous.all_time_dead.herbivores
            && self.all_time_dead.carnivores >= previous.all_time_dead.carnivores
            && self.all_time_dead.fungi >= previous.all_time_dead.fungi
    }
}
