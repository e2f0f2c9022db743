//! Enumeration types shared across the simulation.
//!
//! Each enum that reaches the store carries a stable lowercase string form
//! (`as_db_str` / `parse_db_str`) so the persisted layout never depends on
//! Rust derive details.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The four kinds of living entity in the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// Immobile photosynthesizer.
    Plant,
    /// Mobile grazer that eats living plants.
    Herbivore,
    /// Mobile hunter that preys on herbivores.
    Carnivore,
    /// Immobile decomposer that drains corpses.
    Fungus,
}

impl EntityKind {
    /// All kinds, in the fixed behavior-pass order of the tick cycle.
    pub const ALL: [Self; 4] = [Self::Plant, Self::Herbivore, Self::Carnivore, Self::Fungus];

    /// Stable lowercase string form used in the `entities.type` column.
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Herbivore => "herbivore",
            Self::Carnivore => "carnivore",
            Self::Fungus => "fungus",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse_db_str(value: &str) -> Option<Self> {
        match value {
            "plant" => Some(Self::Plant),
            "herbivore" => Some(Self::Herbivore),
            "carnivore" => Some(Self::Carnivore),
            "fungus" => Some(Self::Fungus),
            _ => None,
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

/// Atmospheric regimes produced by the weather state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum WeatherKind {
    /// Bright, dry, slightly warm.
    Clear,
    /// Dim and damp, otherwise mild.
    Overcast,
    /// Steady rainfall, cooler and darker.
    Rain,
    /// Violent rain, little light, sharp cold.
    Storm,
    /// Low light and low movement, slowly wetting.
    Fog,
    /// Hot, bright, aggressively drying.
    Drought,
}

impl WeatherKind {
    /// Stable string form used in persisted environment JSON and events.
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::Clear => "CLEAR",
            Self::Overcast => "OVERCAST",
            Self::Rain => "RAIN",
            Self::Storm => "STORM",
            Self::Fog => "FOG",
            Self::Drought => "DROUGHT",
        }
    }

    /// Human-readable lowercase name for narrative text.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Clear => "clear skies",
            Self::Overcast => "overcast skies",
            Self::Rain => "rain",
            Self::Storm => "a storm",
            Self::Fog => "fog",
            Self::Drought => "drought",
        }
    }
}

impl core::fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

/// Phase of the diurnal cycle, derived from the tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TimeOfDay {
    /// Normalized day fraction below 0.125 or at/above 0.875.
    Night,
    /// Normalized day fraction in [0.125, 0.375).
    Dawn,
    /// Normalized day fraction in [0.375, 0.625).
    Day,
    /// Normalized day fraction in [0.625, 0.875).
    Dusk,
}

impl TimeOfDay {
    /// Human-readable name for narrative text.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Dawn => "dawn",
            Self::Day => "midday",
            Self::Dusk => "dusk",
        }
    }
}

/// The closed set of event categories the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// An entity entered the world (seeding, reproduction, wild spore).
    Birth,
    /// An entity died; the description carries the cause.
    Death,
    /// A parent produced offspring.
    Reproduction,
    /// A trait shifted noticeably between parent and child.
    Mutation,
    /// A kind's living count dropped from positive to zero.
    Extinction,
    /// A kind's living count at least tripled in one tick.
    PopulationExplosion,
    /// A notable net change in plant or herbivore counts.
    PopulationDelta,
    /// Total living population collapsed below the viability floor.
    EcosystemCollapse,
    /// Weather shifted or an environmental threshold was crossed.
    EnvironmentChange,
    /// A fire disaster (user-injected; the engine never rolls these).
    DisasterFire,
    /// A flood disaster (user-injected).
    DisasterFlood,
    /// A plague disaster (user-injected).
    DisasterPlague,
    /// A manual intervention from outside the engine.
    UserIntervention,
    /// The once-per-tick ambient narrative beat.
    Ambient,
}

impl EventKind {
    /// Stable snake_case string form used in the `event_type` column.
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Death => "death",
            Self::Reproduction => "reproduction",
            Self::Mutation => "mutation",
            Self::Extinction => "extinction",
            Self::PopulationExplosion => "population_explosion",
            Self::PopulationDelta => "population_delta",
            Self::EcosystemCollapse => "ecosystem_collapse",
            Self::EnvironmentChange => "environment_change",
            Self::DisasterFire => "disaster_fire",
            Self::DisasterFlood => "disaster_flood",
            Self::DisasterPlague => "disaster_plague",
            Self::UserIntervention => "user_intervention",
            Self::Ambient => "ambient",
        }
    }

    /// Parse the stable string form back into an event kind.
    pub fn parse_db_str(value: &str) -> Option<Self> {
        match value {
            "birth" => Some(Self::Birth),
            "death" => Some(Self::Death),
            "reproduction" => Some(Self::Reproduction),
            "mutation" => Some(Self::Mutation),
            "extinction" => Some(Self::Extinction),
            "population_explosion" => Some(Self::PopulationExplosion),
            "population_delta" => Some(Self::PopulationDelta),
            "ecosystem_collapse" => Some(Self::EcosystemCollapse),
            "environment_change" => Some(Self::EnvironmentChange),
            "disaster_fire" => Some(Self::DisasterFire),
            "disaster_flood" => Some(Self::DisasterFlood),
            "disaster_plague" => Some(Self::DisasterPlague),
            "user_intervention" => Some(Self::UserIntervention),
            "ambient" => Some(Self::Ambient),
            _ => None,
        }
    }

    /// The tag every event of this kind carries (lowercased kind name).
    pub const fn tag(self) -> &'static str {
        self.as_db_str()
    }
}

/// How loudly downstream narrators should treat an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// Routine texture: births, ambient beats, small deltas.
    Low,
    /// Worth a sentence: deaths, weather shifts.
    Medium,
    /// Worth a paragraph: explosions, threshold crossings.
    High,
    /// The headline: extinctions, ecosystem collapse.
    Critical,
}

impl Severity {
    /// Stable string form used in the `severity` column.
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse the stable string form back into a severity.
    pub fn parse_db_str(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Why a tick attempt declined to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SkipReason {
    /// Another writer currently holds the simulation lock.
    LockUnavailable,
    /// The requested tick was already committed by another writer.
    AlreadyProcessed,
}

impl SkipReason {
    /// Stable string form surfaced in the tick outcome.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LockUnavailable => "lock_unavailable",
            Self::AlreadyProcessed => "already_processed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_db_strings_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse_db_str(kind.as_db_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse_db_str("rock"), None);
    }

    #[test]
    fn event_kind_db_strings_roundtrip() {
        let kinds = [
            EventKind::Birth,
            EventKind::Death,
            EventKind::Reproduction,
            EventKind::Mutation,
            EventKind::Extinction,
            EventKind::PopulationExplosion,
            EventKind::PopulationDelta,
            EventKind::EcosystemCollapse,
            EventKind::EnvironmentChange,
            EventKind::DisasterFire,
            EventKind::DisasterFlood,
            EventKind::DisasterPlague,
            EventKind::UserIntervention,
            EventKind::Ambient,
        ];
        for kind in kinds {
            assert_eq!(EventKind::parse_db_str(kind.as_db_str()), Some(kind));
        }
    }

    #[test]
    fn severity_ordering_matches_escalation() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn skip_reason_strings() {
        assert_eq!(SkipReason::LockUnavailable.as_str(), "lock_unavailable");
        assert_eq!(SkipReason::AlreadyProcessed.as_str(), "already_processed");
    }
}
