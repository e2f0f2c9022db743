//! Committed garden state and the tick outcome record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::SkipReason;
use crate::environment::Environment;
use crate::ids::GardenStateId;
use crate::population::PopulationSummary;

/// One committed tick of world state, immutable once written.
///
/// Exactly one row exists per committed tick, and ticks are contiguous
/// from 0 up to the store's `last_completed_tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GardenState {
    /// Unique identifier; entities and events reference it.
    pub id: GardenStateId,
    /// The tick this state represents.
    pub tick: u64,
    /// Real-world commit timestamp.
    pub timestamp: DateTime<Utc>,
    /// Atmospheric readings for the tick.
    pub environment: Environment,
    /// Census taken after all behaviors finished.
    pub population: PopulationSummary,
}

/// The observable result of one `run_simulation_tick` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickOutcome {
    /// Whether a tick actually committed.
    pub executed: bool,
    /// The tick number that committed, or the last completed tick on a skip.
    pub tick: u64,
    /// Wall-clock duration of the attempt in milliseconds.
    pub duration_ms: u64,
    /// Entities born during the tick (0 on a skip).
    pub new_entities: u64,
    /// Entities that died during the tick (0 on a skip).
    pub deaths: u64,
    /// The census after the tick (previous census on a skip).
    pub populations: PopulationSummary,
    /// Why the attempt skipped, when it did.
    pub skip_reason: Option<SkipReason>,
}

impl TickOutcome {
    /// Build the outcome for a skipped attempt.
    pub const fn skipped(
        last_completed_tick: u64,
        duration_ms: u64,
        populations: PopulationSummary,
        reason: SkipReason,
    ) -> Self {
        Self {
            executed: false,
            tick: last_completed_tick,
            duration_ms,
            new_entities: 0,
            deaths: 0,
            populations,
            skip_reason: Some(reason),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::WeatherPhase;
    use crate::enums::WeatherKind;
    use crate::population::KindCounts;

    #[test]
    fn garden_state_json_roundtrip() {
        let state = GardenState {
            id: GardenStateId::new(),
            tick: 42,
            timestamp: Utc::now(),
            environment: Environment {
                tick: 42,
                temperature: 19.5,
                sunlight: 0.62,
                moisture: 0.48,
                weather: Some(WeatherPhase {
                    current: WeatherKind::Rain,
                    entered_at_tick: 40,
                    planned_duration_ticks: 9,
                    previous: Some(WeatherKind::Overcast),
                    transition_progress_ticks: 2,
                }),
            },
            population: PopulationSummary {
                living: KindCounts {
                    plants: 12,
                    herbivores: 4,
                    carnivores: 1,
                    fungi: 2,
                },
                dead_in_garden: KindCounts {
                    plants: 1,
                    herbivores: 0,
                    carnivores: 0,
                    fungi: 0,
                },
                all_time_dead: KindCounts {
                    plants: 30,
                    herbivores: 11,
                    carnivores: 2,
                    fungi: 5,
                },
            },
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: GardenState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn skipped_outcome_carries_reason() {
        let outcome = TickOutcome::skipped(
            7,
            3,
            PopulationSummary::default(),
            SkipReason::AlreadyProcessed,
        );
        assert!(!outcome.executed);
        assert_eq!(outcome.tick, 7);
        assert_eq!(outcome.skip_reason, Some(SkipReason::AlreadyProcessed));
        assert_eq!(outcome.deaths, 0);
    }
}
