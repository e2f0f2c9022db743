//! The weather state machine: weighted Markov transitions with
//! interpolated modifier vectors.
//!
//! Each [`WeatherKind`] has a static definition: a modifier vector, a
//! duration band, and weighted transitions to its successors. On entering a
//! state the machine samples a planned duration from the band; once the
//! visit has lasted that long, the next state is drawn by weighted random
//! over the transition table.
//!
//! After a transition, effective modifiers ramp linearly from the previous
//! state's vector to the current one over the configured interpolation
//! window, so a storm arrives over a few ticks instead of slamming in.

use garden_types::environment::{WeatherModifiers, WeatherPhase};
use garden_types::enums::WeatherKind;
use garden_types::random::{self, RandomSource};
use tracing::debug;

/// Static definition of one weather state.
#[derive(Debug, Clone)]
pub struct WeatherStateDef {
    /// The modifier vector in effect while this state rules.
    pub modifiers: WeatherModifiers,
    /// Shortest planned visit, in ticks.
    pub min_duration_ticks: u64,
    /// Longest planned visit, in ticks.
    pub max_duration_ticks: u64,
    /// Weighted successors. Weights are relative, not normalized.
    pub transitions: &'static [(WeatherKind, f64)],
}

const CLEAR: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: 1.5,
        sunlight_multiplier: 1.0,
        moisture_change_per_tick: -0.005,
        photosynthesis_modifier: 1.1,
        movement_modifier: 1.0,
        reproduction_modifier: 1.0,
    },
    min_duration_ticks: 8,
    max_duration_ticks: 30,
    transitions: &[
        (WeatherKind::Overcast, 5.0),
        (WeatherKind::Fog, 2.0),
        (WeatherKind::Rain, 2.0),
        (WeatherKind::Drought, 1.0),
    ],
};

const OVERCAST: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: -1.0,
        sunlight_multiplier: 0.7,
        moisture_change_per_tick: 0.002,
        photosynthesis_modifier: 0.9,
        movement_modifier: 1.0,
        reproduction_modifier: 1.0,
    },
    min_duration_ticks: 6,
    max_duration_ticks: 24,
    transitions: &[
        (WeatherKind::Clear, 4.0),
        (WeatherKind::Rain, 4.0),
        (WeatherKind::Fog, 2.0),
        (WeatherKind::Storm, 1.0),
    ],
};

const RAIN: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: -3.0,
        sunlight_multiplier: 0.5,
        moisture_change_per_tick: 0.02,
        photosynthesis_modifier: 0.85,
        movement_modifier: 0.85,
        reproduction_modifier: 1.1,
    },
    min_duration_ticks: 4,
    max_duration_ticks: 16,
    transitions: &[
        (WeatherKind::Overcast, 4.0),
        (WeatherKind::Clear, 2.0),
        (WeatherKind::Storm, 2.0),
        (WeatherKind::Fog, 1.0),
    ],
};

const STORM: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: -6.0,
        sunlight_multiplier: 0.25,
        moisture_change_per_tick: 0.035,
        photosynthesis_modifier: 0.6,
        movement_modifier: 0.6,
        reproduction_modifier: 0.7,
    },
    min_duration_ticks: 2,
    max_duration_ticks: 8,
    transitions: &[
        (WeatherKind::Rain, 5.0),
        (WeatherKind::Overcast, 3.0),
        (WeatherKind::Clear, 1.0),
    ],
};

const FOG: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: -1.5,
        sunlight_multiplier: 0.6,
        moisture_change_per_tick: 0.008,
        photosynthesis_modifier: 0.8,
        movement_modifier: 0.7,
        reproduction_modifier: 0.9,
    },
    min_duration_ticks: 3,
    max_duration_ticks: 10,
    transitions: &[
        (WeatherKind::Clear, 3.0),
        (WeatherKind::Overcast, 3.0),
        (WeatherKind::Rain, 1.0),
    ],
};

const DROUGHT: WeatherStateDef = WeatherStateDef {
    modifiers: WeatherModifiers {
        temperature_offset: 5.0,
        sunlight_multiplier: 1.15,
        moisture_change_per_tick: -0.03,
        photosynthesis_modifier: 0.7,
        movement_modifier: 0.9,
        reproduction_modifier: 0.6,
    },
    min_duration_ticks: 10,
    max_duration_ticks: 40,
    transitions: &[(WeatherKind::Clear, 5.0), (WeatherKind::Overcast, 2.0)],
};

/// The static definition for a weather state.
pub const fn state_def(kind: WeatherKind) -> &'static WeatherStateDef {
    match kind {
        WeatherKind::Clear => &CLEAR,
        WeatherKind::Overcast => &OVERCAST,
        WeatherKind::Rain => &RAIN,
        WeatherKind::Storm => &STORM,
        WeatherKind::Fog => &FOG,
        WeatherKind::Drought => &DROUGHT,
    }
}

/// Enter a state at `tick`, sampling a planned duration from its band.
pub fn enter_state(
    kind: WeatherKind,
    previous: Option<WeatherKind>,
    tick: u64,
    rng: &mut dyn RandomSource,
) -> WeatherPhase {
    let def = state_def(kind);
    let planned =
        random::range_inclusive(rng, def.min_duration_ticks, def.max_duration_ticks);
    WeatherPhase {
        current: kind,
        entered_at_tick: tick,
        planned_duration_ticks: planned,
        previous,
        transition_progress_ticks: 0,
    }
}

/// Advance the weather machine by one tick.
///
/// A missing phase (legacy environment) bootstraps into CLEAR at `tick`.
/// Otherwise, if the planned visit has elapsed, the successor is drawn from
/// the transition table; if not, interpolation progress advances while a
/// previous state is still being blended out.
pub fn advance_phase(
    phase: Option<WeatherPhase>,
    tick: u64,
    interpolation_ticks: u64,
    rng: &mut dyn RandomSource,
) -> WeatherPhase {
    let Some(mut phase) = phase else {
        debug!(tick, "no weather phase on record, bootstrapping into CLEAR");
        return enter_state(WeatherKind::Clear, None, tick, rng);
    };

    let elapsed = tick.saturating_sub(phase.entered_at_tick);
    if elapsed >= phase.planned_duration_ticks {
        let def = state_def(phase.current);
        let next = random::pick_weighted(rng, def.transitions)
            .copied()
            .unwrap_or(phase.current);
        debug!(
            tick,
            from = %phase.current,
            to = %next,
            stayed = elapsed,
            "weather transition"
        );
        return enter_state(next, Some(phase.current), tick, rng);
    }

    if phase.previous.is_some() && phase.transition_progress_ticks < interpolation_ticks {
        phase.transition_progress_ticks += 1;
    }
    phase
}

/// The modifier vector in effect for a phase.
///
/// `None` (legacy environments) yields the neutral vector. During a
/// transition the previous and current vectors blend linearly with
/// `t = transition_progress_ticks / interpolation_ticks`: at progress 0 the
/// previous state's vector applies unchanged, at saturation the current
/// state's does.
pub fn effective_modifiers(
    phase: Option<&WeatherPhase>,
    interpolation_ticks: u64,
) -> WeatherModifiers {
    let Some(phase) = phase else {
        return WeatherModifiers::NEUTRAL;
    };
    let current = state_def(phase.current).modifiers;
    let Some(previous) = phase.previous else {
        return current;
    };
    if interpolation_ticks == 0 {
        return current;
    }
    let t = phase.transition_progress_ticks as f64 / interpolation_ticks as f64;
    state_def(previous).modifiers.lerp(&current, t)
}
