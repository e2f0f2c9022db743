//! Environment snapshot and weather modifier vectors.
//!
//! The environment is recomputed once per tick and stored inside the
//! committed [`GardenState`](crate::state::GardenState). Weather is a small
//! state machine whose live phase ([`WeatherPhase`]) travels with the
//! environment; the *rules* of the machine live in `garden-world`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::WeatherKind;

/// Lowest representable temperature, in degrees Celsius.
pub const TEMPERATURE_MIN: f64 = 0.0;

/// Highest representable temperature, in degrees Celsius.
pub const TEMPERATURE_MAX: f64 = 40.0;

/// The six scalars a weather state uses to bend environment and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherModifiers {
    /// Added to the baseline temperature, in degrees Celsius.
    pub temperature_offset: f64,
    /// Multiplies the diurnal sunlight curve.
    pub sunlight_multiplier: f64,
    /// Added to moisture each tick (positive wets, negative dries).
    pub moisture_change_per_tick: f64,
    /// Multiplies plant photosynthesis gain.
    pub photosynthesis_modifier: f64,
    /// Multiplies movement speed for mobile entities.
    pub movement_modifier: f64,
    /// Multiplies reproduction probability.
    pub reproduction_modifier: f64,
}

impl WeatherModifiers {
    /// The do-nothing modifier vector, used when no weather state is
    /// attached (legacy environments) and as the interpolation identity.
    pub const NEUTRAL: Self = Self {
        temperature_offset: 0.0,
        sunlight_multiplier: 1.0,
        moisture_change_per_tick: 0.0,
        photosynthesis_modifier: 1.0,
        movement_modifier: 1.0,
        reproduction_modifier: 1.0,
    };

    /// Linear interpolation toward `other`.
    ///
    /// `t = 0` returns `self` exactly; `t = 1` returns `other` exactly.
    /// Values outside `[0, 1]` are clamped.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            temperature_offset: mix(self.temperature_offset, other.temperature_offset),
            sunlight_multiplier: mix(self.sunlight_multiplier, other.sunlight_multiplier),
            moisture_change_per_tick: mix(
                self.moisture_change_per_tick,
                other.moisture_change_per_tick,
            ),
            photosynthesis_modifier: mix(
                self.photosynthesis_modifier,
                other.photosynthesis_modifier,
            ),
            movement_modifier: mix(self.movement_modifier, other.movement_modifier),
            reproduction_modifier: mix(self.reproduction_modifier, other.reproduction_modifier),
        }
    }
}

impl Default for WeatherModifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// The live phase of the weather state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherPhase {
    /// The regime currently in effect.
    pub current: WeatherKind,
    /// The tick at which `current` was entered.
    pub entered_at_tick: u64,
    /// How long this visit to `current` is planned to last, sampled on entry.
    pub planned_duration_ticks: u64,
    /// The regime before the last transition, if any. Drives interpolation.
    pub previous: Option<WeatherKind>,
    /// Ticks of interpolation progress since the last transition.
    ///
    /// Never exceeds the configured interpolation window.
    pub transition_progress_ticks: u64,
}

/// One tick's atmospheric readings, stored inside the committed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Environment {
    /// The tick these readings were produced for.
    pub tick: u64,
    /// Air temperature in degrees Celsius, always in `[0, 40]`.
    pub temperature: f64,
    /// Normalized sunlight in `[0, 1]`.
    pub sunlight: f64,
    /// Normalized ground moisture in `[0, 1]`.
    pub moisture: f64,
    /// Live weather phase. `None` on legacy rows; treated as neutral.
    #[serde(default)]
    pub weather: Option<WeatherPhase>,
}
