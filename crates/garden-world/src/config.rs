//! Climate configuration: the constants behind the environment model.
//!
//! Defaults match the tuning the rest of the engine is tested against;
//! every field can be overridden from the engine's YAML config.

use serde::Deserialize;

/// Constants for the diurnal curves, moisture physics, and weather machine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClimateConfig {
    /// Ticks in one full day/night cycle.
    #[serde(default = "default_ticks_per_day")]
    pub ticks_per_day: u64,

    /// Center of the diurnal temperature sinusoid, in degrees Celsius.
    #[serde(default = "default_temperature_baseline")]
    pub temperature_diurnal_baseline: f64,

    /// Amplitude of the diurnal temperature sinusoid, in degrees Celsius.
    #[serde(default = "default_temperature_amplitude")]
    pub temperature_diurnal_amplitude: f64,

    /// Half-width of the uniform per-tick temperature jitter, in degrees.
    #[serde(default = "default_temperature_jitter_range")]
    pub temperature_jitter_range: f64,

    /// How much of the previous tick's temperature bleeds into this tick's.
    #[serde(default = "default_temperature_blend_factor")]
    pub temperature_blend_factor: f64,

    /// Maximum moisture lost per tick to bright-sun evaporation.
    #[serde(default = "default_max_evaporation")]
    pub max_sunlight_evaporation_per_tick: f64,

    /// Maximum moisture gained per tick from low-light condensation.
    #[serde(default = "default_max_condensation")]
    pub max_low_light_condensation_per_tick: f64,

    /// Degrees of warming per unit of moisture lost in one tick.
    #[serde(default = "default_feedback_strength")]
    pub moisture_temperature_feedback_strength: f64,

    /// Ticks over which weather modifier vectors interpolate after a
    /// transition.
    #[serde(default = "default_interpolation_ticks")]
    pub weather_transition_interpolation_ticks: u64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: default_ticks_per_day(),
            temperature_diurnal_baseline: default_temperature_baseline(),
            temperature_diurnal_amplitude: default_temperature_amplitude(),
            temperature_jitter_range: default_temperature_jitter_range(),
            temperature_blend_factor: default_temperature_blend_factor(),
            max_sunlight_evaporation_per_tick: default_max_evaporation(),
            max_low_light_condensation_per_tick: default_max_condensation(),
            moisture_temperature_feedback_strength: default_feedback_strength(),
            weather_transition_interpolation_ticks: default_interpolation_ticks(),
        }
    }
}

const fn default_ticks_per_day() -> u64 {
    96
}

const fn default_temperature_baseline() -> f64 {
    18.0
}

const fn default_temperature_amplitude() -> f64 {
    6.0
}

const fn default_temperature_jitter_range() -> f64 {
    0.6
}

const fn default_temperature_blend_factor() -> f64 {
    0.05
}

const fn default_max_evaporation() -> f64 {
    0.016
}

const fn default_max_condensation() -> f64 {
    0.010
}

const fn default_feedback_strength() -> f64 {
    2.0
}

const fn default_interpolation_ticks() -> u64 {
    4
}
