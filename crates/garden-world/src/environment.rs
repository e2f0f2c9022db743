//! Per-tick environment advance: diurnal curves, moisture physics, and
//! threshold-crossing detection.
//!
//! The order of operations is fixed and mirrors the tick cycle: the weather
//! machine advances first (its draws come first), then the diurnal baseline
//! is computed with one jitter draw, then the weather modifiers and the
//! moisture physics apply, and finally everything clamps to the mandatory
//! ranges.

use garden_types::environment::{Environment, TEMPERATURE_MAX, TEMPERATURE_MIN};
use garden_types::enums::TimeOfDay;
use garden_types::random::{self, RandomSource};
use tracing::debug;

use crate::config::ClimateConfig;
use crate::weather;

/// Moisture below which a downward crossing counts as drought onset.
pub const DROUGHT_MOISTURE_THRESHOLD: f64 = 0.2;

/// Moisture above which an upward crossing counts as heavy rain.
pub const HEAVY_RAIN_MOISTURE_THRESHOLD: f64 = 0.8;

/// Temperature above which an upward crossing counts as a heat wave.
pub const HEAT_WAVE_TEMPERATURE: f64 = 35.0;

/// Temperature below which a downward crossing counts as a freeze.
pub const FREEZE_TEMPERATURE: f64 = 5.0;

/// Sunlight above which evaporation starts to bite.
const EVAPORATION_SUNLIGHT_FLOOR: f64 = 0.55;

/// Sunlight below which condensation starts to settle.
const CONDENSATION_SUNLIGHT_CEILING: f64 = 0.35;

/// An environmental threshold crossed during the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentShift {
    /// Moisture crossed the drought threshold downward.
    DroughtOnset,
    /// Moisture crossed the heavy-rain threshold upward.
    HeavyRain,
    /// Temperature crossed the heat-wave threshold upward.
    HeatWave,
    /// Temperature crossed the freeze threshold downward.
    Freeze,
}

impl EnvironmentShift {
    /// Renderer-independent description of the shift.
    pub const fn description(self) -> &'static str {
        match self {
            Self::DroughtOnset => "The soil has dried past the drought line.",
            Self::HeavyRain => "The ground is saturated; heavy rain has soaked the garden.",
            Self::HeatWave => "A heat wave grips the garden.",
            Self::Freeze => "Frost creeps across the garden as the air freezes.",
        }
    }
}

/// Normalized sunlight for a tick: a sinusoid with its trough at tick 0
/// and its peak half a day later, always in `[0, 1]`.
pub fn sunlight_for_tick(tick: u64, ticks_per_day: u64) -> f64 {
    if ticks_per_day == 0 {
        return 0.0;
    }
    let frac = (tick % ticks_per_day) as f64 / ticks_per_day as f64;
    let raw = (1.0 - (std::f64::consts::TAU * frac).cos()) / 2.0;
    raw.clamp(0.0, 1.0)
}

/// Phase of the diurnal cycle for a tick.
pub fn time_of_day(tick: u64, ticks_per_day: u64) -> TimeOfDay {
    if ticks_per_day == 0 {
        return TimeOfDay::Night;
    }
    let frac = (tick % ticks_per_day) as f64 / ticks_per_day as f64;
    if !(0.125..0.875).contains(&frac) {
        TimeOfDay::Night
    } else if frac < 0.375 {
        TimeOfDay::Dawn
    } else if frac < 0.625 {
        TimeOfDay::Day
    } else {
        TimeOfDay::Dusk
    }
}

/// Advance the environment by one tick.
///
/// Consumes the weather machine's draws first, then exactly one jitter
/// draw. Returns the new environment, any threshold crossings relative to
/// the previous readings, and whether the weather state changed.
pub fn advance_environment(
    previous: &Environment,
    tick: u64,
    cfg: &ClimateConfig,
    rng: &mut dyn RandomSource,
) -> (Environment, Vec<EnvironmentShift>, bool) {
    let interp = cfg.weather_transition_interpolation_ticks;
    let phase = weather::advance_phase(previous.weather, tick, interp, rng);
    let weather_changed = previous.weather.map(|p| p.current) != Some(phase.current);
    let modifiers = weather::effective_modifiers(Some(&phase), interp);

    let base_sunlight = sunlight_for_tick(tick, cfg.ticks_per_day);
    let sunlight = (base_sunlight * modifiers.sunlight_multiplier).clamp(0.0, 1.0);

    // Diurnal baseline, softened toward yesterday's reading.
    let diurnal = cfg.temperature_diurnal_baseline
        + cfg.temperature_diurnal_amplitude * (2.0 * base_sunlight - 1.0);
    let blend = cfg.temperature_blend_factor.clamp(0.0, 1.0);
    let jitter = random::range(
        rng,
        -cfg.temperature_jitter_range,
        cfg.temperature_jitter_range,
    );
    let mut temperature =
        diurnal * (1.0 - blend) + previous.temperature * blend + modifiers.temperature_offset
            + jitter;

    let mut moisture = previous.moisture + modifiers.moisture_change_per_tick;
    moisture += moisture_physics_delta(base_sunlight, cfg);

    // Drying warms, wetting cools.
    let moisture_delta = moisture - previous.moisture;
    temperature += -moisture_delta * cfg.moisture_temperature_feedback_strength;

    let temperature = temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
    let moisture = moisture.clamp(0.0, 1.0);

    let shifts = detect_shifts(previous, temperature, moisture);
    if !shifts.is_empty() {
        debug!(tick, ?shifts, temperature, moisture, "environment threshold crossed");
    }

    let environment = Environment {
        tick,
        temperature,
        sunlight,
        moisture,
        weather: Some(phase),
    };
    (environment, shifts, weather_changed)
}

/// Sunlight-driven moisture change: evaporation under bright sun,
/// condensation under low light, nothing in between.
fn moisture_physics_delta(base_sunlight: f64, cfg: &ClimateConfig) -> f64 {
    if base_sunlight > EVAPORATION_SUNLIGHT_FLOOR {
        let excess =
            (base_sunlight - EVAPORATION_SUNLIGHT_FLOOR) / (1.0 - EVAPORATION_SUNLIGHT_FLOOR);
        -cfg.max_sunlight_evaporation_per_tick * excess
    } else if base_sunlight < CONDENSATION_SUNLIGHT_CEILING {
        let deficit =
            (CONDENSATION_SUNLIGHT_CEILING - base_sunlight) / CONDENSATION_SUNLIGHT_CEILING;
        cfg.max_low_light_condensation_per_tick * deficit
    } else {
        0.0
    }
}

/// Edge detection against the previous tick's readings.
fn detect_shifts(previous: &Environment, temperature: f64, moisture: f64) -> Vec<EnvironmentShift> {
    let mut shifts = Vec::new();
    if previous.moisture >= DROUGHT_MOISTURE_THRESHOLD && moisture < DROUGHT_MOISTURE_THRESHOLD {
        shifts.push(EnvironmentShift::DroughtOnset);
    }
    if previous.moisture <= HEAVY_RAIN_MOISTURE_THRESHOLD
        && moisture > HEAVY_RAIN_MOISTURE_THRESHOLD
    {
        shifts.push(EnvironmentShift::HeavyRain);
    }
    if previous.temperature <= HEAT_WAVE_TEMPERATURE && temperature > HEAT_WAVE_TEMPERATURE {
        shifts.push(EnvironmentShift::HeatWave);
    }
    if previous.temperature >= FREEZE_TEMPERATURE && temperature < FREEZE_TEMPERATURE {
        shifts.push(EnvironmentShift::Freeze);
    }
    shifts
}
