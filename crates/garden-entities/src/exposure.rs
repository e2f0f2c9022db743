//! Environmental wear and the shared response curves.
//!
//! Exposure runs once per living entity at tick start, right after aging:
//! temperature outside the tolerance band wears health, parched ground
//! drains energy, waterlogged ground wears health. The magnitudes scale
//! with how far past the band the readings sit, so a mild day costs
//! nothing and an extreme one costs a fraction of a point.

use garden_types::entity::Entity;
use garden_types::environment::Environment;

use crate::config::KernelConfig;

/// Metabolic scaling with temperature: 1.0 at the ideal, rising linearly
/// to 1.5 at a 20-degree deviation and capped there.
pub fn temperature_metabolism_multiplier(temperature: f64, cfg: &KernelConfig) -> f64 {
    let deviation = (temperature - cfg.ideal_temperature).abs();
    1.0 + (deviation / 20.0).min(1.0) * 0.5
}

/// Plant growth scaling with moisture: a tent peaking at 1.5 for `m = 0.5`
/// and falling to 0.5 at either extreme.
pub fn moisture_growth_multiplier(moisture: f64) -> f64 {
    let m = moisture.clamp(0.0, 1.0);
    1.5 - 2.0 * (m - 0.5).abs()
}

/// Apply one tick of environmental wear to a living entity.
pub fn apply_exposure(entity: &mut Entity, environment: &Environment, cfg: &KernelConfig) {
    let deviation = (environment.temperature - cfg.ideal_temperature).abs();
    if deviation > cfg.temperature_tolerance {
        let past_band = deviation - cfg.temperature_tolerance;
        let wear = past_band * cfg.temperature_health_penalty_per_degree;
        entity.health = (entity.health - wear).max(0.0);
    }

    if environment.moisture < cfg.dry_moisture_floor {
        let deficit = (cfg.dry_moisture_floor - environment.moisture) / cfg.dry_moisture_floor;
        entity.spend_energy(cfg.dry_energy_penalty * deficit);
    } else if environment.moisture > cfg.wet_moisture_ceiling {
        let excess = (environment.moisture - cfg.wet_moisture_ceiling)
            / (1.0 - cfg.wet_moisture_ceiling);
        entity.health = (entity.health - cfg.wet_health_penalty * excess).max(0.0);
    }
}
