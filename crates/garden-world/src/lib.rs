//! Environment model and weather state machine for the Chaos Garden.
//!
//! This crate turns a previous tick's atmospheric readings into the next
//! tick's: the diurnal sunlight and temperature curves, moisture physics
//! (weather delta, evaporation, condensation, the moisture-temperature
//! feedback), and the weighted-Markov weather machine with interpolated
//! modifier vectors.
//!
//! # Modules
//!
//! - [`config`] -- [`ClimateConfig`]: diurnal constants, jitter, physics
//!   coefficients, interpolation window.
//! - [`environment`] -- Per-tick environment advance, time-of-day
//!   derivation, and threshold-crossing detection.
//! - [`weather`] -- Weather state definitions, transition sampling, and
//!   modifier interpolation.
//!
//! [`ClimateConfig`]: config::ClimateConfig

pub mod config;
pub mod environment;
pub mod weather;

pub use config::ClimateConfig;
pub use environment::{EnvironmentShift, advance_environment, sunlight_for_tick, time_of_day};
pub use weather::{advance_phase, effective_modifiers, state_def};
