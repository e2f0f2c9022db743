//! Tick orchestration for the Chaos Garden simulation.
//!
//! This crate owns the tick: one call to [`run_simulation_tick`] advances
//! the world by exactly one step behind a store-backed single-writer lock,
//! or skips with a reason. Everything between lock acquisition and commit
//! is pure in-memory work over the loaded state; the commit is a fixed
//! write sequence whose last step advances the high-water mark.
//!
//! # Modules
//!
//! - [`config`] -- Engine configuration loaded from `garden-config.yaml`.
//! - [`ambient`] -- The once-per-tick ambient narrative selector.
//! - [`population`] -- Census assembly and population-change events.
//! - [`tick`] -- The orchestrator itself.
//!
//! [`run_simulation_tick`]: tick::run_simulation_tick

pub mod ambient;
pub mod config;
pub mod population;
pub mod tick;

pub use config::GardenConfig;
pub use tick::{TickError, run_simulation_tick};
