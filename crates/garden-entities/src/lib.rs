//! Entity kernel for the Chaos Garden: everything an organism does in one
//! tick, without touching I/O.
//!
//! The kernel sits between `garden-types` (the data structures) and
//! `garden-core` (the orchestrator). Behaviors mutate entity records in
//! place; cross-kind effects (a herbivore killing a plant, a fungus
//! draining a corpse) are applied inside the pass that causes them, and
//! each pass reports what it spawned and what it killed so the orchestrator
//! can account for everything at commit time.
//!
//! # Modules
//!
//! - [`config`] -- [`KernelConfig`]: thresholds, costs, radii, lifespans.
//! - [`naming`] -- Name generation and species derivation.
//! - [`spawn`] -- Entity constructors: seeding, offspring, wild spores.
//! - [`exposure`] -- Environmental wear and the shared response curves.
//! - [`mutation`] -- Per-trait mutation with shift reporting.
//! - [`death`] -- Death causes, state checks, and corpse finalization.
//! - [`pass`] -- The shared behavior-pass context and outcome types.
//! - [`plant`], [`herbivore`], [`carnivore`], [`fungus`] -- The four
//!   per-kind behavior passes, run in that fixed order.
//!
//! [`KernelConfig`]: config::KernelConfig

pub mod carnivore;
pub mod config;
pub mod death;
pub mod exposure;
pub mod fungus;
pub mod herbivore;
pub mod mutation;
pub mod naming;
pub mod pass;
pub mod plant;
pub mod spawn;

pub use config::KernelConfig;
pub use death::DeathCause;
pub use pass::{BehaviorContext, KillRecord, PassOutcome};
