//! Persistence layer for the Chaos Garden simulation.
//!
//! The orchestrator performs all of its I/O through one trait,
//! [`GardenStore`]. Two implementations live here:
//!
//! - [`PgStore`] -- `PostgreSQL` via `sqlx`, the production store, with a
//!   `CREATE TABLE IF NOT EXISTS` schema bootstrap.
//! - [`MemoryStore`] -- the same semantics over in-process maps, used by
//!   the orchestrator test-suite and for dry runs without a database.
//!
//! The commit discipline is the orchestrator's: stores only promise that
//! each operation is applied as written and that `try_acquire_lock` is a
//! conditional update (set only if absent or expired).
//!
//! # Modules
//!
//! - [`store`] -- The [`GardenStore`] trait (the persistence contract)
//! - [`memory`] -- In-memory implementation
//! - [`postgres`] -- `PostgreSQL` implementation and pool configuration
//! - [`error`] -- Shared error type
//!
//! [`GardenStore`]: store::GardenStore
//! [`MemoryStore`]: memory::MemoryStore
//! [`PgStore`]: postgres::PgStore

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PgStore, PostgresConfig};
pub use store::GardenStore;
