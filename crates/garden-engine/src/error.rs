//! Error types for the engine binary.

use garden_core::config::ConfigError;
use garden_core::tick::TickError;
use garden_db::StoreError;

/// Errors that can stop the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration failed to load or parse.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The store could not be reached or bootstrapped.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A tick failed in a way the loop cannot recover from.
    #[error("tick error: {0}")]
    Tick(#[from] TickError),
}
