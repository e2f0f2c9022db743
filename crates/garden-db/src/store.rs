//! The persistence contract the tick orchestrator runs against.
//!
//! This is the only I/O surface the core touches. The orchestrator calls
//! these operations in a fixed sequence per tick; `last_completed_tick` is
//! advanced last so a torn commit leaves orphaned rows that the next
//! attempt overwrites (events for the tick are deleted before re-flushing).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use garden_types::entity::Entity;
use garden_types::events::SimulationEvent;
use garden_types::ids::{EntityId, GardenStateId};
use garden_types::state::GardenState;

use crate::error::StoreError;

/// The state/entity/event store the orchestrator drives.
#[async_trait]
pub trait GardenStore: Send + Sync {
    /// The high-water mark: the last tick whose commit fully completed.
    async fn last_completed_tick(&self) -> Result<u64, StoreError>;

    /// Conditionally take the single-writer lock.
    ///
    /// Succeeds only when the lock is absent or expired at `now`; on
    /// success the lock belongs to `owner` until `now + ttl_ms`.
    async fn try_acquire_lock(
        &self,
        owner: &str,
        now: DateTime<Utc>,
        ttl_ms: u64,
    ) -> Result<bool, StoreError>;

    /// Release the lock if `owner` still holds it; otherwise a no-op.
    async fn release_lock(&self, owner: &str) -> Result<(), StoreError>;

    /// The committed state for a tick, if any.
    async fn garden_state_by_tick(&self, tick: u64)
    -> Result<Option<GardenState>, StoreError>;

    /// The most recently committed state, if any.
    async fn latest_garden_state(&self) -> Result<Option<GardenState>, StoreError>;

    /// All living entities.
    async fn living_entities(&self) -> Result<Vec<Entity>, StoreError>;

    /// All decomposable corpses: not alive, energy still above zero.
    async fn decomposable_dead_entities(&self) -> Result<Vec<Entity>, StoreError>;

    /// Persist a garden state. Re-persisting the same tick overwrites.
    async fn save_garden_state(&self, state: &GardenState)
    -> Result<GardenStateId, StoreError>;

    /// Upsert entity rows by id.
    async fn save_entities(&self, entities: &[Entity]) -> Result<(), StoreError>;

    /// Mark entities dead as of `tick` (defensive second write on commit).
    async fn mark_entities_dead(&self, ids: &[EntityId], tick: u64)
    -> Result<(), StoreError>;

    /// Delete any events previously buffered for a tick (retry hygiene).
    async fn delete_events_by_tick(&self, tick: u64) -> Result<(), StoreError>;

    /// Append a tick's events.
    async fn save_events(&self, events: &[SimulationEvent]) -> Result<(), StoreError>;

    /// Advance the high-water mark. Always the last write of a commit.
    async fn set_last_completed_tick(&self, tick: u64) -> Result<(), StoreError>;
}
