//! In-memory implementation of the persistence contract.
//!
//! Semantically identical to the `PostgreSQL` store, including the
//! conditional lock acquisition with TTL expiry and the decomposable-dead
//! query. Entity iteration order is by id, so a run against this store is
//! deterministic given the same input state and seed.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use garden_types::entity::Entity;
use garden_types::events::SimulationEvent;
use garden_types::ids::{EntityId, GardenStateId};
use garden_types::state::GardenState;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::GardenStore;

#[derive(Debug, Default)]
struct MemoryInner {
    last_completed_tick: u64,
    lock_owner: Option<String>,
    lock_expires_at: Option<DateTime<Utc>>,
    states: BTreeMap<u64, GardenState>,
    entities: BTreeMap<EntityId, Entity>,
    events: Vec<SimulationEvent>,
}

/// An in-process [`GardenStore`] over maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store: no states, no entities, high-water mark 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/diagnostic helper: all events recorded for a tick, in order.
    pub async fn events_by_tick(&self, tick: u64) -> Vec<SimulationEvent> {
        let inner = self.inner.lock().await;
        inner
            .events
            .iter()
            .filter(|e| e.tick == tick)
            .cloned()
            .collect()
    }

    /// Test/diagnostic helper: one entity by id.
    pub async fn entity_by_id(&self, id: EntityId) -> Option<Entity> {
        let inner = self.inner.lock().await;
        inner.entities.get(&id).cloned()
    }

    /// Test/diagnostic helper: every stored entity.
    pub async fn all_entities(&self) -> Vec<Entity> {
        let inner = self.inner.lock().await;
        inner.entities.values().cloned().collect()
    }

    /// Test/diagnostic helper: number of committed states.
    pub async fn state_count(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.states.len()
    }

    /// Test/diagnostic helper: who currently holds the lock.
    pub async fn lock_holder(&self) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.lock_owner.clone()
    }
}

#[async_trait]
impl GardenStore for MemoryStore {
    async fn last_completed_tick(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().await.last_completed_tick)
    }

    async fn try_acquire_lock(
        &self,
        owner: &str,
        now: DateTime<Utc>,
        ttl_ms: u64,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        let held = inner.lock_owner.is_some()
            && inner.lock_expires_at.is_some_and(|expires| expires > now);
        if held {
            return Ok(false);
        }
        inner.lock_owner = Some(owner.to_owned());
        inner.lock_expires_at =
            Some(now + Duration::milliseconds(i64::try_from(ttl_ms).unwrap_or(i64::MAX)));
        Ok(true)
    }

    async fn release_lock(&self, owner: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.lock_owner.as_deref() == Some(owner) {
            inner.lock_owner = None;
            inner.lock_expires_at = None;
        }
        Ok(())
    }

    async fn garden_state_by_tick(
        &self,
        tick: u64,
    ) -> Result<Option<GardenState>, StoreError> {
        Ok(self.inner.lock().await.states.get(&tick).cloned())
    }

    async fn latest_garden_state(&self) -> Result<Option<GardenState>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.states.values().next_back().cloned())
    }

    async fn living_entities(&self) -> Result<Vec<Entity>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .entities
            .values()
            .filter(|e| e.is_alive)
            .cloned()
            .collect())
    }

    async fn decomposable_dead_entities(&self) -> Result<Vec<Entity>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .entities
            .values()
            .filter(|e| e.is_decomposable())
            .cloned()
            .collect())
    }

    async fn save_garden_state(
        &self,
        state: &GardenState,
    ) -> Result<GardenStateId, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.states.insert(state.tick, state.clone());
        Ok(state.id)
    }

    async fn save_entities(&self, entities: &[Entity]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        for entity in entities {
            inner.entities.insert(entity.id, entity.clone());
        }
        Ok(())
    }

    async fn mark_entities_dead(
        &self,
        ids: &[EntityId],
        tick: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        for id in ids {
            if let Some(entity) = inner.entities.get_mut(id) {
                entity.is_alive = false;
                if entity.death_tick.is_none() {
                    entity.death_tick = Some(tick);
                }
            }
        }
        Ok(())
    }

    async fn delete_events_by_tick(&self, tick: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.events.retain(|e| e.tick != tick);
        Ok(())
    }

    async fn save_events(&self, events: &[SimulationEvent]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.events.extend(events.iter().cloned());
        Ok(())
    }

    async fn set_last_completed_tick(&self, tick: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.last_completed_tick = tick;
        Ok(())
    }
}
