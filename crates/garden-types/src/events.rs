//! Simulation events and the tick-local event buffer.
//!
//! Behaviors never write events to storage directly. Everything lands in a
//! per-tick [`EventBuffer`] which the orchestrator flushes as part of the
//! atomic commit. Buffer order is emission order; within a tick that is the
//! canonical event order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventKind, Severity};
use crate::ids::{EntityId, EventId, GardenStateId};

/// One typed narrative event, consumed downstream by text renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// The committed garden state this event belongs to.
    pub garden_state_id: GardenStateId,
    /// The tick the event occurred in.
    pub tick: u64,
    /// Real-world timestamp at emission.
    pub timestamp: DateTime<Utc>,
    /// The event category.
    pub kind: EventKind,
    /// Pre-rendered, renderer-independent description.
    pub description: String,
    /// Entities the event is about, in relevance order.
    pub entities_affected: Vec<EntityId>,
    /// Lowercased kind tag plus semantic tags (`biology`, `chaos`, ...).
    pub tags: Vec<String>,
    /// How loudly narrators should treat the event.
    pub severity: Severity,
    /// Free-form structured payload for renderers.
    pub metadata: serde_json::Value,
}

/// Tick-local event sink.
///
/// Bound to one tick and one pre-allocated garden state id so events can be
/// stamped before anything is persisted. Append-only; the orchestrator
/// drains it exactly once, inside the commit.
#[derive(Debug)]
pub struct EventBuffer {
    tick: u64,
    garden_state_id: GardenStateId,
    events: Vec<SimulationEvent>,
}

impl EventBuffer {
    /// Create a buffer bound to a tick and its state id.
    pub const fn new(tick: u64, garden_state_id: GardenStateId) -> Self {
        Self {
            tick,
            garden_state_id,
            events: Vec::new(),
        }
    }

    /// The tick this buffer is bound to.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Append an event.
    ///
    /// The kind's own tag is always prepended to `extra_tags`; emission
    /// order is preserved.
    pub fn push(
        &mut self,
        kind: EventKind,
        severity: Severity,
        description: impl Into<String>,
        entities_affected: Vec<EntityId>,
        extra_tags: &[&str],
        metadata: serde_json::Value,
    ) {
        let mut tags = Vec::with_capacity(extra_tags.len() + 1);
        tags.push(String::from(kind.tag()));
        for tag in extra_tags {
            tags.push(String::from(*tag));
        }
        self.events.push(SimulationEvent {
            id: EventId::new(),
            garden_state_id: self.garden_state_id,
            tick: self.tick,
            timestamp: Utc::now(),
            kind,
            description: description.into(),
            entities_affected,
            tags,
            severity,
            metadata,
        });
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Read access to the buffered events, in emission order.
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Whether any buffered event has the given kind.
    pub fn contains_kind(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// Consume the buffer, yielding the events in emission order.
    pub fn into_events(self) -> Vec<SimulationEvent> {
        self.events
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn push_prepends_kind_tag() {
        let mut buffer = EventBuffer::new(7, GardenStateId::new());
        buffer.push(
            EventKind::Birth,
            Severity::Low,
            "a seedling unfurls",
            vec![EntityId::new()],
            &["biology"],
            serde_json::Value::Null,
        );
        let event = &buffer.events()[0];
        assert_eq!(event.tags, vec!["birth", "biology"]);
        assert_eq!(event.tick, 7);
    }

    #[test]
    fn buffer_preserves_emission_order() {
        let mut buffer = EventBuffer::new(1, GardenStateId::new());
        buffer.push(
            EventKind::Birth,
            Severity::Low,
            "first",
            vec![],
            &[],
            serde_json::Value::Null,
        );
        buffer.push(
            EventKind::Death,
            Severity::Medium,
            "second",
            vec![],
            &[],
            serde_json::Value::Null,
        );
        let events = buffer.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "first");
        assert_eq!(events[1].description, "second");
    }

    #[test]
    fn contains_kind_sees_buffered_events() {
        let mut buffer = EventBuffer::new(1, GardenStateId::new());
        assert!(buffer.is_empty());
        buffer.push(
            EventKind::Ambient,
            Severity::Low,
            "the fog sits low",
            vec![],
            &["atmosphere"],
            serde_json::Value::Null,
        );
        assert!(buffer.contains_kind(EventKind::Ambient));
        assert!(!buffer.contains_kind(EventKind::Death));
    }

    #[test]
    fn event_json_roundtrip() {
        let mut buffer = EventBuffer::new(3, GardenStateId::new());
        buffer.push(
            EventKind::Mutation,
            Severity::Low,
            "a trait drifts",
            vec![EntityId::new()],
            &["evolution"],
            serde_json::json!({"trait": "movement_speed", "delta_pct": 4.2}),
        );
        let event = buffer.into_events().remove(0);
        let json = serde_json::to_string(&event).unwrap();
        let back: SimulationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
