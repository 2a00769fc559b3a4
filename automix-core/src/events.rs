//! Event types for the AutoMix event system
//!
//! Provides the shared event definitions and EventBus used to broadcast
//! finished plans to interested listeners (SSE clients, visualizers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::TransitionPlan;

/// AutoMix event types
///
/// Events are broadcast via the EventBus and serialized for SSE
/// transmission with an internally tagged `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MixEvent {
    /// A sequencing request completed and produced a plan
    ///
    /// Carries the plan and both export renderings so listeners (e.g. a
    /// visualizer) need no follow-up request.
    PlanGenerated {
        /// Preset name the request resolved to
        preset: String,
        /// The finished transition plan
        plan: TransitionPlan,
        /// M3U interchange rendering
        m3u: String,
        /// Text summary rendering
        txt: String,
        /// When the plan was generated
        timestamp: DateTime<Utc>,
    },
}

impl MixEvent {
    /// Event name used as the SSE event field
    pub fn event_name(&self) -> &'static str {
        match self {
            MixEvent::PlanGenerated { .. } => "PlanGenerated",
        }
    }
}

/// Central event distribution bus for application-wide events
///
/// Backed by `tokio::broadcast`:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<MixEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// `capacity` is the number of events buffered before the oldest are
    /// dropped for lagging subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<MixEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`; `Err` means no subscriber is
    /// currently listening, which callers are free to ignore.
    pub fn emit(&self, event: MixEvent) -> Result<usize, broadcast::error::SendError<MixEvent>> {
        self.tx.send(event)
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransitionPlan;

    fn plan_event() -> MixEvent {
        MixEvent::PlanGenerated {
            preset: "classic".to_string(),
            plan: TransitionPlan::empty(),
            m3u: "#EXTM3U".to_string(),
            txt: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        bus.emit(plan_event()).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_name(), "PlanGenerated");
    }

    #[test]
    fn test_emit_without_subscribers_is_an_ignorable_error() {
        let bus = EventBus::new(16);
        assert!(bus.emit(plan_event()).is_err());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(plan_event()).unwrap();
        assert_eq!(json["type"], "PlanGenerated");
        assert_eq!(json["preset"], "classic");
        assert!(json["plan"]["items"].as_array().unwrap().is_empty());
    }
}
