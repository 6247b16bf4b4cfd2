//! Change notifications between storefront handles
//!
//! Every repository write publishes a [`ChangeEvent`] on a shared
//! `tokio::sync::broadcast` channel. Handles opened on the same backend (the
//! equivalent of several browser tabs) subscribe to it and refresh their
//! views when another handle changes a key they display.
//!
//! ```text
//! Handle A ── Repository::write() ──▶ EventBus::publish() ──▶ Handle B ChangeFeed
//!                                                          ──▶ Handle C ChangeFeed
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(1024);
//! let mut rx = bus.subscribe();
//!
//! bus.publish(origin, ChangeEvent::Written { key: "storefront:orders".into() });
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{} changed", envelope.event.key());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A mutation of one storage key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A new value was written under the key
    Written { key: String },
    /// The key was removed
    Removed { key: String },
}

impl ChangeEvent {
    /// The storage key this event relates to
    pub fn key(&self) -> &str {
        match self {
            ChangeEvent::Written { key } | ChangeEvent::Removed { key } => key,
        }
    }

    /// The action name (written, removed)
    pub fn action(&self) -> &str {
        match self {
            ChangeEvent::Written { .. } => "written",
            ChangeEvent::Removed { .. } => "removed",
        }
    }
}

/// Envelope wrapping a change event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// The handle that made the change
    pub origin: Uuid,
    /// The actual event
    pub event: ChangeEvent,
}

impl EventEnvelope {
    pub fn new(origin: Uuid, event: ChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            origin,
            event,
        }
    }
}

/// Broadcast-based event bus shared by all handles on one backend
///
/// Cheap to clone (the sender is reference counted).
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. With no subscribers the event is dropped. Returns the
    /// number of receivers that will see it.
    pub fn publish(&self, origin: Uuid, event: ChangeEvent) -> usize {
        let envelope = EventEnvelope::new(origin, event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::Written {
            key: "storefront:orders".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "written");
        assert_eq!(json["key"], "storefront:orders");
    }

    #[test]
    fn test_event_accessors() {
        let event = ChangeEvent::Removed {
            key: "storefront:cart".to_string(),
        };
        assert_eq!(event.key(), "storefront:cart");
        assert_eq!(event.action(), "removed");
    }

    #[test]
    fn test_envelope_roundtrip() {
        let origin = Uuid::new_v4();
        let envelope = EventEnvelope::new(
            origin,
            ChangeEvent::Written {
                key: "k".to_string(),
            },
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let back: EventEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, envelope.id);
        assert_eq!(back.origin, origin);
        assert_eq!(back.event, envelope.event);
    }

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let origin = Uuid::new_v4();

        let receivers = bus.publish(
            origin,
            ChangeEvent::Written {
                key: "storefront:orders".to_string(),
            },
        );
        assert_eq!(receivers, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.origin, origin);
        assert_eq!(received.event.key(), "storefront:orders");
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_same_envelope() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.publish(
            Uuid::new_v4(),
            ChangeEvent::Removed {
                key: "k".to_string(),
            },
        );

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        let receivers = bus.publish(
            Uuid::new_v4(),
            ChangeEvent::Written {
                key: "k".to_string(),
            },
        );
        assert_eq!(receivers, 0);
    }

    #[test]
    fn test_clone_shares_channel() {
        let bus = EventBus::new(16);
        let _rx = bus.subscribe();
        let bus2 = bus.clone();
        assert_eq!(bus2.receiver_count(), 1);
    }
}
