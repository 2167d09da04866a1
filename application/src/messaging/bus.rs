//! In-process publish/subscribe bus.
//!
//! Delivery is synchronous and best effort: [`MessageBus::publish`] calls
//! every matching handler in subscription order before returning. Handlers
//! must not block; anything slow belongs in a spawned task.
//!
//! ```
//! use mcp_application::MessageBus;
//! use mcp_domain::Message;
//! use std::sync::{Arc, Mutex};
//!
//! let bus = MessageBus::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let sub = bus.subscribe("solution_ready", move |msg: &Message| {
//!     sink.lock().unwrap().push(msg.correlation_id.clone());
//!     Ok(())
//! });
//!
//! bus.publish(Message::new("solution_ready", serde_json::json!({}), "s1"));
//! sub.unsubscribe();
//! bus.publish(Message::new("solution_ready", serde_json::json!({}), "s2"));
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["s1".to_string()]);
//! ```

use mcp_domain::{Message, event_types};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};

/// Error a handler may report. It is logged, never returned to the publisher.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = dyn Fn(&Message) -> Result<(), HandlerError> + Send + Sync;

struct Entry {
    id: u64,
    event_type: String,
    handler: Box<Handler>,
    active: AtomicBool,
}

impl Entry {
    fn matches(&self, message_type: &str) -> bool {
        self.event_type == message_type || self.event_type == event_types::WILDCARD
    }
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    entries: Mutex<Vec<Arc<Entry>>>,
}

impl BusInner {
    fn remove(&self, id: u64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|e| e.id != id);
        }
    }
}

/// Cheaply clonable handle to a shared bus.
#[derive(Clone, Default)]
pub struct MessageBus {
    inner: Arc<BusInner>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_type`, or for every message with `"*"`.
    pub fn subscribe<F>(&self, event_type: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Message) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(Entry {
            id,
            event_type: event_type.into(),
            handler: Box::new(handler),
            active: AtomicBool::new(true),
        });
        debug!("Bus: subscription #{} for '{}'", id, entry.event_type);

        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.push(Arc::clone(&entry));
        }

        Subscription {
            entry: Arc::downgrade(&entry),
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `message` to every handler subscribed to its type or to `"*"`.
    ///
    /// Handler errors and panics are logged and do not stop delivery.
    pub fn publish(&self, message: Message) {
        // Snapshot so handlers can (un)subscribe or publish without deadlocking.
        let snapshot: Vec<Arc<Entry>> = match self.inner.entries.lock() {
            Ok(entries) => entries
                .iter()
                .filter(|e| e.matches(&message.message_type))
                .cloned()
                .collect(),
            Err(_) => {
                warn!("Bus: subscriber list poisoned, dropping '{}'", message.message_type);
                return;
            }
        };

        debug!(
            "Bus: publishing '{}' ({}) to {} handler(s)",
            message.message_type,
            message.correlation_id,
            snapshot.len()
        );

        for entry in snapshot {
            // An unsubscribe from an earlier handler in this loop wins.
            if !entry.active.load(Ordering::Acquire) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| (entry.handler)(&message))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    "Bus: handler #{} for '{}' failed: {}",
                    entry.id, message.message_type, e
                ),
                Err(_) => warn!(
                    "Bus: handler #{} for '{}' panicked",
                    entry.id, message.message_type
                ),
            }
        }
    }

    /// Number of live handlers that would receive a message of this type.
    pub fn subscriber_count(&self, message_type: &str) -> usize {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.iter().filter(|e| e.matches(message_type)).count())
            .unwrap_or(0)
    }
}

/// Handle returned by [`MessageBus::subscribe`].
///
/// Dropping it keeps the handler registered; call [`Subscription::unsubscribe`]
/// to remove it.
pub struct Subscription {
    entry: Weak<Entry>,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Remove exactly this handler. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(entry) = self.entry.upgrade() {
            entry.active.store(false, Ordering::Release);
            if let Some(bus) = self.bus.upgrade() {
                bus.remove(entry.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.entry
            .upgrade()
            .is_some_and(|e| e.active.load(Ordering::Acquire))
    }
}

/// Unsubscribes every held subscription when dropped.
#[derive(Default)]
pub struct SubscriptionGuard {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionGuard {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self { subscriptions }
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}
