//! Bus traffic recorder.
//!
//! [`EventLog`] subscribes to `"*"` and keeps every message (bounded, oldest
//! dropped first) so a session's history can be queried after the fact.
//! [`forward_to_logger`] streams bus traffic to an [`EventLogger`] instead,
//! without keeping anything in memory.

use super::bus::{MessageBus, Subscription};
use crate::ports::event_logger::{EventLogger, RunEvent};
use chrono::{DateTime, Utc};
use mcp_domain::{Message, event_types};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub message: Message,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EventLog {
    records: Arc<Mutex<VecDeque<EventRecord>>>,
    capacity: usize,
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Start recording everything published on `bus`.
    pub fn attach(bus: &MessageBus) -> (Self, Subscription) {
        Self::attach_with_capacity(bus, Self::DEFAULT_CAPACITY)
    }

    pub fn attach_with_capacity(bus: &MessageBus, capacity: usize) -> (Self, Subscription) {
        let log = Self {
            records: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        };
        let sink = log.clone();
        let subscription = bus.subscribe(event_types::WILDCARD, move |message| {
            sink.record(message.clone());
            Ok(())
        });
        (log, subscription)
    }

    fn record(&self, message: Message) {
        if let Ok(mut records) = self.records.lock() {
            if records.len() == self.capacity {
                records.pop_front();
            }
            records.push_back(EventRecord {
                message,
                recorded_at: Utc::now(),
            });
        }
    }

    /// Records in publish order, optionally filtered.
    pub fn query(
        &self,
        correlation_id: Option<&str>,
        message_type: Option<&str>,
    ) -> Vec<EventRecord> {
        let Ok(records) = self.records.lock() else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|r| correlation_id.is_none_or(|id| r.message.correlation_id == id))
            .filter(|r| message_type.is_none_or(|t| r.message.message_type == t))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Forward every bus message to `logger` as a `bus_message` event, except
/// the types listed in `skip`.
pub fn forward_to_logger(
    bus: &MessageBus,
    logger: Arc<dyn EventLogger>,
    skip: &[&str],
) -> Subscription {
    let skip: Vec<String> = skip.iter().map(|t| t.to_string()).collect();
    bus.subscribe(event_types::WILDCARD, move |message| {
        if !skip.contains(&message.message_type) {
            logger.log(RunEvent::new("bus_message", serde_json::to_value(message)?));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    struct RecordingLogger(Mutex<Vec<Value>>);

    impl EventLogger for RecordingLogger {
        fn log(&self, event: RunEvent) {
            assert_eq!(event.event_type, "bus_message");
            self.0.lock().unwrap().push(event.payload);
        }
    }

    #[test]
    fn test_records_and_filters_by_correlation() {
        let bus = MessageBus::new();
        let (log, _sub) = EventLog::attach(&bus);

        bus.publish(Message::new("step_started", json!({}), "s1"));
        bus.publish(Message::new("step_started", json!({}), "s2"));
        bus.publish(Message::new("step_completed", json!({}), "s1"));

        assert_eq!(log.len(), 3);
        let s1 = log.query(Some("s1"), None);
        assert_eq!(s1.len(), 2);
        assert_eq!(s1[1].message.message_type, "step_completed");
        assert_eq!(log.query(None, Some("step_started")).len(), 2);
        assert_eq!(log.query(Some("s2"), Some("step_completed")).len(), 0);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let bus = MessageBus::new();
        let (log, _sub) = EventLog::attach_with_capacity(&bus, 2);

        for id in ["a", "b", "c"] {
            bus.publish(Message::new("x", json!({}), id));
        }

        let ids: Vec<_> = log
            .query(None, None)
            .into_iter()
            .map(|r| r.message.correlation_id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_forwarding_skips_listed_types() {
        let bus = MessageBus::new();
        let logger = Arc::new(RecordingLogger(Mutex::new(Vec::new())));
        let sub = forward_to_logger(
            &bus,
            logger.clone(),
            &[event_types::STEP_STARTED, event_types::STEP_COMPLETED],
        );

        bus.publish(Message::new(event_types::STEP_STARTED, json!({}), "s1"));
        bus.publish(Message::new(event_types::REVIEW_REQUESTED, json!({"step": "c"}), "s1"));
        bus.publish(Message::new(event_types::STEP_COMPLETED, json!({}), "s1"));
        sub.unsubscribe();
        bus.publish(Message::new(event_types::DEBATE_RESULT, json!({}), "s1"));

        let logged = logger.0.lock().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0]["type"], "review_requested");
        assert_eq!(logged[0]["payload"]["step"], "c");
    }
}
