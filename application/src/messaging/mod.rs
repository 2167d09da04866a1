//! In-process messaging: the publish/subscribe bus and its recorder.

pub mod bus;
pub mod event_log;

pub use bus::{HandlerError, MessageBus, Subscription, SubscriptionGuard};
pub use event_log::{EventLog, EventRecord, forward_to_logger};
