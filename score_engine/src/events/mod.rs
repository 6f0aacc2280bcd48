//! Lifecycle notifications.
//!
//! Every successful mutation in [`crate::MatchLifecycleApi`] publishes one event through [`EventProducers`]. Consumers
//! register async hooks with [`EventHooks`], and each hook runs on its own task behind a bounded channel, so a slow
//! consumer can drop events but can never hold up the API.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
