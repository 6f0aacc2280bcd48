//! Event consumers installed by the server.
//!
//! Every lifecycle event is written to the log under the `score::events` target. When `SCORE_EVENT_WEBHOOK_URL` is
//! set, events are also POSTed to that URL as JSON. Webhook failures are logged and the event is not retried.
use std::{future::Future, pin::Pin};

use log::*;
use reqwest::Client;
use score_engine::events::{EventHooks, EventMessage, MatchEvent};

const EVENT_LOG_TARGET: &str = "score::events";

pub fn create_event_hooks(webhook_url: Option<&str>) -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_match_created(|ev| log_event(ev.to_message()));
    hooks.on_score_updated(|ev| log_event(ev.to_message()));
    hooks.on_match_closed(|ev| log_event(ev.to_message()));
    if let Some(url) = webhook_url {
        info!("📬️ Lifecycle events will be forwarded to a webhook");
        let webhook = WebhookPublisher::new(url);
        let w = webhook.clone();
        hooks.on_match_created(move |ev| w.publish(&ev));
        let w = webhook.clone();
        hooks.on_score_updated(move |ev| w.publish(&ev));
        hooks.on_match_closed(move |ev| webhook.publish(&ev));
    }
    hooks
}

fn log_event(message: EventMessage) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    match serde_json::to_string(&message) {
        Ok(json) => info!(target: EVENT_LOG_TARGET, "[{}] {json}", message.routing_key),
        Err(e) => warn!(target: EVENT_LOG_TARGET, "📬️ Could not serialize {} event. {e}", message.routing_key),
    }
    Box::pin(async {})
}

/// Sends events to an HTTP endpoint. Clones share a connection pool.
#[derive(Clone)]
pub struct WebhookPublisher {
    client: Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: &str) -> Self {
        Self { client: Client::new(), url: url.to_string() }
    }

    pub fn publish<E: MatchEvent>(&self, event: &E) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let client = self.client.clone();
        let url = self.url.clone();
        let message = event.to_message();
        Box::pin(async move {
            let result = client
                .post(&url)
                .header("X-Routing-Key", message.routing_key.as_str())
                .json(&message)
                .send()
                .await
                .and_then(|r| r.error_for_status());
            match result {
                Ok(_) => debug!("📬️ Delivered {} for match #{} to webhook", message.routing_key, message.payload.id),
                Err(e) => warn!(
                    "📬️ Could not deliver {} for match #{} to webhook. {e}",
                    message.routing_key, message.payload.id
                ),
            }
        })
    }
}
