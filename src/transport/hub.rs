// ==========================================
// Chem Procure - Chat Broadcast Hub
// ==========================================
// Server-push fan-out for the chat UI: every subscriber gets every
// inbound message, best-effort and at most once, with periodic
// keepalive pulses. Closed subscribers are pruned automatically when
// their receiver drops.
//
// The hub is owned by the transport layer and injected where needed;
// the lifecycle engine never touches it.
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// Event pushed to chat subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Sent to a listener right after it subscribes.
    Connected,
    /// Keepalive pulse.
    Ping,
    /// Inbound chat message fanned out to everyone.
    Message { message: String },
}

pub struct MessageHub {
    tx: broadcast::Sender<ChatEvent>,
}

impl MessageHub {
    /// `capacity` is the per-subscriber buffer; a listener that lags
    /// behind it loses the oldest events (delivery is best-effort, no
    /// replay).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a listener. The Connected event is delivered through
    /// the returned receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        let rx = self.tx.subscribe();
        // Ignore send failure: it only means nobody is listening.
        let _ = self.tx.send(ChatEvent::Connected);
        rx
    }

    /// Fan a message out to every live listener. Returns how many
    /// listeners were subscribed at send time (0 when nobody is).
    pub fn publish(&self, message: impl Into<String>) -> usize {
        let delivered = self
            .tx
            .send(ChatEvent::Message {
                message: message.into(),
            })
            .unwrap_or(0);
        debug!(delivered, "chat message fanned out");
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Spawn the keepalive pulse task. Abort the returned handle to
    /// stop it.
    pub fn spawn_keepalive(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = tx.send(ChatEvent::Ping);
            }
        })
    }
}

impl Default for MessageHub {
    fn default() -> Self {
        // Plenty for a UI polling at a few-second cadence.
        Self::new(64)
    }
}
