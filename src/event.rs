// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::telegram::Envelope;

/// A decoded telegram stamped with its arrival metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Time the line was read from the socket
    pub time: DateTime<Utc>,
    /// Local address of the socket
    pub host: String,
    /// Configured panel port
    pub port: u16,
    /// Local port of the socket
    pub remote_port: u16,
}

impl ReceivedMessage {
    pub fn command_code(&self) -> &str {
        &self.envelope.command_code
    }
}

/// All events that can be emitted by the panel.
///
/// Users subscribe via `panel.subscribe()` to receive a
/// `tokio::sync::broadcast::Receiver<PanelEvent>`.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// TCP connection to the M1XEP established
    Connected { host: String, port: u16 },
    /// A telegram was received and decoded
    Message(Arc<ReceivedMessage>),
    /// Socket error; the connection is about to close
    Error(String),
    /// TCP connection closed or lost
    Disconnected(String),
}

/// Type alias for the broadcast sender.
pub type EventSender = broadcast::Sender<PanelEvent>;

/// Type alias for the broadcast receiver.
pub type EventReceiver = broadcast::Receiver<PanelEvent>;

/// Receiver for messages of a single command code.
pub type MessageReceiver = broadcast::Receiver<Arc<ReceivedMessage>>;

/// Create a new event channel with the given capacity.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    broadcast::channel(capacity)
}

/// Fan-out for panel events: one global channel plus one channel per
/// command code, created on first subscription.
#[derive(Debug, Clone)]
pub struct MessageBus {
    events: EventSender,
    by_code: Arc<RwLock<HashMap<String, broadcast::Sender<Arc<ReceivedMessage>>>>>,
    capacity: usize,
}

impl MessageBus {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (events, _) = event_channel(capacity);
        Self {
            events,
            by_code: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// All lifecycle events and messages.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Messages carrying one command code. Codes are case sensitive.
    pub async fn subscribe_code(&self, code: &str) -> MessageReceiver {
        let mut by_code = self.by_code.write().await;
        by_code
            .entry(code.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live receivers for one command code.
    pub async fn code_receiver_count(&self, code: &str) -> usize {
        self.by_code
            .read()
            .await
            .get(code)
            .map_or(0, |tx| tx.receiver_count())
    }

    /// Publish a lifecycle event. Having no subscribers is not an error.
    pub fn emit(&self, event: PanelEvent) {
        let _ = self.events.send(event);
    }

    /// Publish a message on the global channel, then on its code channel.
    pub async fn publish(&self, message: ReceivedMessage) {
        let message = Arc::new(message);
        let _ = self.events.send(PanelEvent::Message(message.clone()));
        let by_code = self.by_code.read().await;
        if let Some(tx) = by_code.get(message.command_code()) {
            let _ = tx.send(message);
        }
    }
}
