// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::error::{ElkError, Result};
use crate::event::{MessageBus, MessageReceiver, ReceivedMessage};
use crate::protocol::Command;
use crate::transport::Transport;

/// Writes commands and pairs requests with their reply telegrams.
///
/// Pairing is "subscribe to the reply code, write the request, wait with a
/// timeout". Every reply is still published to all subscribers.
pub struct CommandEngine<T> {
    transport: T,
    bus: MessageBus,
    response_timeout: Duration,
}

impl<T: Transport> CommandEngine<T> {
    pub fn new(transport: T, bus: MessageBus, response_timeout: Duration) -> Self {
        Self {
            transport,
            bus,
            response_timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Write a command without waiting for a reply.
    pub async fn send(&self, command: &Command) -> Result<()> {
        debug!("Sending command: {}", command.to_wire_string());
        self.transport.send(command.encode()).await
    }

    /// Write a command and wait for its reply telegram.
    ///
    /// Commands without a reply code are written and `Ok(None)` is returned.
    pub async fn request(&self, command: &Command) -> Result<Option<Arc<ReceivedMessage>>> {
        match command.reply_code() {
            Some(reply_code) => self.request_reply(command, reply_code).await.map(Some),
            None => {
                self.send(command).await?;
                Ok(None)
            }
        }
    }

    /// Write a command and wait for a telegram with `reply_code`.
    pub async fn request_reply(
        &self,
        command: &Command,
        reply_code: &str,
    ) -> Result<Arc<ReceivedMessage>> {
        // Subscribe first so a fast reply cannot slip past.
        let rx = self.bus.subscribe_code(reply_code).await;
        self.send(command).await?;
        wait_for_reply(rx, reply_code, self.response_timeout).await
    }

    /// Wait once for the next telegram with this command code.
    pub async fn next_message(&self, code: &str) -> Result<Arc<ReceivedMessage>> {
        let rx = self.bus.subscribe_code(code).await;
        wait_for_reply(rx, code, self.response_timeout).await
    }
}

/// Wait on a per-code receiver, failing with
/// [`ElkError::ResponseTimeout`] when nothing arrives in time.
pub async fn wait_for_reply(
    mut rx: MessageReceiver,
    code: &str,
    wait: Duration,
) -> Result<Arc<ReceivedMessage>> {
    let recv = async {
        loop {
            match rx.recv().await {
                Ok(message) => return Ok(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Reply receiver for {} lagged by {} messages", code, skipped);
                }
                Err(RecvError::Closed) => return Err(ElkError::ChannelClosed),
            }
        }
    };

    match timeout(wait, recv).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Timed out waiting for {}", code);
            Err(ElkError::ResponseTimeout {
                command_code: code.to_string(),
            })
        }
    }
}
