// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ElkConfig;
use crate::error::{ElkError, Result};
use crate::event::{EventReceiver, MessageBus, MessageReceiver, PanelEvent, ReceivedMessage};
use crate::protocol::{speech_words, ArmMode, ArmOptions, Command};
use crate::tables::LookupTables;
use crate::transport::command::CommandEngine;
use crate::transport::direct::DirectTcpTransport;
use crate::transport::Transport;

/// The main public API for talking to an Elk M1 through its M1XEP.
///
/// # Example
///
/// ```no_run
/// use elk_m1_bridge::{ArmOptions, ElkConfig, ElkPanel, PanelEvent};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ElkConfig::builder()
///         .host("192.168.1.2")
///         .user_code("1234")
///         .build();
///
///     let panel = ElkPanel::connect(config).await?;
///
///     // Zone changes only
///     let mut zones = panel.subscribe_code("ZC").await;
///     tokio::spawn(async move {
///         while let Ok(msg) = zones.recv().await {
///             println!("{}", serde_json::to_string(&*msg).unwrap_or_default());
///         }
///     });
///
///     let status = panel.arming_status_request().await?;
///     println!("Arming status: {:?}", status.envelope.data);
///
///     panel.arm_stay(ArmOptions::default().area(1)).await?;
///
///     tokio::signal::ctrl_c().await?;
///     panel.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct ElkPanel {
    engine: CommandEngine<DirectTcpTransport>,
    config: ElkConfig,
    tables: Arc<LookupTables>,
}

impl ElkPanel {
    /// Connect with the built-in lookup tables.
    ///
    /// Retries on transient errors (refused connections, timeouts, I/O errors)
    /// with exponential backoff. The base delay is `reconnect_delay_ms` from the
    /// config and the maximum number of retries is `max_connect_retries`.
    pub async fn connect(config: ElkConfig) -> Result<Self> {
        let bus = MessageBus::new(config.event_capacity);
        Self::connect_with(config, Arc::new(LookupTables::elk_m1()), bus).await
    }

    /// Connect using caller-supplied tables and event bus. Subscribing to
    /// the bus beforehand also delivers the `Connected` event.
    pub async fn connect_with(
        config: ElkConfig,
        tables: Arc<LookupTables>,
        bus: MessageBus,
    ) -> Result<Self> {
        let max_retries = config.max_connect_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = config.reconnect_delay(attempt);
                warn!(
                    "Connection attempt {} failed, retrying in {:.1}s...",
                    attempt,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }

            match DirectTcpTransport::connect(&config, tables.clone(), bus.clone()).await {
                Ok(transport) => {
                    let engine =
                        CommandEngine::new(transport, bus, config.response_timeout());
                    return Ok(Self {
                        engine,
                        config,
                        tables,
                    });
                }
                Err(e) => {
                    bus.emit(PanelEvent::Error(e.to_string()));
                    if !e.is_retryable() || attempt == max_retries {
                        return Err(e);
                    }
                    warn!("Connection error (attempt {}): {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ElkError::Disconnected))
    }

    /// Subscribe to all panel events.
    pub fn subscribe(&self) -> EventReceiver {
        self.engine.bus().subscribe()
    }

    /// Subscribe to messages with one command code (e.g. `"ZC"`).
    pub async fn subscribe_code(&self, code: &str) -> MessageReceiver {
        self.engine.bus().subscribe_code(code).await
    }

    /// Wait once for the next message with this code, up to the configured
    /// response timeout.
    pub async fn next_message(&self, code: &str) -> Result<Arc<ReceivedMessage>> {
        self.engine.next_message(code).await
    }

    pub fn config(&self) -> &ElkConfig {
        &self.config
    }

    pub fn tables(&self) -> &Arc<LookupTables> {
        &self.tables
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.engine.transport().local_addr()
    }

    pub async fn is_connected(&self) -> bool {
        self.engine.transport().is_connected().await
    }

    // --- Commands ---

    /// Send an arming command. Unset options fall back to the configured
    /// area and user code.
    pub async fn arm_with_mode(&self, mode: ArmMode, options: ArmOptions) -> Result<()> {
        let area = options.area.unwrap_or(self.config.area);
        let code = options
            .code
            .unwrap_or_else(|| self.config.user_code.clone());
        let command = Command::arm(mode, area, &code)?;
        info!("Sending {} for area {}", mode, area);
        self.engine.send(&command).await
    }

    /// Arm with the configured default mode.
    pub async fn arm(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(self.config.default_arm_mode, options)
            .await
    }

    pub async fn disarm(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::Disarm, options).await
    }

    pub async fn arm_away(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::Away, options).await
    }

    pub async fn arm_stay(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::Stay, options).await
    }

    pub async fn arm_stay_instant(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::StayInstant, options).await
    }

    pub async fn arm_night(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::Night, options).await
    }

    pub async fn arm_night_instant(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::NightInstant, options).await
    }

    pub async fn arm_vacation(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::Vacation, options).await
    }

    pub async fn arm_step_away(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::StepAway, options).await
    }

    pub async fn arm_step_stay(&self, options: ArmOptions) -> Result<()> {
        self.arm_with_mode(ArmMode::StepStay, options).await
    }

    /// Request arming status and wait for the `AS` reply.
    pub async fn arming_status_request(&self) -> Result<Arc<ReceivedMessage>> {
        debug!("Requesting arming status");
        self.engine
            .request_reply(&Command::ArmingStatusRequest, "AS")
            .await
    }

    /// Request alarm by zone and wait for the `AZ` reply.
    pub async fn alarm_by_zone_request(&self) -> Result<Arc<ReceivedMessage>> {
        debug!("Requesting alarm by zone");
        self.engine
            .request_reply(&Command::AlarmByZoneRequest, "AZ")
            .await
    }

    /// Speak text through the panel, one `sw` telegram per recognised word.
    /// Returns the number of words sent.
    pub async fn speak(&self, text: &str) -> Result<usize> {
        let words = speech_words(text, &self.tables);
        for word in &words {
            self.engine.send(&Command::SpeakWord { word: *word }).await?;
        }
        Ok(words.len())
    }

    /// Close the connection. Emits [`PanelEvent::Disconnected`].
    pub async fn disconnect(&self) -> Result<()> {
        self.engine.transport().disconnect().await
    }
}
