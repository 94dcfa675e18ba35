// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client
//
//! # elk-m1-bridge
//!
//! Client for the Elk M1 security panel's ASCII protocol, spoken over TCP
//! by the M1XEP Ethernet module.
//!
//! Incoming lines are decoded into an [`Envelope`] (length, command code,
//! direction, label, payload) plus a typed [`MessageData`] record for the
//! codes that have one (`AR`, `AS`, `IC`, `KC`, `ZC`). Outgoing commands
//! (arming, status requests, speech) are framed with the M1 length prefix
//! and checksum.
//!
//! ## Quick Start
//!
//! ```no_run
//! use elk_m1_bridge::{ArmOptions, ElkConfig, ElkPanel, PanelEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ElkConfig::builder()
//!         .host("192.168.1.2")
//!         .port(2000)
//!         .user_code("1234")
//!         .build();
//!
//!     let panel = ElkPanel::connect(config).await?;
//!
//!     let mut events = panel.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             if let PanelEvent::Message(msg) = event {
//!                 println!("{} {}", msg.envelope.command_code, msg.envelope.label);
//!             }
//!         }
//!     });
//!
//!     panel.arm_away(ArmOptions::default()).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     panel.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! Decoding works without a connection:
//!
//! ```
//! use elk_m1_bridge::{decode, LookupTables, MessageData};
//!
//! let tables = LookupTables::elk_m1();
//! let envelope = decode("0AZC012100CB\r\n", &tables);
//! assert_eq!(envelope.command_code, "ZC");
//! assert!(matches!(envelope.data, MessageData::ZoneChange(_)));
//! ```

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod message;
pub mod panel;
pub mod protocol;
pub mod tables;
pub mod telegram;
pub mod transport;

// Re-exports for convenience
pub use config::{ElkConfig, ElkConfigBuilder};
pub use error::{ElkError, Result};
pub use event::{EventReceiver, MessageBus, MessageReceiver, PanelEvent, ReceivedMessage};
pub use message::{
    AlarmReport, AreaStatus, ArmingStatus, InvalidUserCode, KeypadChange, MessageData, ZoneChange,
};
pub use panel::ElkPanel;
pub use protocol::{ArmMode, ArmOptions, Command};
pub use tables::LookupTables;
pub use telegram::{decode, Direction, Envelope};
