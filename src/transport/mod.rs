// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

pub mod codec;
pub mod command;
pub mod direct;

use crate::error::Result;

/// Trait for transport implementations.
///
/// The command engine writes through this seam, so request/reply handling
/// can be exercised without a socket.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Write one framed telegram.
    async fn send(&self, telegram: String) -> Result<()>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<()>;

    /// Whether the transport is currently connected.
    async fn is_connected(&self) -> bool;
}
