// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::time::Duration;

use crate::protocol::ArmMode;

/// Configuration for connecting to an Elk M1XEP.
#[derive(Debug, Clone)]
pub struct ElkConfig {
    /// M1XEP IP address or hostname
    pub host: String,
    /// M1XEP non-secure ASCII port (default: 2000)
    pub port: u16,
    /// Mode used by [`ElkPanel::arm`](crate::panel::ElkPanel::arm)
    pub default_arm_mode: ArmMode,
    /// How long to wait for a reply telegram, in milliseconds
    pub response_timeout_ms: u64,
    /// Area used when an arming call does not name one (1-8)
    pub area: u8,
    /// User code used when an arming call does not supply one
    pub user_code: String,
    /// Reconnection delay in milliseconds (base delay for exponential backoff)
    pub reconnect_delay_ms: u64,
    /// Maximum number of connection retries on transient errors (0 = no retries)
    pub max_connect_retries: u32,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Capacity of the event broadcast channels
    pub event_capacity: usize,
    /// Longest line accepted from the panel before it is discarded
    pub max_line_length: usize,
}

impl Default for ElkConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.2".to_string(),
            port: 2000,
            default_arm_mode: ArmMode::Away,
            response_timeout_ms: 3000,
            area: 1,
            user_code: String::new(),
            reconnect_delay_ms: 5000,
            max_connect_retries: 3,
            connect_timeout_ms: 10000,
            event_capacity: 256,
            max_line_length: 1024,
        }
    }
}

impl ElkConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> ElkConfigBuilder {
        ElkConfigBuilder::default()
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Backoff before connection attempt `attempt` (1-based retry count).
    /// Doubles per attempt, capped at 16x the base delay.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(4);
        Duration::from_millis(self.reconnect_delay_ms.saturating_mul(1 << shift))
    }
}

/// Builder for ElkConfig.
#[derive(Debug, Clone, Default)]
pub struct ElkConfigBuilder {
    config: ElkConfig,
}

impl ElkConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn default_arm_mode(mut self, mode: ArmMode) -> Self {
        self.config.default_arm_mode = mode;
        self
    }

    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    pub fn area(mut self, area: u8) -> Self {
        self.config.area = area;
        self
    }

    pub fn user_code(mut self, code: impl Into<String>) -> Self {
        self.config.user_code = code.into();
        self
    }

    pub fn reconnect_delay_ms(mut self, ms: u64) -> Self {
        self.config.reconnect_delay_ms = ms;
        self
    }

    pub fn max_connect_retries(mut self, retries: u32) -> Self {
        self.config.max_connect_retries = retries;
        self
    }

    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    pub fn build(self) -> ElkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ElkConfig::default();
        assert_eq!(config.host, "192.168.1.2");
        assert_eq!(config.port, 2000);
        assert_eq!(config.default_arm_mode, ArmMode::Away);
        assert_eq!(config.response_timeout(), Duration::from_secs(3));
        assert_eq!(config.area, 1);
        assert!(config.user_code.is_empty());
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_config_builder() {
        let config = ElkConfig::builder()
            .host("10.0.0.5")
            .port(2101)
            .default_arm_mode(ArmMode::Stay)
            .area(3)
            .user_code("1234")
            .response_timeout_ms(500)
            .build();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 2101);
        assert_eq!(config.default_arm_mode, ArmMode::Stay);
        assert_eq!(config.area, 3);
        assert_eq!(config.user_code, "1234");
        assert_eq!(config.response_timeout_ms, 500);
    }

    #[test]
    fn test_reconnect_backoff() {
        let config = ElkConfig::builder().reconnect_delay_ms(100).build();
        assert_eq!(config.reconnect_delay(1), Duration::from_millis(100));
        assert_eq!(config.reconnect_delay(2), Duration::from_millis(200));
        assert_eq!(config.reconnect_delay(3), Duration::from_millis(400));
        assert_eq!(config.reconnect_delay(5), Duration::from_millis(1600));
        assert_eq!(config.reconnect_delay(9), Duration::from_millis(1600));
    }
}
