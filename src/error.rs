// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

/// All errors that can occur in the elk-m1-bridge library.
///
/// Decoding never produces one of these: malformed telegrams degrade to a
/// partially populated [`Envelope`](crate::telegram::Envelope) instead.
#[derive(Debug, thiserror::Error)]
pub enum ElkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection to M1XEP failed! ({host}:{port})")]
    ConnectionRefused { host: String, port: u16 },

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("The Elk M1XEP failed to respond (waiting for {command_code})")]
    ResponseTimeout { command_code: String },

    #[error("The connection to the Elk M1 has been lost")]
    Disconnected,

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Invalid arm mode: {mode}")]
    InvalidArmMode { mode: String },

    #[error("Invalid area: {area} (must be 1-8)")]
    InvalidArea { area: u8 },

    #[error("Invalid user code: must be 1-6 digits")]
    InvalidUserCode,

    #[error("Line exceeds {limit} bytes without a terminator")]
    LineTooLong { limit: usize },
}

impl ElkError {
    /// Whether this error is transient and the connection should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ElkError::Io(_)
                | ElkError::ConnectionRefused { .. }
                | ElkError::ConnectionTimeout
                | ElkError::Disconnected
                | ElkError::ChannelClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, ElkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ElkError::ConnectionTimeout.is_retryable());
        assert!(ElkError::Disconnected.is_retryable());
        assert!(ElkError::ConnectionRefused {
            host: "10.0.0.1".to_string(),
            port: 2000
        }
        .is_retryable());
        assert!(!ElkError::InvalidUserCode.is_retryable());
        assert!(!ElkError::ResponseTimeout {
            command_code: "AS".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_messages() {
        let err = ElkError::ResponseTimeout {
            command_code: "AZ".to_string(),
        };
        assert!(err.to_string().starts_with("The Elk M1XEP failed to respond"));
        assert_eq!(
            ElkError::Disconnected.to_string(),
            "The connection to the Elk M1 has been lost"
        );
    }
}
