//! Protocol-level error types.

use thiserror::Error;

use crate::feature::FeatureId;

/// Errors raised while decoding TDS handshake data.
///
/// Every variant is fatal for the handshake that produced it: once the
/// feature acknowledgement cannot be read in full, none of the negotiated
/// capabilities can be trusted and the connection must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The buffer ended in the middle of a record.
    #[error("truncated data: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A feature the driver decodes carried a payload of the wrong shape.
    #[error("malformed {feature} acknowledgement: {reason}")]
    MalformedFeatureAck {
        /// Feature whose payload was rejected.
        feature: FeatureId,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A length-prefixed string was not valid UTF-16.
    #[error("invalid UTF-16 string data")]
    InvalidString,
}

impl ProtocolError {
    /// Returns true when the error was caused by running out of input.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
