//! Client error types.

use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol error while reading handshake data.
    #[error("protocol error: {0}")]
    Protocol(#[from] tds_protocol::ProtocolError),

    /// Type conversion error.
    #[error("type error: {0}")]
    Type(#[from] mssql_types::TypeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if the connection that produced this error must be dropped.
    ///
    /// Protocol errors come from the login handshake; the negotiated
    /// capabilities are unknown afterwards. Type errors affect one value only.
    #[must_use]
    pub fn is_connection_fatal(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Check if this error indicates a protocol/driver bug.
    ///
    /// Protocol errors typically indicate a malformed server response or a
    /// bug in the driver rather than a user error.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
