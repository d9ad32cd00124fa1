//! Type conversion error types.

use thiserror::Error;

/// Errors that can occur while converting or coding a single value.
///
/// None of these affect the connection; the statement that produced the
/// value fails and the session carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Value is null when non-null was expected.
    #[error("unexpected null value")]
    UnexpectedNull,

    /// Type mismatch during conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: String,
    },

    /// Vector header names an element type this driver cannot decode.
    #[error("unsupported vector element type 0x{0:02X}")]
    UnsupportedElementType(u8),

    /// Encoded vector data is structurally invalid.
    #[error("corrupt vector payload: {0}")]
    CorruptPayload(String),

    /// Dimension count outside what the element type allows.
    #[error("invalid vector dimensions {dimensions}: must be between {min} and {max}")]
    InvalidDimensions {
        /// Dimension count that was rejected.
        dimensions: usize,
        /// Smallest allowed count.
        min: usize,
        /// Largest allowed count for the element type.
        max: usize,
    },

    /// Value cannot be expressed in the target encoding.
    #[error("value not representable: {0}")]
    NotRepresentable(String),
}
