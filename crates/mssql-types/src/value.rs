//! SQL value representation.

use bytes::Bytes;

use crate::vector::Vector;

/// A value exchanged with the statement layer.
///
/// Vectors appear either already decoded ([`SqlValue::Vector`]) or in their
/// wire form: `Binary` for the native layout, `String` for JSON text. Which
/// wire form a session uses is fixed at login (see
/// [`VectorFormat`](crate::VectorFormat)).
#[derive(Debug, Clone)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// String value (NCHAR, NVARCHAR).
    String(String),
    /// Binary value (BINARY, VARBINARY, native VECTOR).
    Binary(Bytes),
    /// Decoded vector value.
    Vector(Vector),
}

impl SqlValue {
    /// Check if the value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the value as a string slice, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as bytes, if it is binary.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a vector, if it is a decoded one.
    #[must_use]
    pub fn as_vector(&self) -> Option<&Vector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Get the SQL type name for this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::String(_) => "NVARCHAR",
            Self::Binary(_) => "VARBINARY",
            Self::Vector(_) => "VECTOR",
        }
    }
}

impl From<Vector> for SqlValue {
    fn from(v: Vector) -> Self {
        Self::Vector(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Bytes> for SqlValue {
    fn from(v: Bytes) -> Self {
        Self::Binary(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
