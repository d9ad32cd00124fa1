//! Choice of wire representation for vector values.

use core::fmt;

use crate::decode::{decode_vector, decode_vector_json};
use crate::encode::encode_vector_json;
use crate::error::TypeError;
use crate::value::SqlValue;
use crate::vector::{Vector, VectorElementType};

/// How vectors travel on a given connection.
///
/// Chosen once from the login acknowledgement and applied to every value for
/// the rest of the session. A value in the other representation is rejected
/// rather than decoded, so one connection never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VectorFormat {
    /// Native binary layout in a `vector(n)` column or parameter.
    Native,
    /// JSON array text in an `nvarchar(max)` column or parameter.
    #[default]
    Json,
}

impl VectorFormat {
    /// Encode a vector into its wire value for this format.
    pub fn encode(self, vector: &Vector) -> Result<SqlValue, TypeError> {
        match self {
            Self::Native => Ok(SqlValue::Binary(vector.to_bytes())),
            Self::Json => encode_vector_json(vector).map(SqlValue::String),
        }
    }

    /// Decode a wire value received under this format.
    ///
    /// An already-decoded [`SqlValue::Vector`] is returned as is.
    pub fn decode(self, value: &SqlValue) -> Result<Vector, TypeError> {
        match (self, value) {
            (_, SqlValue::Vector(v)) => Ok(v.clone()),
            (_, SqlValue::Null) => Err(TypeError::UnexpectedNull),
            (Self::Native, SqlValue::Binary(b)) => decode_vector(b),
            (Self::Json, SqlValue::String(s)) => decode_vector_json(s),
            (Self::Native, other) => Err(TypeError::TypeMismatch {
                expected: "VARBINARY",
                actual: other.type_name().to_string(),
            }),
            (Self::Json, other) => Err(TypeError::TypeMismatch {
                expected: "NVARCHAR",
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Parameter type declaration for an RPC call carrying `vector`.
    #[must_use]
    pub fn type_declaration(self, vector: &Vector) -> String {
        match (self, vector.element_type()) {
            (Self::Json, _) => "nvarchar(max)".to_string(),
            (Self::Native, VectorElementType::Float32) => {
                format!("vector({})", vector.dimensions())
            }
            (Self::Native, element_type) => {
                format!("vector({}, {element_type})", vector.dimensions())
            }
        }
    }

    /// Returns true for the native binary format.
    #[must_use]
    pub fn is_native(self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for VectorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Json => f.write_str("json"),
        }
    }
}
