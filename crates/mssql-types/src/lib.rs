//! # mssql-types
//!
//! SQL Server `VECTOR` values and their wire encodings.
//!
//! A [`Vector`] travels in one of two forms, picked per connection:
//!
//! - **Native**: an 8-byte header followed by little-endian float32 or
//!   float16 elements, used when the server acknowledged VECTOR support.
//! - **JSON**: an array of numbers in an `nvarchar(max)` value, accepted by
//!   every server that can cast JSON text to `vector`.
//!
//! [`VectorFormat`] applies whichever form was negotiated to both directions.
//!
//! ## Type Mappings
//!
//! | SQL Server Type | Rust Type |
//! |-----------------|-----------|
//! | `vector(n)` | [`Vector`], `Vec<f32>`, `Vec<f64>` |
//! | `vector(n, float16)` | [`Vector`] with [`VectorElementType::Float16`] |
//! | nullable `vector` | [`NullVector`], `Option<Vector>` |
//! | `NVARCHAR` | `String` |
//! | `VARBINARY` | `bytes::Bytes` |
//!
//! ```
//! use mssql_types::{Vector, VectorElementType, VectorFormat, decode_vector};
//!
//! let v = Vector::with_element_type(VectorElementType::Float16, vec![1.0, 0.5])?;
//! let wire = VectorFormat::Native.encode(&v)?;
//! let back = decode_vector(wire.as_bytes().unwrap_or_default())?;
//! assert!(back.approx_eq(&v));
//! # Ok::<(), mssql_types::TypeError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod decode;
pub mod encode;
pub mod error;
pub mod float16;
pub mod format;
pub mod from_sql;
pub mod to_sql;
pub mod value;
pub mod vector;

pub use decode::{decode_vector, decode_vector_json};
pub use encode::{
    VECTOR_HEADER_LEN, VECTOR_LAYOUT_FORMAT, VECTOR_LAYOUT_VERSION, encode_vector,
    encode_vector_json,
};
pub use error::TypeError;
pub use format::VectorFormat;
pub use from_sql::FromSql;
pub use to_sql::ToSql;
pub use value::SqlValue;
pub use vector::{MIN_DIMENSIONS, NullVector, Vector, VectorElementType, floats_approx_eq};
