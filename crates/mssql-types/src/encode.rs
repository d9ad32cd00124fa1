//! Encoding of vectors for transmission to SQL Server.
//!
//! Two encodings exist. The native layout is used when the server
//! acknowledged VECTOR support during login. Field order follows the SQL
//! Server vector binary format (layout byte, version, count, element type):
//!
//! ```text
//! +--------+---------+-------------+--------------+-------------+-----------+
//! | 0xA9   | 0x01    | dims u16 LE | element type | 3 reserved  | elements  |
//! +--------+---------+-------------+--------------+-------------+-----------+
//! ```
//!
//! Elements are little-endian IEEE-754 values of the element type's width.
//! Against older servers the value travels as a JSON array in an
//! `nvarchar(max)` parameter instead.

use bytes::{BufMut, BytesMut};

use crate::error::TypeError;
use crate::float16::f32_to_f16_bits;
use crate::vector::{Vector, VectorElementType};

/// First header byte of a natively encoded vector.
pub const VECTOR_LAYOUT_FORMAT: u8 = 0xA9;

/// Header layout version.
pub const VECTOR_LAYOUT_VERSION: u8 = 0x01;

/// Size of the native header in bytes.
pub const VECTOR_HEADER_LEN: usize = 8;

/// Append the native binary encoding of `vector` to `buf`.
pub fn encode_vector(vector: &Vector, buf: &mut BytesMut) {
    let element_type = vector.element_type();
    buf.reserve(vector.encoded_len());

    buf.put_u8(VECTOR_LAYOUT_FORMAT);
    buf.put_u8(VECTOR_LAYOUT_VERSION);
    // Dimension count is bounded well below u16::MAX at construction.
    buf.put_u16_le(vector.dimensions() as u16);
    buf.put_u8(element_type.as_u8());
    buf.put_bytes(0, 3);

    match element_type {
        VectorElementType::Float32 => {
            for &value in vector.as_slice() {
                buf.put_f32_le(value);
            }
        }
        VectorElementType::Float16 => {
            for &value in vector.as_slice() {
                buf.put_u16_le(f32_to_f16_bits(value));
            }
        }
    }
}

/// Encode `vector` as a JSON array of numbers.
///
/// JSON has no spelling for NaN or infinity, so vectors containing them are
/// rejected rather than sent as `null`.
pub fn encode_vector_json(vector: &Vector) -> Result<String, TypeError> {
    if let Some((index, value)) = vector
        .as_slice()
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(TypeError::NotRepresentable(format!(
            "element {index} is {value}, which JSON cannot express"
        )));
    }

    serde_json::to_string(vector.as_slice()).map_err(|e| TypeError::NotRepresentable(e.to_string()))
}
