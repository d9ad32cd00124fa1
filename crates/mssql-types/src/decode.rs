//! Decoding of vectors received from SQL Server.
//!
//! Decoders validate the whole value before building a [`Vector`]; any
//! inconsistency between header and payload is reported, never guessed at.

use bytes::Buf;

use crate::encode::{VECTOR_HEADER_LEN, VECTOR_LAYOUT_FORMAT, VECTOR_LAYOUT_VERSION};
use crate::error::TypeError;
use crate::float16::f16_bits_to_f32;
use crate::vector::{Vector, VectorElementType};

/// Decode a natively encoded vector.
pub fn decode_vector(data: &[u8]) -> Result<Vector, TypeError> {
    if data.len() < VECTOR_HEADER_LEN {
        return Err(TypeError::CorruptPayload(format!(
            "{} bytes is shorter than the {VECTOR_HEADER_LEN}-byte header",
            data.len()
        )));
    }

    let mut buf = data;
    let layout_format = buf.get_u8();
    if layout_format != VECTOR_LAYOUT_FORMAT {
        return Err(TypeError::CorruptPayload(format!(
            "unknown layout format 0x{layout_format:02X}"
        )));
    }
    let layout_version = buf.get_u8();
    if layout_version != VECTOR_LAYOUT_VERSION {
        return Err(TypeError::CorruptPayload(format!(
            "unknown layout version 0x{layout_version:02X}"
        )));
    }
    let dimensions = buf.get_u16_le() as usize;
    let element_type = VectorElementType::from_u8(buf.get_u8())?;
    buf.advance(3);

    let expected = dimensions * element_type.size();
    if buf.remaining() != expected {
        return Err(TypeError::CorruptPayload(format!(
            "{dimensions} {element_type} elements need {expected} bytes, got {}",
            buf.remaining()
        )));
    }
    element_type.check_dimensions(dimensions)?;

    let values = match element_type {
        VectorElementType::Float32 => (0..dimensions).map(|_| buf.get_f32_le()).collect(),
        VectorElementType::Float16 => (0..dimensions)
            .map(|_| f16_bits_to_f32(buf.get_u16_le()))
            .collect(),
    };

    Vector::with_element_type(element_type, values)
}

/// Decode a vector sent as a JSON array of numbers.
///
/// The result is always a float32 vector.
pub fn decode_vector_json(text: &str) -> Result<Vector, TypeError> {
    let values: Vec<f64> =
        serde_json::from_str(text).map_err(|e| TypeError::CorruptPayload(e.to_string()))?;

    let mut data = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        // Shortest-form text for f32::MAX parses slightly above it in f64,
        // so only reject what still overflows after rounding.
        let narrowed = value as f32;
        if narrowed.is_infinite() {
            return Err(TypeError::CorruptPayload(format!(
                "element {index} ({value}) is outside the float32 range"
            )));
        }
        data.push(narrowed);
    }

    Vector::new(data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encode::encode_vector_json;

    const ONE_TWO_THREE: &[u8] = &[
        0xA9, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, // header
        0x00, 0x00, 0x80, 0x3F, // 1.0
        0x00, 0x00, 0x00, 0x40, // 2.0
        0x00, 0x00, 0x40, 0x40, // 3.0
    ];

    #[test]
    fn test_decode_float32() {
        let vector = decode_vector(ONE_TWO_THREE).unwrap();
        assert_eq!(vector.element_type(), VectorElementType::Float32);
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_decode_float16() {
        let data = [
            0xA9, 0x01, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x80,
        ];
        let vector = decode_vector(&data).unwrap();
        assert_eq!(vector.element_type(), VectorElementType::Float16);
        assert_eq!(vector.as_slice()[0], 1.0);
        assert!(vector.as_slice()[1] == 0.0 && vector.as_slice()[1].is_sign_negative());
    }

    #[test]
    fn test_short_header_is_corrupt() {
        assert!(matches!(
            decode_vector(&ONE_TWO_THREE[..7]),
            Err(TypeError::CorruptPayload(_))
        ));
        assert!(decode_vector(&[]).is_err());
    }

    #[test]
    fn test_bad_layout_bytes_are_corrupt() {
        let mut data = ONE_TWO_THREE.to_vec();
        data[0] = 0xAA;
        assert!(matches!(
            decode_vector(&data),
            Err(TypeError::CorruptPayload(_))
        ));

        let mut data = ONE_TWO_THREE.to_vec();
        data[1] = 0x02;
        assert!(matches!(
            decode_vector(&data),
            Err(TypeError::CorruptPayload(_))
        ));
    }

    #[test]
    fn test_unknown_element_type() {
        let mut data = ONE_TWO_THREE.to_vec();
        data[4] = 0x02;
        assert_eq!(
            decode_vector(&data).unwrap_err(),
            TypeError::UnsupportedElementType(0x02)
        );
    }

    #[test]
    fn test_payload_length_mismatch() {
        assert!(matches!(
            decode_vector(&ONE_TWO_THREE[..19]),
            Err(TypeError::CorruptPayload(_))
        ));

        let mut data = ONE_TWO_THREE.to_vec();
        data.push(0x00);
        assert!(matches!(
            decode_vector(&data),
            Err(TypeError::CorruptPayload(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let data = [0xA9, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            decode_vector(&data).unwrap_err(),
            TypeError::InvalidDimensions {
                dimensions: 0,
                min: 1,
                max: 1998
            }
        );
    }

    #[test]
    fn test_too_many_dimensions_rejected() {
        let mut data = vec![0xA9, 0x01, 0xCF, 0x07, 0x00, 0x00, 0x00, 0x00]; // 1999
        data.resize(8 + 1999 * 4, 0);
        assert!(matches!(
            decode_vector(&data),
            Err(TypeError::InvalidDimensions {
                dimensions: 1999,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_json() {
        let vector = decode_vector_json("[1.0, 2, -3.5e0]").unwrap();
        assert_eq!(vector.element_type(), VectorElementType::Float32);
        assert_eq!(vector.as_slice(), &[1.0, 2.0, -3.5]);
    }

    #[test]
    fn test_decode_json_errors() {
        for text in ["", "[1.0,", "{\"a\":1}", "[1.0, \"x\"]", "[null]", "[1e39]"] {
            assert!(
                matches!(decode_vector_json(text), Err(TypeError::CorruptPayload(_))),
                "{text:?}"
            );
        }
        assert!(matches!(
            decode_vector_json("[]"),
            Err(TypeError::InvalidDimensions { dimensions: 0, .. })
        ));
    }

    #[test]
    fn test_json_float32_extremes() {
        let vector = Vector::new(vec![f32::MAX, -f32::MAX, f32::MIN_POSITIVE]).unwrap();
        let text = encode_vector_json(&vector).unwrap();
        assert_eq!(decode_vector_json(&text).unwrap().as_slice(), vector.as_slice());

        // Server rendering uses a three-digit exponent.
        let vector = decode_vector_json("[3.4028235e+038,-3.4028235e+038]").unwrap();
        assert_eq!(vector.as_slice(), &[f32::MAX, -f32::MAX]);
    }

    #[test]
    fn test_json_round_trip() {
        let vector = Vector::new(vec![0.1, -1.0, 1e-30, 1e30, 123.456]).unwrap();
        let text = encode_vector_json(&vector).unwrap();
        assert!(decode_vector_json(&text).unwrap().approx_eq(&vector));
    }
}
