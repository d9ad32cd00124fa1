#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mssql_types::{
    Vector, VectorElementType, decode_vector, decode_vector_json, encode_vector_json,
    float16::round_to_f16, floats_approx_eq,
};

/// Arbitrary vector contents for round-trip fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzVector {
    half: bool,
    values: Vec<f32>,
}

fuzz_target!(|input: FuzzVector| {
    let element_type = if input.half {
        VectorElementType::Float16
    } else {
        VectorElementType::Float32
    };
    let Ok(vector) = Vector::with_element_type(element_type, input.values) else {
        return;
    };

    let decoded = decode_vector(&vector.to_bytes()).unwrap();
    assert_eq!(decoded.dimensions(), vector.dimensions());
    for (got, want) in decoded.as_slice().iter().zip(vector.as_slice()) {
        let want = match element_type {
            VectorElementType::Float32 => *want,
            VectorElementType::Float16 => round_to_f16(*want),
        };
        assert!(got.to_bits() == want.to_bits() || (got.is_nan() && want.is_nan()));
    }

    if let Ok(text) = encode_vector_json(&vector) {
        let back = decode_vector_json(&text).unwrap();
        assert!(floats_approx_eq(back.as_slice(), vector.as_slice()));
    }
});
