#![no_main]

use libfuzzer_sys::fuzz_target;
use mssql_types::{decode_vector, decode_vector_json};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode to the same length.
    if let Ok(vector) = decode_vector(data) {
        assert_eq!(vector.encoded_len(), data.len());
        assert_eq!(vector.to_bytes().len(), data.len());
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_vector_json(text);
    }
});
