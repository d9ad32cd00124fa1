#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use mssql_client::{Config, Session, VectorTypeSupport};
use tds_protocol::{ByteReader, FeatureExtAck};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Parsing stops at the terminator and never reads past it.
    let mut reader = ByteReader::new(bytes.clone());
    if let Ok(ack) = FeatureExtAck::decode(&mut reader) {
        assert!(reader.position() <= data.len());
        assert_eq!(data[reader.position() - 1], FeatureExtAck::TERMINATOR);
        for feature in ack.iter() {
            assert!(ack.contains(feature.feature_id()));
        }
    }

    // Session establishment fails exactly when parsing does.
    let config = Config::new().vector_type_support(VectorTypeSupport::V1);
    let parsed = FeatureExtAck::decode_bytes(bytes.clone()).is_ok();
    assert_eq!(Session::establish(config, bytes).is_ok(), parsed);
});
