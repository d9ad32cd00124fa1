//! FEATUREEXTACK decoding.
//!
//! After LOGIN7 the server lists the optional features it accepted:
//!
//! ```text
//! FeatureAckData := { FeatureId:1  FeatureAckDataLen:4 (LE)  Data:len }*  0xFF
//! ```
//!
//! Each record the driver understands is decoded into a typed [`FeatureAck`]
//! variant. Records for any other identifier are skipped over using their
//! length prefix and parsing carries on: a newer server acknowledging a
//! feature this driver has never heard of must not break the login.
//!
//! Running out of bytes, or a decoded feature with a payload of the wrong
//! shape, fails the whole acknowledgement. A partially-understood capability
//! set is not safe to act on.

use bytes::Bytes;

use crate::codec::ByteReader;
use crate::error::ProtocolError;
use crate::feature::{FEATURE_TERMINATOR, FeatureId};
use crate::prelude::*;

/// FEDAUTH acknowledgement.
///
/// Present only for the security-token and ADAL workflows. The payload is
/// empty, a 32-byte nonce, or the nonce followed by a 32-byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FedAuthAck {
    /// Server nonce echoed back to the client.
    pub nonce: Option<[u8; 32]>,
    /// Signature over the nonce.
    pub signature: Option<[u8; 32]>,
}

/// COLUMNENCRYPTION acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEncryptionAck {
    /// Negotiated column encryption version (1–3).
    pub version: u8,
    /// Enclave type, sent by servers that support secure enclaves.
    pub enclave_type: Option<String>,
}

impl ColumnEncryptionAck {
    /// Highest column encryption version defined by MS-TDS.
    pub const MAX_VERSION: u8 = 3;

    /// Returns true when the server negotiated an enclave-capable version.
    #[must_use]
    pub fn supports_enclaves(&self) -> bool {
        self.version >= 2
    }
}

/// DATACLASSIFICATION acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataClassificationAck {
    /// Data classification version.
    pub version: u8,
    /// Whether classification metadata will be sent.
    pub enabled: bool,
}

/// A decoded feature acknowledgement.
///
/// One variant per feature whose payload the driver interprets. Adding a
/// feature means adding a variant, which every exhaustive `match` on this
/// type then has to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureAck {
    /// Federated authentication.
    FedAuth(FedAuthAck),
    /// Always Encrypted.
    ColumnEncryption(ColumnEncryptionAck),
    /// Global transactions enabled for the session.
    GlobalTransactions(bool),
    /// Azure SQL support options byte.
    AzureSqlSupport(u8),
    /// Data classification.
    DataClassification(DataClassificationAck),
    /// Server accepted UTF-8 collations.
    Utf8Support(bool),
    /// Azure SQL DNS caching supported.
    AzureSqlDnsCaching(bool),
    /// Native JSON support, with the server's version byte.
    JsonSupport(u8),
    /// Native VECTOR support, with the server's version byte.
    VectorSupport(u8),
}

impl FeatureAck {
    /// Identifier this acknowledgement was received under.
    #[must_use]
    pub fn feature_id(&self) -> FeatureId {
        match self {
            Self::FedAuth(_) => FeatureId::FedAuth,
            Self::ColumnEncryption(_) => FeatureId::ColumnEncryption,
            Self::GlobalTransactions(_) => FeatureId::GlobalTransactions,
            Self::AzureSqlSupport(_) => FeatureId::AzureSqlSupport,
            Self::DataClassification(_) => FeatureId::DataClassification,
            Self::Utf8Support(_) => FeatureId::Utf8Support,
            Self::AzureSqlDnsCaching(_) => FeatureId::AzureSqlDnsCaching,
            Self::JsonSupport(_) => FeatureId::JsonSupport,
            Self::VectorSupport(_) => FeatureId::VectorSupport,
        }
    }

    /// Decode the payload of a feature the driver interprets.
    ///
    /// Returns `Ok(None)` for identifiers without a decoder; the caller skips
    /// those.
    pub fn decode(feature_id: FeatureId, data: Bytes) -> Result<Option<Self>, ProtocolError> {
        let ack = match feature_id {
            FeatureId::FedAuth => Self::FedAuth(decode_fed_auth(&data)?),
            FeatureId::ColumnEncryption => {
                Self::ColumnEncryption(decode_column_encryption(data)?)
            }
            FeatureId::GlobalTransactions => {
                Self::GlobalTransactions(single_byte(feature_id, &data)? != 0)
            }
            FeatureId::AzureSqlSupport => Self::AzureSqlSupport(single_byte(feature_id, &data)?),
            FeatureId::DataClassification => {
                Self::DataClassification(decode_data_classification(&data)?)
            }
            FeatureId::Utf8Support => Self::Utf8Support((single_byte(feature_id, &data)? & 0x01) != 0),
            FeatureId::AzureSqlDnsCaching => {
                Self::AzureSqlDnsCaching(single_byte(feature_id, &data)? != 0)
            }
            FeatureId::JsonSupport => Self::JsonSupport(single_byte(feature_id, &data)?),
            FeatureId::VectorSupport => Self::VectorSupport(single_byte(feature_id, &data)?),
            // Never requested by this driver; the ack carries session state
            // we have no use for.
            FeatureId::SessionRecovery | FeatureId::Unknown(_) => return Ok(None),
        };
        Ok(Some(ack))
    }
}

fn single_byte(feature: FeatureId, data: &[u8]) -> Result<u8, ProtocolError> {
    match data {
        [value] => Ok(*value),
        _ => Err(ProtocolError::MalformedFeatureAck {
            feature,
            reason: "expected a 1-byte payload",
        }),
    }
}

fn decode_fed_auth(data: &[u8]) -> Result<FedAuthAck, ProtocolError> {
    let mut ack = FedAuthAck::default();
    match data.len() {
        0 => {}
        32 | 64 => {
            let mut nonce = [0u8; 32];
            nonce.copy_from_slice(&data[..32]);
            ack.nonce = Some(nonce);
            if data.len() == 64 {
                let mut signature = [0u8; 32];
                signature.copy_from_slice(&data[32..]);
                ack.signature = Some(signature);
            }
        }
        _ => {
            return Err(ProtocolError::MalformedFeatureAck {
                feature: FeatureId::FedAuth,
                reason: "payload must be 0, 32 or 64 bytes",
            });
        }
    }
    Ok(ack)
}

fn decode_column_encryption(data: Bytes) -> Result<ColumnEncryptionAck, ProtocolError> {
    let malformed = |reason| ProtocolError::MalformedFeatureAck {
        feature: FeatureId::ColumnEncryption,
        reason,
    };

    let mut reader = ByteReader::new(data);
    let version = reader
        .read_u8()
        .map_err(|_| malformed("missing version byte"))?;

    if version == 0 || version > ColumnEncryptionAck::MAX_VERSION {
        return Err(malformed("unsupported version"));
    }

    let enclave_type = if version >= 2 && !reader.is_empty() {
        let name = reader
            .read_b_varchar()
            .map_err(|_| malformed("enclave type does not fit the payload"))?;
        Some(name)
    } else {
        None
    };

    if !reader.is_empty() {
        return Err(malformed("unexpected trailing bytes"));
    }

    Ok(ColumnEncryptionAck {
        version,
        enclave_type,
    })
}

fn decode_data_classification(data: &[u8]) -> Result<DataClassificationAck, ProtocolError> {
    match data {
        [version, enabled] => Ok(DataClassificationAck {
            version: *version,
            enabled: *enabled != 0,
        }),
        _ => Err(ProtocolError::MalformedFeatureAck {
            feature: FeatureId::DataClassification,
            reason: "expected a 2-byte payload",
        }),
    }
}

/// Parsed FEATUREEXTACK payload.
///
/// Built once per login and read-only afterwards. Entries keep the order
/// the server sent them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureExtAck {
    features: Vec<FeatureAck>,
    skipped: Vec<FeatureId>,
}

impl FeatureExtAck {
    /// Feature terminator byte.
    pub const TERMINATOR: u8 = FEATURE_TERMINATOR;

    /// Decode a FEATUREEXTACK payload, stopping after the terminator.
    ///
    /// Bytes following the terminator are left on the reader.
    pub fn decode(reader: &mut ByteReader) -> Result<Self, ProtocolError> {
        let mut ack = Self::default();

        loop {
            let raw_id = reader.read_u8()?;
            let Some(feature_id) = FeatureId::from_u8(raw_id) else {
                break;
            };

            let data_len = reader.read_u32_le()? as usize;
            let data = reader.read_bytes(data_len)?;

            match FeatureAck::decode(feature_id, data)? {
                Some(decoded) => ack.insert(decoded),
                None => ack.skipped.push(feature_id),
            }
        }

        Ok(ack)
    }

    /// Decode a FEATUREEXTACK payload held in a standalone buffer.
    pub fn decode_bytes(data: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let mut reader = ByteReader::new(data);
        Self::decode(&mut reader)
    }

    fn insert(&mut self, decoded: FeatureAck) {
        let id = decoded.feature_id();
        match self.features.iter_mut().find(|f| f.feature_id() == id) {
            Some(existing) => *existing = decoded,
            None => self.features.push(decoded),
        }
    }

    /// Look up the acknowledgement for a feature.
    #[must_use]
    pub fn get(&self, feature_id: FeatureId) -> Option<&FeatureAck> {
        self.features.iter().find(|f| f.feature_id() == feature_id)
    }

    /// Returns true if the server acknowledged the feature and it was decoded.
    #[must_use]
    pub fn contains(&self, feature_id: FeatureId) -> bool {
        self.get(feature_id).is_some()
    }

    /// Decoded acknowledgements in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureAck> {
        self.features.iter()
    }

    /// Number of decoded acknowledgements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true when no feature was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Identifiers whose records were skipped without decoding.
    #[must_use]
    pub fn skipped(&self) -> &[FeatureId] {
        &self.skipped
    }

    /// JSON support version, if acknowledged.
    #[must_use]
    pub fn json_support_version(&self) -> Option<u8> {
        match self.get(FeatureId::JsonSupport) {
            Some(FeatureAck::JsonSupport(version)) => Some(*version),
            _ => None,
        }
    }

    /// VECTOR support version, if acknowledged.
    #[must_use]
    pub fn vector_support_version(&self) -> Option<u8> {
        match self.get(FeatureId::VectorSupport) {
            Some(FeatureAck::VectorSupport(version)) => Some(*version),
            _ => None,
        }
    }

    /// Column encryption acknowledgement, if present.
    #[must_use]
    pub fn column_encryption(&self) -> Option<&ColumnEncryptionAck> {
        match self.get(FeatureId::ColumnEncryption) {
            Some(FeatureAck::ColumnEncryption(ack)) => Some(ack),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    fn parse(data: &'static [u8]) -> Result<FeatureExtAck, ProtocolError> {
        FeatureExtAck::decode_bytes(Bytes::from_static(data))
    }

    #[test]
    fn test_terminator_only_is_empty() {
        let ack = parse(&[0xFF]).unwrap();
        assert!(ack.is_empty());
        assert!(ack.skipped().is_empty());
    }

    #[test]
    fn test_session_recovery_is_skipped() {
        let ack = parse(&[0x01, 0x03, 0x00, 0x00, 0x00, 0xAB, 0xCD, 0xEF, 0xFF]).unwrap();
        assert!(ack.is_empty());
        assert_eq!(ack.skipped(), &[FeatureId::SessionRecovery]);
    }

    #[test]
    fn test_unknown_feature_is_skipped_and_parsing_continues() {
        let ack = parse(&[
            0x3C, 0x02, 0x00, 0x00, 0x00, 0x11, 0x22, // unknown 0x3C
            0x0D, 0x01, 0x00, 0x00, 0x00, 0x01, // JSONSUPPORT v1
            0xFF,
        ])
        .unwrap();
        assert_eq!(ack.len(), 1);
        assert_eq!(ack.json_support_version(), Some(1));
        assert_eq!(ack.skipped(), &[FeatureId::Unknown(0x3C)]);
    }

    #[test]
    fn test_json_support() {
        let ack = parse(&[0x0D, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF]).unwrap();
        assert_eq!(ack.len(), 1);
        assert_eq!(ack.get(FeatureId::JsonSupport), Some(&FeatureAck::JsonSupport(1)));
    }

    #[test]
    fn test_column_encryption_and_json() {
        let ack = parse(&[
            0x04, 0x01, 0x00, 0x00, 0x00, 0x01, 0x0D, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF,
        ])
        .unwrap();
        let ce = ack.column_encryption().unwrap();
        assert_eq!(ce.version, 1);
        assert_eq!(ce.enclave_type, None);
        assert!(!ce.supports_enclaves());
        assert_eq!(ack.json_support_version(), Some(1));

        let order: Vec<FeatureId> = ack.iter().map(FeatureAck::feature_id).collect();
        assert_eq!(order, [FeatureId::ColumnEncryption, FeatureId::JsonSupport]);
    }

    #[test]
    fn test_column_encryption_with_enclave_type() {
        let mut payload = BytesMut::new();
        payload.put_u8(2);
        // B_VARCHAR "VBS": character count, then UTF-16LE.
        payload.put_slice(&[0x03, b'V', 0x00, b'B', 0x00, b'S', 0x00]);

        let mut buf = BytesMut::new();
        buf.put_u8(0x04);
        buf.put_u32_le(payload.len() as u32);
        buf.put_slice(&payload);
        buf.put_u8(0xFF);

        let ack = FeatureExtAck::decode_bytes(buf.freeze()).unwrap();
        let ce = ack.column_encryption().unwrap();
        assert_eq!(ce.version, 2);
        assert_eq!(ce.enclave_type.as_deref(), Some("VBS"));
        assert!(ce.supports_enclaves());
    }

    #[test]
    fn test_column_encryption_version_two_without_enclave() {
        let ack = parse(&[0x04, 0x01, 0x00, 0x00, 0x00, 0x02, 0xFF]).unwrap();
        let ce = ack.column_encryption().unwrap();
        assert_eq!(ce.version, 2);
        assert_eq!(ce.enclave_type, None);
    }

    #[test]
    fn test_column_encryption_malformed_is_fatal() {
        // Version 0.
        let err = parse(&[0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedFeatureAck {
                feature: FeatureId::ColumnEncryption,
                ..
            }
        ));

        // Empty payload.
        assert!(parse(&[0x04, 0x00, 0x00, 0x00, 0x00, 0xFF]).is_err());

        // Version 1 never carries an enclave type.
        assert!(parse(&[0x04, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0xFF]).is_err());

        // Enclave type length runs past the payload.
        assert!(parse(&[0x04, 0x02, 0x00, 0x00, 0x00, 0x02, 0x05, 0xFF]).is_err());
    }

    #[test]
    fn test_json_support_wrong_length_is_fatal() {
        let err = parse(&[0x0D, 0x02, 0x00, 0x00, 0x00, 0x01, 0x01, 0xFF]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedFeatureAck {
                feature: FeatureId::JsonSupport,
                reason: "expected a 1-byte payload",
            }
        );
    }

    #[test]
    fn test_vector_support() {
        let ack = parse(&[0x0E, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF]).unwrap();
        assert_eq!(ack.vector_support_version(), Some(1));
        assert_eq!(ack.json_support_version(), None);
    }

    #[test]
    fn test_fed_auth_lengths() {
        let ack = parse(&[0x02, 0x00, 0x00, 0x00, 0x00, 0xFF]).unwrap();
        assert_eq!(
            ack.get(FeatureId::FedAuth),
            Some(&FeatureAck::FedAuth(FedAuthAck::default()))
        );

        let mut buf = vec![0x02, 0x40, 0x00, 0x00, 0x00];
        buf.extend(0u8..0x40);
        buf.push(0xFF);
        let ack = FeatureExtAck::decode_bytes(buf).unwrap();
        let Some(FeatureAck::FedAuth(fed_auth)) = ack.get(FeatureId::FedAuth) else {
            panic!("expected FEDAUTH ack");
        };
        assert_eq!(fed_auth.nonce.unwrap()[0], 0x00);
        assert_eq!(fed_auth.nonce.unwrap()[31], 0x1F);
        assert_eq!(fed_auth.signature.unwrap()[0], 0x20);
        assert_eq!(fed_auth.signature.unwrap()[31], 0x3F);

        let mut buf = vec![0x02, 0x10, 0x00, 0x00, 0x00];
        buf.extend([0u8; 16]);
        buf.push(0xFF);
        assert!(FeatureExtAck::decode_bytes(buf).is_err());
    }

    #[test]
    fn test_small_fixed_payloads() {
        let ack = parse(&[
            0x05, 0x01, 0x00, 0x00, 0x00, 0x01, // GLOBALTRANSACTIONS enabled
            0x09, 0x02, 0x00, 0x00, 0x00, 0x02, 0x01, // DATACLASSIFICATION v2 enabled
            0x0A, 0x01, 0x00, 0x00, 0x00, 0x01, // UTF8_SUPPORT
            0x0B, 0x01, 0x00, 0x00, 0x00, 0x00, // AZURESQLDNSCACHING off
            0x08, 0x01, 0x00, 0x00, 0x00, 0x01, // AZURESQLSUPPORT
            0xFF,
        ])
        .unwrap();
        assert_eq!(ack.len(), 5);
        assert_eq!(
            ack.get(FeatureId::GlobalTransactions),
            Some(&FeatureAck::GlobalTransactions(true))
        );
        assert_eq!(
            ack.get(FeatureId::DataClassification),
            Some(&FeatureAck::DataClassification(DataClassificationAck {
                version: 2,
                enabled: true
            }))
        );
        assert_eq!(ack.get(FeatureId::Utf8Support), Some(&FeatureAck::Utf8Support(true)));
        assert_eq!(
            ack.get(FeatureId::AzureSqlDnsCaching),
            Some(&FeatureAck::AzureSqlDnsCaching(false))
        );
        assert_eq!(
            ack.get(FeatureId::AzureSqlSupport),
            Some(&FeatureAck::AzureSqlSupport(1))
        );
    }

    #[test]
    fn test_repeated_feature_replaces_earlier_entry() {
        let ack = parse(&[
            0x0D, 0x01, 0x00, 0x00, 0x00, 0x01, 0x0E, 0x01, 0x00, 0x00, 0x00, 0x01, 0x0D, 0x01,
            0x00, 0x00, 0x00, 0x02, 0xFF,
        ])
        .unwrap();
        assert_eq!(ack.len(), 2);
        assert_eq!(ack.json_support_version(), Some(2));
        assert_eq!(ack.iter().next(), Some(&FeatureAck::JsonSupport(2)));
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        let err = parse(&[0x0D, 0x01, 0x00, 0x00, 0x00, 0x01]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_length_past_end_is_truncated() {
        let err = parse(&[0x01, 0x10, 0x00, 0x00, 0x00, 0xAB, 0xFF]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Truncated {
                needed: 16,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_empty_buffer_is_truncated() {
        assert!(parse(&[]).unwrap_err().is_truncated());
    }

    #[test]
    fn test_trailing_bytes_left_on_reader() {
        let mut reader = ByteReader::new(Bytes::from_static(&[0xFF, 0xFD, 0x00]));
        let ack = FeatureExtAck::decode(&mut reader).unwrap();
        assert!(ack.is_empty());
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0xFD);
    }
}
