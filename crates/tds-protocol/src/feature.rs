//! Feature extension identifiers and the LOGIN7 FEATUREEXT request block.
//!
//! The client advertises optional capabilities in LOGIN7 as a sequence of
//! `[feature id:1][length:4 LE][data]` records terminated by `0xFF`. The
//! server answers with a FEATUREEXTACK token using the same record layout
//! (see [`crate::feature_ack`]).

use core::fmt;

use bytes::{BufMut, Bytes};

use crate::prelude::*;

/// Byte that ends both the FEATUREEXT block and the FEATUREEXTACK payload.
pub const FEATURE_TERMINATOR: u8 = 0xFF;

/// Feature extension identifier.
///
/// Values the driver does not know are kept as [`FeatureId::Unknown`] so
/// newer servers never make an identifier unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    /// Session recovery (connection resiliency).
    SessionRecovery,
    /// Federated authentication.
    FedAuth,
    /// Column encryption (Always Encrypted).
    ColumnEncryption,
    /// Global transactions.
    GlobalTransactions,
    /// Azure SQL support.
    AzureSqlSupport,
    /// Data classification.
    DataClassification,
    /// UTF-8 support.
    Utf8Support,
    /// Azure SQL DNS caching.
    AzureSqlDnsCaching,
    /// Native JSON data type support.
    JsonSupport,
    /// Native VECTOR data type support.
    VectorSupport,
    /// Identifier not known to this driver.
    Unknown(u8),
}

impl FeatureId {
    /// Map a wire byte to a feature identifier.
    ///
    /// Returns `None` only for the terminator byte, which is not a feature.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        let id = match value {
            0x01 => Self::SessionRecovery,
            0x02 => Self::FedAuth,
            0x04 => Self::ColumnEncryption,
            0x05 => Self::GlobalTransactions,
            0x08 => Self::AzureSqlSupport,
            0x09 => Self::DataClassification,
            0x0A => Self::Utf8Support,
            0x0B => Self::AzureSqlDnsCaching,
            0x0D => Self::JsonSupport,
            0x0E => Self::VectorSupport,
            FEATURE_TERMINATOR => return None,
            other => Self::Unknown(other),
        };
        Some(id)
    }

    /// The wire byte for this identifier.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::SessionRecovery => 0x01,
            Self::FedAuth => 0x02,
            Self::ColumnEncryption => 0x04,
            Self::GlobalTransactions => 0x05,
            Self::AzureSqlSupport => 0x08,
            Self::DataClassification => 0x09,
            Self::Utf8Support => 0x0A,
            Self::AzureSqlDnsCaching => 0x0B,
            Self::JsonSupport => 0x0D,
            Self::VectorSupport => 0x0E,
            Self::Unknown(value) => value,
        }
    }

    /// Protocol name of the feature, as used in MS-TDS.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SessionRecovery => "SESSIONRECOVERY",
            Self::FedAuth => "FEDAUTH",
            Self::ColumnEncryption => "COLUMNENCRYPTION",
            Self::GlobalTransactions => "GLOBALTRANSACTIONS",
            Self::AzureSqlSupport => "AZURESQLSUPPORT",
            Self::DataClassification => "DATACLASSIFICATION",
            Self::Utf8Support => "UTF8_SUPPORT",
            Self::AzureSqlDnsCaching => "AZURESQLDNSCACHING",
            Self::JsonSupport => "JSONSUPPORT",
            Self::VectorSupport => "VECTORSUPPORT",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "UNKNOWN(0x{value:02X})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Highest JSONSUPPORT version this driver understands.
pub const JSON_SUPPORT_VERSION: u8 = 0x01;

/// Highest VECTORSUPPORT version this driver understands.
pub const VECTOR_SUPPORT_VERSION: u8 = 0x01;

/// Column encryption version requested by the driver (no enclave computations).
pub const COLUMN_ENCRYPTION_VERSION: u8 = 0x01;

/// A single FEATUREEXT record sent in LOGIN7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureExtension {
    /// Feature ID.
    pub feature_id: FeatureId,
    /// Feature data.
    pub data: Bytes,
}

impl FeatureExtension {
    /// Create a record with an arbitrary payload.
    #[must_use]
    pub fn new(feature_id: FeatureId, data: impl Into<Bytes>) -> Self {
        Self {
            feature_id,
            data: data.into(),
        }
    }

    /// Request native JSON support at the given version.
    #[must_use]
    pub fn json_support(version: u8) -> Self {
        Self::new(FeatureId::JsonSupport, vec![version])
    }

    /// Request native VECTOR support at the given version.
    #[must_use]
    pub fn vector_support(version: u8) -> Self {
        Self::new(FeatureId::VectorSupport, vec![version])
    }

    /// Request column encryption at the given version.
    #[must_use]
    pub fn column_encryption(version: u8) -> Self {
        Self::new(FeatureId::ColumnEncryption, vec![version])
    }

    /// Request UTF-8 support. The request carries no data.
    #[must_use]
    pub fn utf8_support() -> Self {
        Self::new(FeatureId::Utf8Support, Bytes::new())
    }

    /// Encoded size of this record in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        1 + 4 + self.data.len()
    }

    /// Write this record.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.feature_id.as_u8());
        dst.put_u32_le(self.data.len() as u32);
        dst.put_slice(&self.data);
    }
}

/// Write a complete FEATUREEXT block, including the terminator.
pub fn encode_feature_extensions(features: &[FeatureExtension], dst: &mut impl BufMut) {
    for feature in features {
        feature.encode(dst);
    }
    dst.put_u8(FEATURE_TERMINATOR);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_feature_id_roundtrip_known_values() {
        for byte in [0x01, 0x02, 0x04, 0x05, 0x08, 0x09, 0x0A, 0x0B, 0x0D, 0x0E] {
            let id = FeatureId::from_u8(byte).unwrap();
            assert!(!matches!(id, FeatureId::Unknown(_)), "0x{byte:02X}");
            assert_eq!(id.as_u8(), byte);
        }
    }

    #[test]
    fn test_feature_id_unknown_is_representable() {
        assert_eq!(FeatureId::from_u8(0x03), Some(FeatureId::Unknown(0x03)));
        assert_eq!(FeatureId::from_u8(0x42).unwrap().as_u8(), 0x42);
        assert_eq!(FeatureId::from_u8(FEATURE_TERMINATOR), None);
    }

    #[test]
    fn test_feature_id_display() {
        assert_eq!(FeatureId::JsonSupport.to_string(), "JSONSUPPORT");
        assert_eq!(FeatureId::Unknown(0x3C).to_string(), "UNKNOWN(0x3C)");
    }

    #[test]
    fn test_encode_feature_block() {
        let features = [
            FeatureExtension::vector_support(VECTOR_SUPPORT_VERSION),
            FeatureExtension::utf8_support(),
        ];
        let mut buf = BytesMut::new();
        encode_feature_extensions(&features, &mut buf);

        assert_eq!(
            &buf[..],
            &[
                0x0E, 0x01, 0x00, 0x00, 0x00, 0x01, // VECTORSUPPORT v1
                0x0A, 0x00, 0x00, 0x00, 0x00, // UTF8_SUPPORT, no data
                0xFF,
            ]
        );
        let expected: usize = features.iter().map(FeatureExtension::encoded_len).sum();
        assert_eq!(buf.len(), expected + 1);
    }

    #[test]
    fn test_encode_empty_block_is_terminator() {
        let mut buf = BytesMut::new();
        encode_feature_extensions(&[], &mut buf);
        assert_eq!(&buf[..], &[FEATURE_TERMINATOR]);
    }
}
