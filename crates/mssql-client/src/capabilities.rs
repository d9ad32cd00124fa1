//! Capabilities negotiated at login.

use mssql_types::VectorFormat;
use tds_protocol::{
    ColumnEncryptionAck, DataClassificationAck, FeatureAck, FeatureExtAck, FeatureId, FedAuthAck,
};

use crate::config::{Config, VectorTypeSupport};

/// What the server agreed to during login.
///
/// Built once from the FEATUREEXTACK token and never modified. Everything a
/// session does differently depending on the server reads from here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerCapabilities {
    json_support_version: Option<u8>,
    vector_support_version: Option<u8>,
    column_encryption: Option<ColumnEncryptionAck>,
    utf8_support: bool,
    data_classification: Option<DataClassificationAck>,
    fed_auth: Option<FedAuthAck>,
    global_transactions: bool,
    azure_sql_support: Option<u8>,
    dns_caching: bool,
    vector_format: VectorFormat,
    skipped: Vec<FeatureId>,
}

impl ServerCapabilities {
    /// Combine what was requested with what the server acknowledged.
    #[must_use]
    pub fn negotiate(config: &Config, ack: &FeatureExtAck) -> Self {
        let mut caps = Self::default();

        for feature in ack.iter() {
            let feature_id = feature.feature_id();
            if !config.requests(feature_id) {
                tracing::warn!(
                    feature = %feature_id,
                    "server acknowledged a feature that was not requested"
                );
            }

            match feature {
                FeatureAck::FedAuth(fed_auth) => caps.fed_auth = Some(*fed_auth),
                FeatureAck::ColumnEncryption(ce) => caps.column_encryption = Some(ce.clone()),
                FeatureAck::GlobalTransactions(enabled) => caps.global_transactions = *enabled,
                FeatureAck::AzureSqlSupport(options) => caps.azure_sql_support = Some(*options),
                FeatureAck::DataClassification(dc) => caps.data_classification = Some(*dc),
                FeatureAck::Utf8Support(enabled) => caps.utf8_support = *enabled,
                FeatureAck::AzureSqlDnsCaching(enabled) => caps.dns_caching = *enabled,
                FeatureAck::JsonSupport(version) => caps.json_support_version = Some(*version),
                FeatureAck::VectorSupport(version) => caps.vector_support_version = Some(*version),
            }
        }

        for feature_id in ack.skipped() {
            tracing::debug!(feature = %feature_id, "skipped feature acknowledgement");
        }
        caps.skipped = ack.skipped().to_vec();

        let native = config.vector_type_support == VectorTypeSupport::V1
            && caps.vector_support_version.is_some_and(|v| v >= 1);
        caps.vector_format = if native {
            VectorFormat::Native
        } else {
            VectorFormat::Json
        };

        tracing::debug!(
            requested = %config.vector_type_support,
            server_version = ?caps.vector_support_version,
            format = %caps.vector_format,
            "negotiated vector format"
        );

        caps
    }

    /// Native JSON version, if acknowledged.
    #[must_use]
    pub fn json_support_version(&self) -> Option<u8> {
        self.json_support_version
    }

    /// Native VECTOR version, if acknowledged.
    #[must_use]
    pub fn vector_support_version(&self) -> Option<u8> {
        self.vector_support_version
    }

    /// Always Encrypted acknowledgement.
    #[must_use]
    pub fn column_encryption(&self) -> Option<&ColumnEncryptionAck> {
        self.column_encryption.as_ref()
    }

    /// Whether UTF-8 collations are enabled.
    #[must_use]
    pub fn utf8_support(&self) -> bool {
        self.utf8_support
    }

    /// Data classification acknowledgement.
    #[must_use]
    pub fn data_classification(&self) -> Option<DataClassificationAck> {
        self.data_classification
    }

    /// Federated authentication acknowledgement.
    #[must_use]
    pub fn fed_auth(&self) -> Option<&FedAuthAck> {
        self.fed_auth.as_ref()
    }

    /// Whether global transactions are enabled.
    #[must_use]
    pub fn global_transactions(&self) -> bool {
        self.global_transactions
    }

    /// Azure SQL support options byte.
    #[must_use]
    pub fn azure_sql_support(&self) -> Option<u8> {
        self.azure_sql_support
    }

    /// Whether Azure SQL DNS caching is supported.
    #[must_use]
    pub fn dns_caching(&self) -> bool {
        self.dns_caching
    }

    /// Wire format for vector values on this session.
    #[must_use]
    pub fn vector_format(&self) -> VectorFormat {
        self.vector_format
    }

    /// Acknowledged features the driver did not decode.
    #[must_use]
    pub fn skipped(&self) -> &[FeatureId] {
        &self.skipped
    }
}
