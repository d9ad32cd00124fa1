//! Client configuration.

use core::fmt;

use tds_protocol::{
    COLUMN_ENCRYPTION_VERSION, FeatureExtension, FeatureId, JSON_SUPPORT_VERSION,
    VECTOR_SUPPORT_VERSION,
};

/// Whether to request native VECTOR support at login.
///
/// Off by default: without it vectors travel as JSON text, which every
/// server that understands `vector` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VectorTypeSupport {
    /// Do not request native vectors.
    #[default]
    Off,
    /// Request VECTORSUPPORT version 1.
    V1,
}

impl VectorTypeSupport {
    /// Parse a connection string value (`off` or `v1`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("off") {
            Some(Self::Off)
        } else if value.eq_ignore_ascii_case("v1") {
            Some(Self::V1)
        } else {
            None
        }
    }

    /// Connection string spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::V1 => "v1",
        }
    }

    /// VECTORSUPPORT version to send in LOGIN7, if any.
    #[must_use]
    pub const fn requested_version(self) -> Option<u8> {
        match self {
            Self::Off => None,
            Self::V1 => Some(VECTOR_SUPPORT_VERSION),
        }
    }
}

impl fmt::Display for VectorTypeSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a SQL Server session.
///
/// Only the options that shape LOGIN7 feature negotiation live here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Native VECTOR request level.
    pub vector_type_support: VectorTypeSupport,
    /// Request native JSON support.
    pub json_support: bool,
    /// Request Always Encrypted.
    pub column_encryption: bool,
    /// Request UTF-8 collation support.
    pub utf8_support: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_type_support: VectorTypeSupport::Off,
            json_support: true,
            column_encryption: false,
            utf8_support: true,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, crate::error::Error> {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") || value == "0"
    {
        Ok(false)
    } else {
        Err(crate::error::Error::Config(format!(
            "invalid boolean for {key}: {value}"
        )))
    }
}

impl Config {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a connection string into configuration.
    ///
    /// Connection string format:
    /// `Server=host;Database=db;VectorTypeSupport=v1;JsonSupport=true;...`
    ///
    /// Keys are case-insensitive. Options that do not affect feature
    /// negotiation are accepted and ignored.
    pub fn from_connection_string(conn_str: &str) -> Result<Self, crate::error::Error> {
        let mut config = Self::default();

        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| crate::error::Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "vectortypesupport" | "vector type support" => {
                    config.vector_type_support =
                        VectorTypeSupport::parse(value).ok_or_else(|| {
                            crate::error::Error::Config(format!(
                                "invalid vector type support: {value}. Supported values: off, v1"
                            ))
                        })?;
                }
                "jsonsupport" | "json support" => {
                    config.json_support = parse_bool(&key, value)?;
                }
                "column encryption setting" | "columnencryption" => {
                    config.column_encryption = if value.eq_ignore_ascii_case("enabled") {
                        true
                    } else if value.eq_ignore_ascii_case("disabled") {
                        false
                    } else {
                        parse_bool(&key, value)?
                    };
                }
                "utf8support" | "utf8 support" => {
                    config.utf8_support = parse_bool(&key, value)?;
                }
                _ => {
                    // Ignore unknown options for forward compatibility
                    tracing::debug!(
                        key = key,
                        value = value,
                        "ignoring unknown connection string option"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Set the native VECTOR request level.
    #[must_use]
    pub fn vector_type_support(mut self, support: VectorTypeSupport) -> Self {
        self.vector_type_support = support;
        self
    }

    /// Enable or disable the native JSON request.
    #[must_use]
    pub fn json_support(mut self, enabled: bool) -> Self {
        self.json_support = enabled;
        self
    }

    /// Enable or disable the Always Encrypted request.
    #[must_use]
    pub fn column_encryption(mut self, enabled: bool) -> Self {
        self.column_encryption = enabled;
        self
    }

    /// Enable or disable the UTF-8 request.
    #[must_use]
    pub fn utf8_support(mut self, enabled: bool) -> Self {
        self.utf8_support = enabled;
        self
    }

    /// Build the FEATUREEXT records to send in LOGIN7.
    #[must_use]
    pub fn feature_extensions(&self) -> Vec<FeatureExtension> {
        let mut features = Vec::new();
        if self.column_encryption {
            features.push(FeatureExtension::column_encryption(
                COLUMN_ENCRYPTION_VERSION,
            ));
        }
        if self.utf8_support {
            features.push(FeatureExtension::utf8_support());
        }
        if self.json_support {
            features.push(FeatureExtension::json_support(JSON_SUPPORT_VERSION));
        }
        if let Some(version) = self.vector_type_support.requested_version() {
            features.push(FeatureExtension::vector_support(version));
        }
        features
    }

    /// Returns true if LOGIN7 asks the server for this feature.
    #[must_use]
    pub fn requests(&self, feature_id: FeatureId) -> bool {
        match feature_id {
            FeatureId::ColumnEncryption => self.column_encryption,
            FeatureId::Utf8Support => self.utf8_support,
            FeatureId::JsonSupport => self.json_support,
            FeatureId::VectorSupport => self.vector_type_support.requested_version().is_some(),
            _ => false,
        }
    }
}
