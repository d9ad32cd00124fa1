//! Session state after login.

use bytes::Bytes;
use mssql_types::{FromSql, NullVector, SqlValue, ToSql, Vector, VectorFormat};
use tds_protocol::FeatureExtAck;

use crate::capabilities::ServerCapabilities;
use crate::config::Config;
use crate::error::Result;

/// A logged-in session.
///
/// Holds the configuration it was opened with and the capabilities the
/// server granted. Both are fixed for the session's lifetime, so a `Session`
/// can be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    capabilities: ServerCapabilities,
}

impl Session {
    /// Finish login from the server's FEATUREEXTACK token data.
    ///
    /// Any decoding error means the login cannot be trusted; the error is
    /// [connection fatal](crate::Error::is_connection_fatal).
    pub fn establish(config: Config, feature_ack: Bytes) -> Result<Self> {
        let ack = FeatureExtAck::decode_bytes(feature_ack)?;
        let capabilities = ServerCapabilities::negotiate(&config, &ack);

        tracing::debug!(
            features = ack.len(),
            skipped = ack.skipped().len(),
            vector_format = %capabilities.vector_format(),
            "session established"
        );

        Ok(Self {
            config,
            capabilities,
        })
    }

    /// The configuration the session was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The negotiated capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// Wire format for vector values.
    #[must_use]
    pub fn vector_format(&self) -> VectorFormat {
        self.capabilities.vector_format()
    }

    /// Convert a parameter into the value sent to the server.
    ///
    /// Vectors take the session's wire form; other values pass through.
    pub fn bind(&self, param: &dyn ToSql) -> Result<SqlValue> {
        match param.to_sql()? {
            SqlValue::Vector(vector) => Ok(self.vector_format().encode(&vector)?),
            other => Ok(other),
        }
    }

    /// Parameter type declaration for a vector argument.
    #[must_use]
    pub fn type_declaration(&self, vector: &Vector) -> String {
        self.vector_format().type_declaration(vector)
    }

    /// Read a non-NULL vector column value.
    pub fn read_vector(&self, value: &SqlValue) -> Result<Vector> {
        Ok(self.vector_format().decode(value)?)
    }

    /// Read a nullable vector column value.
    pub fn read_null_vector(&self, value: &SqlValue) -> Result<NullVector> {
        if value.is_null() {
            return Ok(NullVector::null());
        }
        self.read_vector(value).map(NullVector::from)
    }

    /// Read a column value of any other type.
    ///
    /// Vector columns arrive in wire form and go through
    /// [`read_vector`](Self::read_vector) instead.
    pub fn read<T: FromSql>(&self, value: &SqlValue) -> Result<T> {
        Ok(T::from_sql(value)?)
    }
}
