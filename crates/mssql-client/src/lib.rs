//! # mssql-client
//!
//! Session-level feature negotiation for SQL Server, and the VECTOR binding
//! that depends on it.
//!
//! The transport performs the login exchange; this crate decides what to ask
//! for and what the answer means:
//!
//! 1. [`Config::feature_extensions`] lists the FEATUREEXT records for LOGIN7.
//! 2. [`Session::establish`] parses the server's FEATUREEXTACK once and fixes
//!    the session's [`ServerCapabilities`].
//! 3. [`Session::bind`] and [`Session::read_vector`] move vectors in the
//!    negotiated form: native binary when both sides agreed on VECTORSUPPORT,
//!    JSON text otherwise.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use mssql_client::{Config, Session};
//! use mssql_types::VectorFormat;
//!
//! let config = Config::from_connection_string("Server=db;VectorTypeSupport=v1")?;
//!
//! // FEATUREEXTACK: VECTORSUPPORT version 1, then the terminator.
//! let ack = Bytes::from_static(&[0x0E, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF]);
//! let session = Session::establish(config, ack)?;
//! assert_eq!(session.vector_format(), VectorFormat::Native);
//!
//! let param = session.bind(&vec![0.25f32, 0.5, 0.75])?;
//! let back = session.read_vector(&param)?;
//! assert_eq!(back.as_slice(), &[0.25, 0.5, 0.75]);
//! # Ok::<(), mssql_client::Error>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod session;

pub use capabilities::ServerCapabilities;
pub use config::{Config, VectorTypeSupport};
pub use error::{Error, Result};
pub use session::Session;

// Re-export commonly used types
pub use mssql_types::{
    FromSql, NullVector, SqlValue, ToSql, TypeError, Vector, VectorElementType, VectorFormat,
};
pub use tds_protocol::{FeatureAck, FeatureExtAck, FeatureId, ProtocolError};
