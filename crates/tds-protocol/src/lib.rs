//! # tds-protocol
//!
//! Feature extension negotiation for the MS-TDS (Tabular Data Stream)
//! protocol used by Microsoft SQL Server.
//!
//! This crate covers the two halves of optional-feature negotiation:
//! the FEATUREEXT block a client appends to LOGIN7, and the FEATUREEXTACK
//! payload the server answers with. Acknowledgements are decoded into a
//! typed [`FeatureAck`] per feature; identifiers the driver does not know are
//! skipped so newer servers keep working.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `alloc`: Enable allocation without full std (requires `alloc` crate)
//!
//! ## Design Philosophy
//!
//! This crate is intentionally IO-agnostic. It decodes buffers the transport
//! has already filled and never blocks. Higher-level crates decide what the
//! negotiated features mean for a connection.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use tds_protocol::{FeatureExtAck, FeatureId};
//!
//! let ack = FeatureExtAck::decode_bytes(Bytes::from_static(&[0x0D, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF]))?;
//! assert_eq!(ack.json_support_version(), Some(1));
//! assert!(!ack.contains(FeatureId::VectorSupport));
//! # Ok::<(), tds_protocol::ProtocolError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod codec;
pub mod error;
pub mod feature;
pub mod feature_ack;
mod prelude;

pub use codec::ByteReader;
pub use error::ProtocolError;
pub use feature::{
    COLUMN_ENCRYPTION_VERSION, FEATURE_TERMINATOR, FeatureExtension, FeatureId,
    JSON_SUPPORT_VERSION, VECTOR_SUPPORT_VERSION, encode_feature_extensions,
};
pub use feature_ack::{
    ColumnEncryptionAck, DataClassificationAck, FeatureAck, FeatureExtAck, FedAuthAck,
};
