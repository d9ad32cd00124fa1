//! Internal prelude for no_std compatibility.
//!
//! Re-exports the allocating types the decoders need from either `std` or
//! `alloc`, depending on feature flags.

// When std is enabled, re-export from std
#[cfg(feature = "std")]
pub use std::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

// When alloc is enabled (but not std), re-export from alloc
#[cfg(all(feature = "alloc", not(feature = "std")))]
pub use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};
