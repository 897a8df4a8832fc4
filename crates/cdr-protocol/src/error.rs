//! Error types for CDR field decoding
//!
//! Decoding as a whole is total: every input produces a [`DecodedCdr`]
//! (see [`crate::decoder::decode`]). These errors exist for the
//! internal helpers that interpret individual composite fields; the
//! decoder resolves them to an unavailable field and logs a warning
//! rather than propagating.
//!
//! [`DecodedCdr`]: crate::DecodedCdr

use thiserror::Error;

/// Errors from interpreting a single field's contents
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Duration field did not parse as an integer count of hundredths
    #[error("invalid duration value: {0:?}")]
    InvalidDuration(String),

    /// Composite media endpoint token missing its `/` separator
    #[error("malformed media endpoint: {0:?}")]
    MalformedEndpoint(String),

    /// Packet counter field did not parse as a non-negative integer
    #[error("invalid packet counter: {0:?}")]
    InvalidCounter(String),
}
