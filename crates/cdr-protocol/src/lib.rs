//! Ribbon/GSX CDR Protocol Library
//!
//! This crate parses and decodes call detail records (CDRs) as emitted
//! by Ribbon (formerly Sonus) GSX/SBC session border controllers:
//!
//! - **START**: call setup records
//! - **ATTEMPT**: failed call attempts
//! - **STOP**: completed call records with duration and media counters
//!
//! # Architecture
//!
//! A record moves through three stages:
//! - [`fields`] tokenizes the raw line into three parallel views
//!   (raw comma stream, quote-stripped stream, quoted sections), all
//!   accessed through bounds-guarded lookups
//! - [`decoder`] classifies the record and resolves kind-specific
//!   field positions into a [`DecodedCdr`], consulting the static
//!   lookup tables in [`tables`] for cause codes, SIP responses and
//!   codec identifiers
//! - [`render`] produces the condensed and full text views
//!
//! Every stage is total: malformed tokens degrade to unavailable
//! fields, out-of-range positions yield `None`, and an unrecognized
//! record type still decodes (to an empty record carrying its tag).
//!
//! # Example
//!
//! ```rust
//! use cdr_protocol::{decode, RecordKind};
//!
//! let cdr = decode("START,LABGSX1,0x00220002,0007,CHI1,02/22/2013,17:02:12.5");
//! assert_eq!(cdr.kind, RecordKind::Start);
//! assert_eq!(cdr.gateway.as_deref(), Some("LABGSX1"));
//! assert_eq!(cdr.call.start_time.as_deref(), Some("17:02:12.5"));
//! ```

pub mod decoder;
pub mod error;
pub mod fields;
pub mod record;
pub mod render;
pub mod tables;

pub use error::DecodeError;
pub use fields::{RawRecord, Tokens};
pub use record::{
    CallInfo, CallLeg, CauseCode, DecodedCdr, DisconnectInfo, MediaCodec, ReleaseInitiator,
    RoutingInfo, SipStatus,
};
pub use render::{render_condensed, render_full};

/// Identifies which accounting record type a line carries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RecordKind {
    /// Call setup record
    Start,
    /// Failed call attempt record
    Attempt,
    /// Completed call record
    Stop,
    /// Any other type tag, preserved verbatim
    Unrecognized(String),
}

impl RecordKind {
    /// Classify a type tag as it appears at field position 0
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "START" => RecordKind::Start,
            "ATTEMPT" => RecordKind::Attempt,
            "STOP" => RecordKind::Stop,
            other => RecordKind::Unrecognized(other.to_string()),
        }
    }

    /// Returns a human-readable name for the record kind
    pub fn name(&self) -> &str {
        match self {
            RecordKind::Start => "START",
            RecordKind::Attempt => "ATTEMPT",
            RecordKind::Stop => "STOP",
            RecordKind::Unrecognized(tag) => tag,
        }
    }
}

/// Tokenize and decode a raw CDR line in one step
pub fn decode(raw: &str) -> DecodedCdr {
    decoder::decode(&RawRecord::new(raw))
}
