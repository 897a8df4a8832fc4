//! Decoded CDR data model
//!
//! [`DecodedCdr`] is the named-field structure produced for every
//! submitted record. All leaf values are optional: a position that is
//! absent, blank, or out of range in the raw record decodes to `None`
//! and renders as `N/A`. Nothing here is mutated after decode.

use std::fmt;

use crate::tables;

/// A disconnect cause code with its table description.
///
/// Displays as `16 (Normal Call Clearing)` when the code is known and
/// `Unknown (999)` when it is not.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CauseCode {
    /// Raw code token as it appeared in the record
    pub code: String,
    /// Table description, when the code is recognized
    pub description: Option<&'static str>,
}

impl CauseCode {
    /// Resolve a raw cause-code token against the cause table
    pub fn resolve(code: &str) -> Self {
        let description = code
            .parse::<u16>()
            .ok()
            .and_then(tables::cause_description);
        Self {
            code: code.to_string(),
            description,
        }
    }
}

impl fmt::Display for CauseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description {
            Some(desc) => write!(f, "{} ({})", self.code, desc),
            None => write!(f, "Unknown ({})", self.code),
        }
    }
}

/// A per-leg SIP release status.
///
/// The status token is usually a numeric response code; a leg released
/// by the remote party carries the literal method name `BYE`, which is
/// passed through without a reason-phrase lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SipStatus {
    pub code: String,
    pub reason: Option<&'static str>,
}

impl SipStatus {
    /// Resolve a raw status token against the SIP response table
    pub fn resolve(code: &str) -> Self {
        let reason = if code.eq_ignore_ascii_case("BYE") {
            None
        } else {
            code.parse::<u16>().ok().and_then(tables::sip_reason)
        };
        Self {
            code: code.to_string(),
            reason,
        }
    }
}

impl fmt::Display for SipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.eq_ignore_ascii_case("BYE") {
            return write!(f, "BYE");
        }
        match self.reason {
            Some(reason) => write!(f, "{} ({})", self.code, reason),
            None => write!(f, "Unknown ({})", self.code),
        }
    }
}

/// A media codec identifier with its table description
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MediaCodec {
    pub id: String,
    pub description: Option<&'static str>,
}

impl MediaCodec {
    /// Resolve a raw codec token against the codec table
    pub fn resolve(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: tables::codec_description(id),
        }
    }
}

impl fmt::Display for MediaCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description {
            Some(desc) => write!(f, "{} ({})", self.id, desc),
            None => write!(f, "Unknown ({})", self.id),
        }
    }
}

/// Which party released the call
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReleaseInitiator {
    Internal,
    CallingParty,
    CalledParty,
    /// A value outside the documented 0/1/2 set
    Invalid(String),
}

impl ReleaseInitiator {
    /// Decode the raw initiator token (0/1/2, anything else invalid)
    pub fn from_token(token: &str) -> Self {
        match token {
            "0" => Self::Internal,
            "1" => Self::CallingParty,
            "2" => Self::CalledParty,
            other => Self::Invalid(other.to_string()),
        }
    }
}

impl fmt::Display for ReleaseInitiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "0 (Internal)"),
            Self::CallingParty => write!(f, "1 (Calling Party)"),
            Self::CalledParty => write!(f, "2 (Called Party)"),
            Self::Invalid(v) => write!(f, "{} (Invalid value found)", v),
        }
    }
}

/// Timing, party, and identifier fields shared by all record kinds
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallInfo {
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub stop_date: Option<String>,
    pub disconnect_time: Option<String>,
    /// Call service duration in seconds (the raw field is hundredths)
    pub duration_secs: Option<f64>,
    /// Calling number, decorated with the calling name when present
    pub calling_number: Option<String>,
    pub called_number: Option<String>,
    pub billing_number: Option<String>,
    /// GSX call id (GCID)
    pub gcid: Option<String>,
}

/// Route selection fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutingInfo {
    /// `None` means a gateway-to-gateway call with no route label
    pub route_label: Option<String>,
    pub route_attempt: Option<String>,
    pub route_selected: Option<String>,
    pub service_provider: Option<String>,
}

/// Release cause fields
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DisconnectInfo {
    pub reason: Option<CauseCode>,
    pub initiator: Option<ReleaseInitiator>,
    /// Status message that released the ingress leg
    pub ingress_status: Option<SipStatus>,
    /// Status message that released the egress leg
    pub egress_status: Option<SipStatus>,
}

/// Per-leg signaling and media fields, used for both ingress and egress
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallLeg {
    pub trunk_group: Option<String>,
    /// Protocol call id from the leg's signaling sub-record
    pub call_id: Option<String>,
    pub codec: Option<MediaCodec>,
    /// Endpoint device name extracted from the INVITE Contact header
    pub device_name: Option<String>,
    pub local_signaling_ip: Option<String>,
    pub remote_signaling_ip: Option<String>,
    pub local_rtp_ip: Option<String>,
    pub remote_rtp_ip: Option<String>,
    pub packets_sent: Option<String>,
    pub packets_received: Option<String>,
    /// Lost packet count, annotated with a loss percentage when both
    /// counters parse
    pub packets_lost: Option<String>,
}

/// The fully decoded record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedCdr {
    pub kind: crate::RecordKind,
    pub gateway: Option<String>,
    pub call: CallInfo,
    pub routing: RoutingInfo,
    pub disconnect: DisconnectInfo,
    pub ingress: CallLeg,
    pub egress: CallLeg,
}

impl DecodedCdr {
    /// A record with the given kind and every other field unavailable
    pub fn empty(kind: crate::RecordKind) -> Self {
        Self {
            kind,
            gateway: None,
            call: CallInfo::default(),
            routing: RoutingInfo::default(),
            disconnect: DisconnectInfo::default(),
            ingress: CallLeg::default(),
            egress: CallLeg::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CauseCode, MediaCodec, ReleaseInitiator, SipStatus};

    #[test]
    fn test_cause_code_display() {
        assert_eq!(
            CauseCode::resolve("16").to_string(),
            "16 (Normal Call Clearing)"
        );
        assert_eq!(CauseCode::resolve("999").to_string(), "Unknown (999)");
        assert_eq!(CauseCode::resolve("junk").to_string(), "Unknown (junk)");
    }

    #[test]
    fn test_sip_status_display() {
        assert_eq!(SipStatus::resolve("401").to_string(), "401 (Unauthorized)");
        assert_eq!(SipStatus::resolve("BYE").to_string(), "BYE");
        assert_eq!(SipStatus::resolve("799").to_string(), "Unknown (799)");
    }

    #[test]
    fn test_media_codec_display() {
        assert_eq!(MediaCodec::resolve("8").to_string(), "8 (G.711 A-law)");
        assert_eq!(
            MediaCodec::resolve("P:1:1").to_string(),
            "P:1:1 (G.711 u-law)"
        );
        assert_eq!(MediaCodec::resolve("P:7:7").to_string(), "Unknown (P:7:7)");
    }

    #[test]
    fn test_release_initiator() {
        assert_eq!(
            ReleaseInitiator::from_token("1").to_string(),
            "1 (Calling Party)"
        );
        assert_eq!(
            ReleaseInitiator::from_token("9").to_string(),
            "9 (Invalid value found)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decoded_record_serializes() {
        let cdr = crate::decode("STOP,LABGSX1,,,,02/22/2013,17:02:12.5");
        let json = serde_json::to_value(&cdr).unwrap();
        assert_eq!(json["kind"], "Stop");
        assert_eq!(json["gateway"], "LABGSX1");
        assert_eq!(json["call"]["start_time"], "17:02:12.5");
        assert!(json["disconnect"]["reason"].is_null());
    }
}
