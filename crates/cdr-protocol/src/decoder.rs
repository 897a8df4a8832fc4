//! Record classification and field decoding
//!
//! The decoder reads a [`RawRecord`] through kind-specific position
//! plans and produces a [`DecodedCdr`]. Field positions are those of
//! the GSX V07.01 accounting layout; START, ATTEMPT and STOP each
//! document some positions against the raw comma stream and others
//! against the quote-stripped stream, which is what [`Pos`] encodes.
//!
//! Decoding is one deterministic pass and is total: malformed or
//! truncated input degrades individual fields to "unavailable", and a
//! record whose type tag is not recognized still yields a
//! [`DecodedCdr`] carrying the offending tag.

use crate::error::DecodeError;
use crate::fields::{RawRecord, Tokens};
use crate::record::{CauseCode, DecodedCdr, MediaCodec, ReleaseInitiator, SipStatus};
use crate::RecordKind;

/// A field position, resolved against one of the two token streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pos {
    /// Index into the raw comma stream
    Raw(usize),
    /// Index into the quote-stripped stream
    Unquoted(usize),
}

/// Positions shared by every record kind
const GATEWAY: Pos = Pos::Raw(1);
const START_DATE: Pos = Pos::Raw(5);
const START_TIME: Pos = Pos::Raw(6);

/// Token index of the call id inside a signaling sub-record
const SIGNALING_CALL_ID: usize = 1;
/// Token index of the release status inside a signaling sub-record
const SIGNALING_STATUS: usize = 18;
/// A signaling sub-record shorter than this carries no usable data
/// (gateway-to-gateway legs emit only a 2-token stub)
const SIGNALING_MIN_TOKENS: usize = 19;
/// Contact header token index, per side
const INGRESS_CONTACT: usize = 12;
const EGRESS_CONTACT: usize = 13;

/// Per-kind field position table
struct FieldPlan {
    /// Field whose value reveals whether signaling sub-records are
    /// present (`SIP` / `GSX2GSX`)
    protocol_check: Pos,
    service_provider: Pos,
    calling_number: Pos,
    called_number: Pos,
    billing_number: Pos,
    route_label: Pos,
    route_attempt: Pos,
    route_selected: Pos,
    ingress_trunk_group: Pos,
    egress_trunk_group: Pos,
    gcid: Pos,
    ingress_local_ip: Pos,
    ingress_remote_ip: Pos,
    egress_local_ip: Pos,
    egress_remote_ip: Pos,
    /// Composite `local_ip:port/remote_ip:port` tokens
    ingress_rtp: Pos,
    egress_rtp: Pos,
    // Positions absent from some record kinds
    stop_date: Option<Pos>,
    disconnect_time: Option<Pos>,
    duration: Option<Pos>,
    disconnect_reason: Option<Pos>,
    disconnect_initiator: Option<Pos>,
    ingress_codec: Option<Pos>,
    egress_codec: Option<Pos>,
    ingress_packets_sent: Option<Pos>,
    ingress_packets_received: Option<Pos>,
    ingress_packets_lost: Option<Pos>,
    egress_packets_sent: Option<Pos>,
    egress_packets_received: Option<Pos>,
    egress_packets_lost: Option<Pos>,
}

static START_PLAN: FieldPlan = FieldPlan {
    protocol_check: Pos::Raw(41),
    service_provider: Pos::Raw(12),
    calling_number: Pos::Raw(15),
    called_number: Pos::Raw(16),
    billing_number: Pos::Raw(22),
    route_label: Pos::Raw(23),
    route_attempt: Pos::Raw(24),
    route_selected: Pos::Raw(25),
    ingress_trunk_group: Pos::Raw(28),
    egress_trunk_group: Pos::Unquoted(53),
    gcid: Pos::Unquoted(64),
    ingress_local_ip: Pos::Unquoted(101),
    ingress_remote_ip: Pos::Unquoted(102),
    egress_local_ip: Pos::Raw(26),
    egress_remote_ip: Pos::Raw(27),
    ingress_rtp: Pos::Raw(30),
    egress_rtp: Pos::Raw(32),
    stop_date: None,
    disconnect_time: None,
    duration: None,
    disconnect_reason: None,
    disconnect_initiator: None,
    ingress_codec: None,
    egress_codec: None,
    ingress_packets_sent: None,
    ingress_packets_received: None,
    ingress_packets_lost: None,
    egress_packets_sent: None,
    egress_packets_received: None,
    egress_packets_lost: None,
};

static ATTEMPT_PLAN: FieldPlan = FieldPlan {
    protocol_check: Pos::Raw(44),
    service_provider: Pos::Raw(14),
    calling_number: Pos::Raw(16),
    called_number: Pos::Raw(17),
    billing_number: Pos::Raw(24),
    route_label: Pos::Raw(25),
    route_attempt: Pos::Raw(26),
    route_selected: Pos::Raw(27),
    ingress_trunk_group: Pos::Raw(30),
    egress_trunk_group: Pos::Unquoted(57),
    gcid: Pos::Unquoted(71),
    ingress_local_ip: Pos::Unquoted(114),
    ingress_remote_ip: Pos::Unquoted(115),
    egress_local_ip: Pos::Raw(28),
    egress_remote_ip: Pos::Raw(29),
    ingress_rtp: Pos::Raw(32),
    egress_rtp: Pos::Raw(34),
    stop_date: Some(Pos::Unquoted(104)),
    disconnect_time: Some(Pos::Raw(9)),
    duration: None,
    disconnect_reason: Some(Pos::Raw(11)),
    disconnect_initiator: Some(Pos::Unquoted(56)),
    ingress_codec: Some(Pos::Unquoted(68)),
    egress_codec: Some(Pos::Unquoted(69)),
    ingress_packets_sent: None,
    ingress_packets_received: None,
    ingress_packets_lost: None,
    egress_packets_sent: None,
    egress_packets_received: None,
    egress_packets_lost: None,
};

static STOP_PLAN: FieldPlan = FieldPlan {
    protocol_check: Pos::Raw(51),
    service_provider: Pos::Raw(17),
    calling_number: Pos::Raw(19),
    called_number: Pos::Raw(20),
    billing_number: Pos::Raw(27),
    route_label: Pos::Raw(28),
    route_attempt: Pos::Raw(29),
    route_selected: Pos::Raw(30),
    ingress_trunk_group: Pos::Raw(33),
    egress_trunk_group: Pos::Unquoted(67),
    gcid: Pos::Unquoted(81),
    ingress_local_ip: Pos::Unquoted(124),
    ingress_remote_ip: Pos::Unquoted(125),
    egress_local_ip: Pos::Raw(31),
    egress_remote_ip: Pos::Raw(32),
    ingress_rtp: Pos::Raw(35),
    egress_rtp: Pos::Raw(37),
    stop_date: Some(Pos::Raw(10)),
    disconnect_time: Some(Pos::Raw(11)),
    duration: Some(Pos::Raw(13)),
    disconnect_reason: Some(Pos::Raw(14)),
    disconnect_initiator: Some(Pos::Unquoted(63)),
    ingress_codec: Some(Pos::Unquoted(78)),
    egress_codec: Some(Pos::Unquoted(79)),
    ingress_packets_sent: Some(Pos::Raw(39)),
    ingress_packets_received: Some(Pos::Raw(41)),
    ingress_packets_lost: Some(Pos::Unquoted(64)),
    egress_packets_sent: Some(Pos::Unquoted(145)),
    egress_packets_received: Some(Pos::Unquoted(147)),
    egress_packets_lost: Some(Pos::Unquoted(148)),
};

/// Determine the record kind from the type tag at position 0
pub fn classify(rec: &RawRecord) -> RecordKind {
    match rec.field(0) {
        Some(tag) => RecordKind::from_tag(tag),
        None => RecordKind::Unrecognized(String::new()),
    }
}

/// Decode a tokenized record into a [`DecodedCdr`].
///
/// Total over all inputs: an unrecognized type tag produces a record
/// with every field unavailable, never an error.
pub fn decode(rec: &RawRecord) -> DecodedCdr {
    let kind = classify(rec);
    let plan = match &kind {
        RecordKind::Start => &START_PLAN,
        RecordKind::Attempt => &ATTEMPT_PLAN,
        RecordKind::Stop => &STOP_PLAN,
        RecordKind::Unrecognized(tag) => {
            tracing::debug!(tag = %tag, "unrecognized record type tag");
            return DecodedCdr::empty(kind);
        }
    };

    let mut cdr = DecodedCdr::empty(kind);
    cdr.gateway = fetch(rec, GATEWAY);

    // Identification and timing
    cdr.call.start_date = fetch(rec, START_DATE);
    cdr.call.start_time = fetch(rec, START_TIME);
    cdr.call.stop_date = plan.stop_date.and_then(|p| fetch(rec, p));
    cdr.call.disconnect_time = plan.disconnect_time.and_then(|p| fetch(rec, p));
    cdr.call.duration_secs = plan.duration.and_then(|p| fetch(rec, p)).and_then(|raw| {
        match parse_duration(&raw) {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparseable duration");
                None
            }
        }
    });
    cdr.call.called_number = fetch(rec, plan.called_number);
    cdr.call.billing_number = fetch(rec, plan.billing_number);
    cdr.call.gcid = fetch(rec, plan.gcid);

    // Routing
    cdr.routing.route_label = fetch(rec, plan.route_label);
    cdr.routing.route_attempt = fetch(rec, plan.route_attempt);
    cdr.routing.route_selected = fetch(rec, plan.route_selected);
    cdr.routing.service_provider = fetch(rec, plan.service_provider);

    // Disconnect
    cdr.disconnect.reason = plan
        .disconnect_reason
        .and_then(|p| fetch(rec, p))
        .map(|code| CauseCode::resolve(&code));
    cdr.disconnect.initiator = plan
        .disconnect_initiator
        .and_then(|p| fetch(rec, p))
        .map(|tok| ReleaseInitiator::from_token(&tok));

    // Signaling sub-records
    let signaling = locate_signaling(rec, plan);
    let ingress_sig = signaling.ingress.map(|text| parse_signaling(text, INGRESS_CONTACT));
    let egress_sig = signaling.egress.map(|text| parse_signaling(text, EGRESS_CONTACT));
    if let Some(sig) = ingress_sig {
        cdr.ingress.call_id = sig.call_id;
        cdr.ingress.device_name = sig.device_name;
        cdr.disconnect.ingress_status = sig.status;
    }
    if let Some(sig) = egress_sig {
        cdr.egress.call_id = sig.call_id;
        cdr.egress.device_name = sig.device_name;
        cdr.disconnect.egress_status = sig.status;
    }

    // Calling number, decorated with the calling-name block when present
    cdr.call.calling_number = fetch(rec, plan.calling_number).map(|number| {
        match signaling.calling_name {
            Some(name) => format!("{} ({})", number, name),
            None => number,
        }
    });

    // Per-leg trunk groups, codecs, addresses
    cdr.ingress.trunk_group = fetch(rec, plan.ingress_trunk_group);
    cdr.egress.trunk_group = fetch(rec, plan.egress_trunk_group);
    cdr.ingress.codec = plan
        .ingress_codec
        .and_then(|p| fetch(rec, p))
        .map(|id| MediaCodec::resolve(&id));
    cdr.egress.codec = plan
        .egress_codec
        .and_then(|p| fetch(rec, p))
        .map(|id| MediaCodec::resolve(&id));

    cdr.ingress.local_signaling_ip = fetch(rec, plan.ingress_local_ip);
    cdr.ingress.remote_signaling_ip = fetch(rec, plan.ingress_remote_ip);
    cdr.egress.local_signaling_ip = fetch(rec, plan.egress_local_ip);
    cdr.egress.remote_signaling_ip = fetch(rec, plan.egress_remote_ip);

    let (local, remote) = rtp_addresses(fetch(rec, plan.ingress_rtp).as_deref());
    cdr.ingress.local_rtp_ip = local;
    cdr.ingress.remote_rtp_ip = remote;
    let (local, remote) = rtp_addresses(fetch(rec, plan.egress_rtp).as_deref());
    cdr.egress.local_rtp_ip = local;
    cdr.egress.remote_rtp_ip = remote;

    // Media packet counters (STOP only)
    cdr.ingress.packets_sent = plan.ingress_packets_sent.and_then(|p| fetch(rec, p));
    cdr.ingress.packets_received = plan.ingress_packets_received.and_then(|p| fetch(rec, p));
    cdr.ingress.packets_lost = plan
        .ingress_packets_lost
        .and_then(|p| fetch(rec, p))
        .map(|lost| annotate_packet_loss(&lost, cdr.ingress.packets_received.as_deref()));
    cdr.egress.packets_sent = plan.egress_packets_sent.and_then(|p| fetch(rec, p));
    cdr.egress.packets_received = plan.egress_packets_received.and_then(|p| fetch(rec, p));
    cdr.egress.packets_lost = plan
        .egress_packets_lost
        .and_then(|p| fetch(rec, p))
        .map(|lost| annotate_packet_loss(&lost, cdr.egress.packets_received.as_deref()));

    cdr
}

/// Fetch a position from the appropriate token stream; blank is `None`
fn fetch(rec: &RawRecord, pos: Pos) -> Option<String> {
    let token = match pos {
        Pos::Raw(i) => rec.field(i),
        Pos::Unquoted(i) => rec.unquoted_field(i),
    };
    token.filter(|t| !t.is_empty()).map(str::to_string)
}

/// The located signaling sub-records and calling-name block
struct SignalingSections<'a> {
    ingress: Option<&'a str>,
    egress: Option<&'a str>,
    calling_name: Option<&'a str>,
}

/// Work out which quoted sections hold which leg's signaling data.
///
/// When the kind-specific protocol-variant field names `SIP` or
/// `GSX2GSX`, section 1 is the ingress sub-record and section 3 the
/// egress one; otherwise only an egress sub-record may be present at
/// section 1. An egress candidate that never mentions `SIP` (the
/// 2-token gateway-to-gateway stub) is discarded.
fn locate_signaling<'a>(rec: &'a RawRecord, plan: &FieldPlan) -> SignalingSections<'a> {
    let check = match plan.protocol_check {
        Pos::Raw(i) => rec.field(i).unwrap_or(""),
        Pos::Unquoted(i) => rec.unquoted_field(i).unwrap_or(""),
    };
    let has_ingress = check.contains("SIP") || check.contains("GSX2GSX");

    let (ingress, egress_candidate) = if has_ingress {
        (rec.section(1), rec.section(3))
    } else {
        (None, rec.section(1))
    };

    let egress = egress_candidate
        .filter(|text| !text.is_empty())
        .filter(|text| text.contains("SIP"));

    SignalingSections {
        ingress: ingress.filter(|text| !text.is_empty()),
        egress,
        calling_name: rec.section(5).filter(|text| !text.is_empty()),
    }
}

/// Fields pulled from one leg's signaling sub-record
struct LegSignaling {
    call_id: Option<String>,
    status: Option<SipStatus>,
    device_name: Option<String>,
}

/// Parse a per-leg signaling sub-record.
///
/// Sub-records shorter than [`SIGNALING_MIN_TOKENS`] carry no usable
/// data for that side and decode to all-unavailable.
fn parse_signaling(text: &str, contact_idx: usize) -> LegSignaling {
    let tokens = Tokens::split(text, ',');
    if tokens.len() < SIGNALING_MIN_TOKENS {
        return LegSignaling {
            call_id: None,
            status: None,
            device_name: None,
        };
    }

    LegSignaling {
        call_id: tokens.get_nonblank(SIGNALING_CALL_ID).map(str::to_string),
        status: tokens
            .get_nonblank(SIGNALING_STATUS)
            .map(SipStatus::resolve),
        device_name: tokens.get(contact_idx).and_then(device_name_from_contact),
    }
}

/// Extract an endpoint device identifier from an INVITE Contact header.
///
/// Only phone/softphone/voicemail endpoints (`csf`, `sep`, `vms`) are
/// attempted; the name sits in the second `=` segment, or the third
/// when a `transport` parameter shifts the segments.
fn device_name_from_contact(contact: &str) -> Option<String> {
    let lower = contact.to_ascii_lowercase();
    if !["csf", "sep", "vms"].iter().any(|t| lower.contains(t)) {
        return None;
    }

    let segments = Tokens::split(contact, '=');
    let want = if lower.contains("transport") { 2 } else { 1 };
    segments.get_nonblank(want).map(str::to_string)
}

/// Parse the duration field (hundredths of a second) into seconds
fn parse_duration(raw: &str) -> Result<f64, DecodeError> {
    let hundredths: i64 = raw
        .parse()
        .map_err(|_| DecodeError::InvalidDuration(raw.to_string()))?;
    Ok((hundredths as f64) / 100.0)
}

/// Split a composite `local_ip:port/remote_ip:port` token into the two
/// address portions, dropping the ports
fn split_rtp_endpoints(token: &str) -> Result<(Option<String>, Option<String>), DecodeError> {
    if !token.contains('/') {
        return Err(DecodeError::MalformedEndpoint(token.to_string()));
    }
    let halves = Tokens::split(token, '/');
    let address = |idx: usize| {
        halves
            .get(idx)
            .and_then(|half| Tokens::split(half, ':').get_nonblank(0))
            .map(str::to_string)
    };
    Ok((address(0), address(1)))
}

/// Resolve an optional RTP composite token, logging malformed ones
fn rtp_addresses(token: Option<&str>) -> (Option<String>, Option<String>) {
    match token {
        None => (None, None),
        Some(tok) => match split_rtp_endpoints(tok) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed RTP endpoint field");
                (None, None)
            }
        },
    }
}

/// Append a loss percentage to the lost-packet counter when both it
/// and the received counter parse and the ratio is meaningful
fn annotate_packet_loss(lost: &str, received: Option<&str>) -> String {
    let parsed: Result<(i64, i64), DecodeError> = (|| {
        let lost_n: i64 = lost
            .parse()
            .map_err(|_| DecodeError::InvalidCounter(lost.to_string()))?;
        let rcvd_n: i64 = received
            .unwrap_or("")
            .parse()
            .map_err(|_| DecodeError::InvalidCounter(received.unwrap_or("").to_string()))?;
        Ok((lost_n, rcvd_n))
    })();

    match parsed {
        Ok((lost_n, rcvd_n)) if lost_n >= 0 && rcvd_n > 0 => {
            let pct = (lost_n as f64 / rcvd_n as f64) * 100.0;
            format!("{} ({:.1}%)", lost_n, pct)
        }
        Ok((lost_n, _)) => lost_n.to_string(),
        Err(_) => lost.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        annotate_packet_loss, classify, decode, device_name_from_contact, parse_duration,
        split_rtp_endpoints,
    };
    use crate::fields::RawRecord;
    use crate::RecordKind;

    #[test]
    fn test_classify_known_tags() {
        assert_eq!(classify(&RawRecord::new("START,GW1")), RecordKind::Start);
        assert_eq!(classify(&RawRecord::new("ATTEMPT,GW1")), RecordKind::Attempt);
        assert_eq!(classify(&RawRecord::new("STOP,GW1")), RecordKind::Stop);
    }

    #[test]
    fn test_classify_unknown_tag() {
        assert_eq!(
            classify(&RawRecord::new("INTERMEDIATE,GW1")),
            RecordKind::Unrecognized("INTERMEDIATE".to_string())
        );
        assert_eq!(
            classify(&RawRecord::new("")),
            RecordKind::Unrecognized(String::new())
        );
    }

    #[test]
    fn test_unrecognized_decodes_to_empty_record() {
        let cdr = decode(&RawRecord::new("BOGUS,GW1,whatever,else"));
        assert_eq!(cdr.kind, RecordKind::Unrecognized("BOGUS".to_string()));
        assert_eq!(cdr.gateway, None);
        assert_eq!(cdr.call.calling_number, None);
        assert_eq!(cdr.disconnect.reason, None);
    }

    #[test]
    fn test_truncated_record_degrades_to_unavailable() {
        // Only the tag and gateway survive; everything else is short
        let cdr = decode(&RawRecord::new("START,LABGSX1,0x01"));
        assert_eq!(cdr.kind, RecordKind::Start);
        assert_eq!(cdr.gateway.as_deref(), Some("LABGSX1"));
        assert_eq!(cdr.call.start_date, None);
        assert_eq!(cdr.routing.route_label, None);
        assert_eq!(cdr.ingress.local_rtp_ip, None);
        assert_eq!(cdr.egress.trunk_group, None);
    }

    #[test]
    fn test_parse_duration_hundredths() {
        assert_eq!(parse_duration("306").unwrap(), 3.06);
        assert_eq!(parse_duration("0").unwrap(), 0.0);
        assert!(parse_duration("12s").is_err());
    }

    #[test]
    fn test_split_rtp_endpoints() {
        let (local, remote) =
            split_rtp_endpoints("10.158.130.205:5004/10.158.140.133:2224").unwrap();
        assert_eq!(local.as_deref(), Some("10.158.130.205"));
        assert_eq!(remote.as_deref(), Some("10.158.140.133"));
    }

    #[test]
    fn test_split_rtp_endpoints_half_empty() {
        // Egress media never came up: "ip:port/:0"
        let (local, remote) = split_rtp_endpoints("10.158.130.205:5000/:0").unwrap();
        assert_eq!(local.as_deref(), Some("10.158.130.205"));
        assert_eq!(remote, None);
    }

    #[test]
    fn test_split_rtp_endpoints_malformed() {
        assert!(split_rtp_endpoints("10.158.130.205:5000").is_err());
    }

    #[test]
    fn test_device_name_from_contact() {
        assert_eq!(
            device_name_from_contact("sip:1001@10.0.0.1;x=CSFjdoe"),
            Some("CSFjdoe".to_string())
        );
        assert_eq!(
            device_name_from_contact("sip:1001@10.0.0.1;transport=tcp;x=SEPAABBCCDDEEFF"),
            Some("SEPAABBCCDDEEFF".to_string())
        );
        assert_eq!(device_name_from_contact("sip:+15551234@10.0.0.1:5060"), None);
        assert_eq!(device_name_from_contact(""), None);
    }

    #[test]
    fn test_annotate_packet_loss() {
        assert_eq!(annotate_packet_loss("10", Some("129")), "10 (7.8%)");
        assert_eq!(annotate_packet_loss("0", Some("129")), "0 (0.0%)");
        assert_eq!(annotate_packet_loss("5", Some("0")), "5");
        assert_eq!(annotate_packet_loss("n/a", Some("129")), "n/a");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let raw = "STOP,GW,,,,02/22/2013,17:02:12.5,,,,02/22/2013,17:02:20.7,,306,16";
        let a = decode(&RawRecord::new(raw));
        let b = decode(&RawRecord::new(raw));
        assert_eq!(a, b);
        assert_eq!(a.call.duration_secs, Some(3.06));
        assert_eq!(
            a.disconnect.reason.as_ref().map(ToString::to_string),
            Some("16 (Normal Call Clearing)".to_string())
        );
    }
}
