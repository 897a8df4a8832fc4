//! Static code-to-description tables
//!
//! Three lookup domains: call disconnect cause codes (Q.850 values as
//! reported in the platform's DR field), SIP response reason phrases,
//! and media codec identifiers. Tables are process-wide constants
//! compiled against GSX release V07.01; an unrecognized key is a
//! normal outcome and resolves to `None`, never a panic.

/// Q.850 / ISDN cause codes used in the call disconnect reason field
static CAUSE_CODES: &[(u16, &str)] = &[
    (1, "Unallocated Number"),
    (2, "No Route to Specified Transit Network"),
    (3, "No Route to Destination"),
    (16, "Normal Call Clearing"),
    (17, "User Busy"),
    (18, "No User Responding"),
    (19, "No Answer from User"),
    (21, "Call Rejected"),
    (22, "Number Changed"),
    (26, "Non-Selected User Clearing"),
    (27, "Destination Out of Order"),
    (28, "Invalid Number Format"),
    (29, "Facility Rejected"),
    (31, "Normal, Unspecified"),
    (34, "No Circuit/Channel Available"),
    (38, "Network Out of Order"),
    (41, "Temporary Failure"),
    (42, "Switching Equipment Congestion"),
    (44, "Requested Circuit/Channel Not Available"),
    (47, "Resource Unavailable, Unspecified"),
    (57, "Bearer Capability Not Authorized"),
    (58, "Bearer Capability Not Presently Available"),
    (63, "Service or Option Not Available"),
    (65, "Bearer Capability Not Implemented"),
    (79, "Service or Option Not Implemented"),
    (88, "Incompatible Destination"),
    (95, "Invalid Message, Unspecified"),
    (102, "Recovery on Timer Expiry"),
    (111, "Protocol Error, Unspecified"),
    (127, "Interworking, Unspecified"),
];

/// SIP response reason phrases for the per-leg release status field
static SIP_RESPONSES: &[(u16, &str)] = &[
    (100, "Trying"),
    (180, "Ringing"),
    (181, "Call Is Being Forwarded"),
    (183, "Session Progress"),
    (200, "OK"),
    (302, "Moved Temporarily"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (408, "Request Timeout"),
    (410, "Gone"),
    (413, "Request Entity Too Large"),
    (415, "Unsupported Media Type"),
    (480, "Temporarily Unavailable"),
    (481, "Call/Transaction Does Not Exist"),
    (484, "Address Incomplete"),
    (486, "Busy Here"),
    (487, "Request Terminated"),
    (488, "Not Acceptable Here"),
    (500, "Server Internal Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Server Timeout"),
    (600, "Busy Everywhere"),
    (603, "Decline"),
    (604, "Does Not Exist Anywhere"),
    (606, "Not Acceptable"),
];

/// Media codec identifiers.
///
/// The platform reports codecs two ways depending on field and
/// release: the packet-service form `P:<family>:<law>` and bare RTP
/// payload-type numbers. Both live in one table.
static CODECS: &[(&str, &str)] = &[
    // Packet service profile identifiers
    ("P:1:0", "G.711 u-law w/ Silence Suppression"),
    ("P:1:1", "G.711 u-law"),
    ("P:2:1", "G.711 w/ Silence Suppression"),
    ("P:3:0", "G.726"),
    ("P:4:0", "G.729A"),
    ("P:5:0", "G.729A w/ Silence Suppression"),
    ("P:6:0", "Fax Relay"),
    // RTP static payload types
    ("0", "G.711 u-law"),
    ("4", "G.723.1"),
    ("8", "G.711 A-law"),
    ("9", "G.722"),
    ("15", "G.728"),
    ("18", "G.729"),
];

/// Description for a disconnect cause code, when known
pub fn cause_description(code: u16) -> Option<&'static str> {
    CAUSE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

/// Reason phrase for a SIP response code, when known
pub fn sip_reason(code: u16) -> Option<&'static str> {
    SIP_RESPONSES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

/// Description for a codec identifier, when known
pub fn codec_description(id: &str) -> Option<&'static str> {
    CODECS
        .iter()
        .find(|(c, _)| *c == id)
        .map(|(_, desc)| *desc)
}

#[cfg(test)]
mod tests {
    use super::{cause_description, codec_description, sip_reason};

    #[test]
    fn test_known_cause_codes() {
        assert_eq!(cause_description(16), Some("Normal Call Clearing"));
        assert_eq!(cause_description(21), Some("Call Rejected"));
        assert_eq!(cause_description(102), Some("Recovery on Timer Expiry"));
    }

    #[test]
    fn test_unknown_cause_code_is_none() {
        assert_eq!(cause_description(999), None);
        assert_eq!(cause_description(0), None);
    }

    #[test]
    fn test_sip_reasons() {
        assert_eq!(sip_reason(401), Some("Unauthorized"));
        assert_eq!(sip_reason(486), Some("Busy Here"));
        assert_eq!(sip_reason(699), None);
    }

    #[test]
    fn test_codec_identifiers_both_forms() {
        assert_eq!(codec_description("P:2:1"), Some("G.711 w/ Silence Suppression"));
        assert_eq!(codec_description("P:4:0"), Some("G.729A"));
        assert_eq!(codec_description("8"), Some("G.711 A-law"));
        assert_eq!(codec_description("P:9:9"), None);
    }
}
