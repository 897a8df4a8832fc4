//! Text rendering of decoded records
//!
//! Two read-only views over a [`DecodedCdr`]: a condensed bordered
//! table of commonly inspected fields, and a full grouped listing of
//! every decoded field. Unavailable fields render as `N/A` in both
//! views. Rendering never mutates the record, so repeated calls yield
//! byte-identical output.

use std::fmt::Write as _;

use crate::record::DecodedCdr;
use crate::RecordKind;

/// Placeholder for fields the record did not carry
const UNAVAILABLE: &str = "N/A";
/// Route label for gateway-to-gateway calls, which never carry one
const GW_GW_ROUTE: &str = "N/A (GW-GW call)";

/// Key column bounds for the condensed table
const KEY_COL_MIN: usize = 22;
const KEY_COL_MAX: usize = 46;

/// Render the condensed summary view.
pub fn render_condensed(cdr: &DecodedCdr) -> String {
    if let RecordKind::Unrecognized(tag) = &cdr.kind {
        return unrecognized_notice(tag);
    }

    let mut out = String::new();
    table_section(&mut out, "Overall Call Data", &overall_rows(cdr));
    table_section(&mut out, "Call Routing Details", &routing_rows(cdr));
    table_section(&mut out, "Call Disconnect Details", &disconnect_rows(cdr));
    table_section(&mut out, "Ingress Call Data", &leg_rows(cdr, Side::Ingress));
    table_section(&mut out, "Egress Call Data", &leg_rows(cdr, Side::Egress));
    out
}

/// Render the full field-by-field view.
pub fn render_full(cdr: &DecodedCdr) -> String {
    if let RecordKind::Unrecognized(tag) = &cdr.kind {
        return unrecognized_notice(tag);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} record, all decoded fields", cdr.kind.name());
    list_section(&mut out, "Identification", &identification_rows(cdr));
    list_section(&mut out, "Timing", &timing_rows(cdr));
    list_section(&mut out, "Routing", &routing_rows(cdr));
    list_section(&mut out, "Disconnect", &disconnect_rows(cdr));
    list_section(&mut out, "Ingress Leg", &leg_rows(cdr, Side::Ingress));
    list_section(&mut out, "Egress Leg", &leg_rows(cdr, Side::Egress));
    out
}

fn unrecognized_notice(tag: &str) -> String {
    let shown = if tag.is_empty() { "<blank>" } else { tag };
    format!(
        "Unrecognized record type \"{}\" - only START, ATTEMPT and STOP records can be decoded.\n",
        shown
    )
}

enum Side {
    Ingress,
    Egress,
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn overall_rows(cdr: &DecodedCdr) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Record Type", cdr.kind.name().to_string()),
        ("Gateway Name", or_na(cdr.gateway.clone())),
        ("Start Date", or_na(cdr.call.start_date.clone())),
        ("Start Time", or_na(cdr.call.start_time.clone())),
        ("Stop Date", or_na(cdr.call.stop_date.clone())),
        ("Disconnect Time", or_na(cdr.call.disconnect_time.clone())),
    ];
    rows.push((
        "Call Duration (secs)",
        or_na(cdr.call.duration_secs.map(|d| format!("{:.2}", d))),
    ));
    rows.push(("Calling Number", or_na(cdr.call.calling_number.clone())));
    rows.push(("Called Number", or_na(cdr.call.called_number.clone())));
    rows.push(("Billing Number", or_na(cdr.call.billing_number.clone())));
    rows.push(("GCID", or_na(cdr.call.gcid.clone())));
    rows
}

fn identification_rows(cdr: &DecodedCdr) -> Vec<(&'static str, String)> {
    vec![
        ("Record Type", cdr.kind.name().to_string()),
        ("Gateway Name", or_na(cdr.gateway.clone())),
        ("GCID", or_na(cdr.call.gcid.clone())),
        ("Calling Number", or_na(cdr.call.calling_number.clone())),
        ("Called Number", or_na(cdr.call.called_number.clone())),
        ("Billing Number", or_na(cdr.call.billing_number.clone())),
    ]
}

fn timing_rows(cdr: &DecodedCdr) -> Vec<(&'static str, String)> {
    vec![
        ("Start Date", or_na(cdr.call.start_date.clone())),
        ("Start Time", or_na(cdr.call.start_time.clone())),
        ("Stop Date", or_na(cdr.call.stop_date.clone())),
        ("Disconnect Time", or_na(cdr.call.disconnect_time.clone())),
        (
            "Call Duration (secs)",
            or_na(cdr.call.duration_secs.map(|d| format!("{:.2}", d))),
        ),
    ]
}

fn routing_rows(cdr: &DecodedCdr) -> Vec<(&'static str, String)> {
    vec![
        (
            "Route Label",
            cdr.routing
                .route_label
                .clone()
                .unwrap_or_else(|| GW_GW_ROUTE.to_string()),
        ),
        ("Route Attempt Number", or_na(cdr.routing.route_attempt.clone())),
        ("Route Selected", or_na(cdr.routing.route_selected.clone())),
        (
            "Service Provider",
            or_na(cdr.routing.service_provider.clone()),
        ),
    ]
}

fn disconnect_rows(cdr: &DecodedCdr) -> Vec<(&'static str, String)> {
    vec![
        (
            "Call Disconnect Reason",
            or_na(cdr.disconnect.reason.as_ref().map(ToString::to_string)),
        ),
        (
            "Call Release Initiator",
            or_na(cdr.disconnect.initiator.as_ref().map(ToString::to_string)),
        ),
        (
            "Ingress Release Status",
            or_na(
                cdr.disconnect
                    .ingress_status
                    .as_ref()
                    .map(ToString::to_string),
            ),
        ),
        (
            "Egress Release Status",
            or_na(
                cdr.disconnect
                    .egress_status
                    .as_ref()
                    .map(ToString::to_string),
            ),
        ),
    ]
}

fn leg_rows(cdr: &DecodedCdr, side: Side) -> Vec<(&'static str, String)> {
    let leg = match side {
        Side::Ingress => &cdr.ingress,
        Side::Egress => &cdr.egress,
    };
    vec![
        ("Trunk Group", or_na(leg.trunk_group.clone())),
        ("Call ID", or_na(leg.call_id.clone())),
        (
            "Codec",
            or_na(leg.codec.as_ref().map(ToString::to_string)),
        ),
        ("Device Name", or_na(leg.device_name.clone())),
        ("Local Signaling IP", or_na(leg.local_signaling_ip.clone())),
        (
            "Remote Signaling IP",
            or_na(leg.remote_signaling_ip.clone()),
        ),
        ("Local RTP IP", or_na(leg.local_rtp_ip.clone())),
        ("Remote RTP IP", or_na(leg.remote_rtp_ip.clone())),
        ("Packets Sent", or_na(leg.packets_sent.clone())),
        ("Packets Received", or_na(leg.packets_received.clone())),
        ("Packets Lost", or_na(leg.packets_lost.clone())),
    ]
}

/// One bordered section of the condensed view
fn table_section(out: &mut String, title: &str, rows: &[(&'static str, String)]) {
    let key_width = rows
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .clamp(KEY_COL_MIN, KEY_COL_MAX);
    let border = format!("|{}", "-".repeat(key_width + 2));

    let _ = writeln!(out, "{}", border);
    let _ = writeln!(out, "| {}", title);
    let _ = writeln!(out, "{}", border);
    for (key, value) in rows {
        let _ = writeln!(out, "| {:<key_width$} | {}", key, value);
    }
    let _ = writeln!(out);
}

/// One labeled group of the full view
fn list_section(out: &mut String, title: &str, rows: &[(&'static str, String)]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "[{}]", title);
    for (key, value) in rows {
        let _ = writeln!(out, "  {}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::{render_condensed, render_full};
    use crate::decoder::decode;
    use crate::fields::RawRecord;
    use crate::record::DecodedCdr;
    use crate::RecordKind;

    fn stop_record() -> DecodedCdr {
        decode(&RawRecord::new(
            "STOP,GW,,,,02/22/2013,17:02:12.5,,,,02/22/2013,17:02:20.7,,306,16",
        ))
    }

    #[test]
    fn test_condensed_shows_decoded_cause() {
        let view = render_condensed(&stop_record());
        assert!(view.contains("16 (Normal Call Clearing)"));
        assert!(view.contains("| Overall Call Data"));
        assert!(view.contains("Call Duration (secs)"));
        assert!(view.contains("3.06"));
    }

    #[test]
    fn test_condensed_keeps_unavailable_rows() {
        let view = render_condensed(&stop_record());
        // Truncated record: leg data missing, rows still rendered
        assert!(view.contains("| Ingress Call Data"));
        assert!(view.contains("N/A"));
    }

    #[test]
    fn test_full_groups_every_field() {
        let view = render_full(&stop_record());
        for header in [
            "[Identification]",
            "[Timing]",
            "[Routing]",
            "[Disconnect]",
            "[Ingress Leg]",
            "[Egress Leg]",
        ] {
            assert!(view.contains(header), "missing {header}");
        }
        assert!(view.contains("16 (Normal Call Clearing)"));
    }

    #[test]
    fn test_route_label_fallback_for_gw_gw_calls() {
        let view = render_condensed(&stop_record());
        assert!(view.contains("N/A (GW-GW call)"));
    }

    #[test]
    fn test_unrecognized_notice_names_the_tag() {
        let cdr = DecodedCdr::empty(RecordKind::Unrecognized("INTERMEDIATE".to_string()));
        let condensed = render_condensed(&cdr);
        let full = render_full(&cdr);
        assert!(condensed.contains("INTERMEDIATE"));
        assert!(full.contains("INTERMEDIATE"));
        assert!(condensed.contains("Unrecognized record type"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let cdr = stop_record();
        assert_eq!(render_condensed(&cdr), render_condensed(&cdr));
        assert_eq!(render_full(&cdr), render_full(&cdr));
    }
}
