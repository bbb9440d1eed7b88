//! Key=value record parser for `content query` output
//!
//! Each line is one record; fields are `key=value` pairs separated by
//! commas. A value stops at the next comma, so values cannot themselves
//! contain unescaped commas; that limitation of the wire format is
//! preserved here, not papered over. Unmatched or absent keys resolve to
//! the `unknown` sentinel, never a crash.

use crate::model::{CallKind, CallLogEntry, MessageEntry, MessageKind, UNKNOWN};
use chrono::{Local, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref KV_RE: Regex = Regex::new(r"(\w+)=([^,]*)").unwrap();
}

/// Look up one field on a record line
///
/// `NULL` is the provider's way of saying "no value"; it degrades to `None`
/// like a missing key does.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    KV_RE
        .captures_iter(line)
        .map(|c| {
            let (_, [k, v]) = c.extract();
            (k, v)
        })
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

fn field_or_unknown(line: &str, key: &str) -> String {
    field(line, key).unwrap_or(UNKNOWN).to_string()
}

/// Format an epoch-millisecond field as a local date string
///
/// Non-numeric or out-of-range timestamps degrade to `unknown`.
fn format_epoch_millis(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return UNKNOWN.to_string();
    };
    match raw.parse::<i64>() {
        Ok(ms) => match Local.timestamp_millis_opt(ms).single() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => {
                warn!(raw, "timestamp out of range");
                UNKNOWN.to_string()
            }
        },
        Err(_) => {
            warn!(raw, "non-numeric timestamp field");
            UNKNOWN.to_string()
        }
    }
}

fn is_record_line(line: &str) -> bool {
    line.contains('=')
}

/// Decode call-log records, one per line; undecodable fields become `unknown`
pub fn parse_call_log(raw: &str) -> Vec<CallLogEntry> {
    raw.lines()
        .filter(|l| is_record_line(l))
        .map(|line| CallLogEntry {
            date: format_epoch_millis(field(line, "date")),
            number: field_or_unknown(line, "number"),
            kind: field(line, "type").map_or(CallKind::Unknown, CallKind::from_code),
            duration_secs: field_or_unknown(line, "duration"),
            contact: field_or_unknown(line, "name"),
        })
        .collect()
}

/// Decode SMS records, one per line; undecodable fields become `unknown`
pub fn parse_sms_log(raw: &str) -> Vec<MessageEntry> {
    raw.lines()
        .filter(|l| is_record_line(l))
        .map(|line| MessageEntry {
            date: format_epoch_millis(field(line, "date")),
            address: field_or_unknown(line, "address"),
            kind: field(line, "type").map_or(MessageKind::Unknown, MessageKind::from_code),
            body: field_or_unknown(line, "body"),
        })
        .collect()
}

/// Extract a `key: value` field from indented dumpsys-style output
pub fn colon_field(raw: &str, key: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix(key).and_then(|rest| rest.strip_prefix(':')))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Map the numeric `dumpsys battery` status code to a label
pub fn battery_status_label(code: &str) -> &'static str {
    match code.trim() {
        "1" => "Unknown",
        "2" => "Charging",
        "3" => "Discharging",
        "4" => "Not charging",
        "5" => "Full",
        _ => UNKNOWN,
    }
}

/// Map the numeric `dumpsys battery` health code to a label
pub fn battery_health_label(code: &str) -> &'static str {
    match code.trim() {
        "1" => "Unknown",
        "2" => "Good",
        "3" => "Overheat",
        "4" => "Dead",
        "5" => "Over voltage",
        "6" => "Failure",
        "7" => "Cold",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALL_LINE: &str =
        "Row: 0 _id=1, number=12345, date=1700000000000, duration=30, type=1, name=NULL";

    #[test]
    fn call_record_decodes_with_type_mapping() {
        let entries = parse_call_log(CALL_LINE);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.number, "12345");
        assert_eq!(entry.kind, CallKind::Incoming);
        assert_eq!(entry.duration_secs, "30");
        assert_eq!(entry.contact, UNKNOWN);
        // 1700000000000 is 2023-11-14 UTC; allow a day of timezone skew
        assert!(entry.date.starts_with("2023-11-1"), "got {}", entry.date);
    }

    #[test]
    fn missing_fields_become_unknown() {
        let entries = parse_call_log("Row: 0 _id=7, type=3");
        let entry = &entries[0];
        assert_eq!(entry.number, UNKNOWN);
        assert_eq!(entry.date, UNKNOWN);
        assert_eq!(entry.kind, CallKind::Missed);
    }

    #[test]
    fn non_numeric_timestamp_degrades_not_panics() {
        let entries = parse_call_log("Row: 0 date=garbage, number=1, type=2");
        assert_eq!(entries[0].date, UNKNOWN);
        assert_eq!(entries[0].kind, CallKind::Outgoing);
    }

    #[test]
    fn unknown_type_code_maps_to_unknown_kind() {
        let entries = parse_call_log("Row: 0 number=1, type=99");
        assert_eq!(entries[0].kind, CallKind::Unknown);
    }

    #[test]
    fn sms_record_decodes() {
        let entries = parse_sms_log("Row: 0 address=555, date=1700000000000, type=2, body=hello there");
        let entry = &entries[0];
        assert_eq!(entry.address, "555");
        assert_eq!(entry.kind, MessageKind::Sent);
        assert_eq!(entry.body, "hello there");
    }

    #[test]
    fn body_values_stop_at_the_next_comma() {
        // Known wire-format limitation: the remainder after the comma is lost.
        let entries = parse_sms_log("Row: 0 address=555, type=1, body=hi, see you at 5");
        assert_eq!(entries[0].body, "hi");
        assert_eq!(entries[0].kind, MessageKind::Received);
    }

    #[test]
    fn blank_and_non_record_lines_are_ignored() {
        let raw = "\nRow: 0 number=1, type=1\nsome diagnostic output\n\n";
        assert_eq!(parse_call_log(raw).len(), 1);
        assert!(parse_sms_log("").is_empty());
    }

    #[test]
    fn colon_fields_from_dumpsys_output() {
        let raw = "Current Battery Service state:\n  AC powered: false\n  level: 87\n  status: 2\n";
        assert_eq!(colon_field(raw, "level").as_deref(), Some("87"));
        assert_eq!(colon_field(raw, "status").as_deref(), Some("2"));
        assert_eq!(colon_field(raw, "voltage"), None);
        assert_eq!(battery_status_label("2"), "Charging");
        assert_eq!(battery_health_label("2"), "Good");
    }
}
