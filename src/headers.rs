//! Header value normalization: addresses, dates and labels

use crate::error::{IndexError, Result};
use chrono::{DateTime, NaiveDateTime};

/// Layouts tried when a date carries no usable zone
const ZONELESS_FORMATS: [&str; 2] = ["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M"];

/// Extract the bare mailbox from a single address, e.g. `"Jane <jane@example.com>"`
///
/// Malformed input yields an empty string.
#[must_use]
pub fn normalize_address(raw: &str) -> String {
    let s = strip_comments(raw);
    let s = s.trim();

    if let Some(start) = s.find('<') {
        return s[start + 1..]
            .split_once('>')
            .map(|(address, _)| address.trim().to_string())
            .unwrap_or_default();
    }

    let bare = s.trim_matches('"');
    if bare.contains('@') && !bare.contains(char::is_whitespace) {
        bare.to_string()
    } else {
        String::new()
    }
}

/// Normalize a `To`/`Cc`/`Bcc` value into bare addresses
///
/// All whitespace is removed before splitting on commas; the order and any
/// duplicates of the header are kept.
#[must_use]
pub fn split_address_list(value: &str) -> Vec<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact.split(',').map(normalize_address).collect()
}

/// Convert an RFC 2822 style date into epoch milliseconds
///
/// The embedded zone offset is applied; a missing or unknown zone counts as
/// UTC. A mismatched day-of-week is ignored.
pub fn date_to_epoch_millis(value: &str) -> Result<i64> {
    let cleaned = strip_comments(value);
    let cleaned = cleaned.trim();
    let dated = match cleaned.split_once(',') {
        Some((day, rest)) if day.trim().chars().all(|c| c.is_ascii_alphabetic()) => rest.trim(),
        _ => cleaned,
    };

    if let Ok(dt) = DateTime::parse_from_rfc2822(dated) {
        return Ok(dt.timestamp_millis());
    }

    parse_with_fallback_zone(dated)
        .ok_or_else(|| IndexError::UnparsableTimestamp(value.to_string()))
}

/// Split a label header into trimmed, lower-cased labels
#[must_use]
pub fn parse_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

fn parse_with_fallback_zone(s: &str) -> Option<i64> {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }

    let stamp = tokens[..4].join(" ");
    let naive = ZONELESS_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&stamp, f).ok())?;
    let offset = tokens.get(4).and_then(|z| zone_offset_seconds(z)).unwrap_or(0);

    Some((naive.and_utc().timestamp() - offset) * 1000)
}

/// Numeric `+hhmm` / `-hhmm` zone in seconds east of UTC
fn zone_offset_seconds(zone: &str) -> Option<i64> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i64 = digits[..2].parse().ok()?;
    let minutes: i64 = digits[2..].parse().ok()?;

    Some(sign * (hours * 3600 + minutes * 60))
}

/// Drop RFC 822 `( ... )` comments
fn strip_comments(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut depth = 0usize;

    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }

    result
}
