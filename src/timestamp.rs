use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use simd_json::BorrowedValue;
use simd_json::prelude::*;

/// Keys checked in order on each transcript line.
const TIMESTAMP_KEYS: [&str; 2] = ["timestamp", "ts"];

/// Extract the point in time a transcript line was written.
///
/// Looks at `timestamp` first, then `ts`. Returns `None` for lines that aren't
/// JSON objects, lack both keys, or carry a value that doesn't parse as a date.
pub fn extract_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut bytes = line.as_bytes().to_vec();
    let value = simd_json::to_borrowed_value(&mut bytes).ok()?;
    let object = value.as_object()?;

    TIMESTAMP_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(value_to_utc))
}

/// Strings are parsed as dates, numbers are epoch milliseconds.
fn value_to_utc(value: &BorrowedValue) -> Option<DateTime<Utc>> {
    if let Some(text) = value.as_str() {
        return parse_timestamp_str(text);
    }
    if let Some(millis) = value.as_i64() {
        return DateTime::from_timestamp_millis(millis);
    }
    value
        .as_f64()
        .filter(|millis| millis.is_finite())
        .and_then(|millis| DateTime::from_timestamp_millis(millis.trunc() as i64))
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a date string. Strings without an offset are taken as UTC.
pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    // A trailing `Z` without the rest of RFC 3339 (e.g. no seconds) still means UTC.
    let naive_text = text.strip_suffix('Z').unwrap_or(text);
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
