//! Field normalization for raw backend records.
//!
//! Every function here is total: malformed input degrades to an empty string,
//! `0` or `None`, never a panic or an error. Callers decide whether a degraded
//! value makes the whole record unusable.
//!
//! ## Naming variance
//!
//! Backend versions have renamed several fields. Each logical field has one
//! ordered alias list below; the first alias holding a non-blank value wins.
//!
//! | Field      | Aliases (priority order)                  |
//! |------------|-------------------------------------------|
//! | subject    | `courseName`, `subjectName`               |
//! | code       | `subjectCode`, `courseCode`               |
//! | classroom  | `roomName`, `classroomName`, `className`  |
//! | lecturer   | `lecturerName`, `lecturer`                |
//! | topic      | `topic`                                   |
//! | open flag  | `open`, `isOpen`, `opened`, `is_open`     |

use crate::patterns::{RE_DATE_PREFIX, RE_TIME_OF_DAY};
use serde_json::{Map, Value};

pub const SUBJECT_NAME_KEYS: &[&str] = &["courseName", "subjectName"];
pub const SUBJECT_CODE_KEYS: &[&str] = &["subjectCode", "courseCode"];
pub const CLASSROOM_KEYS: &[&str] = &["roomName", "classroomName", "className"];
pub const LECTURER_KEYS: &[&str] = &["lecturerName", "lecturer"];
pub const TOPIC_KEYS: &[&str] = &["topic"];
pub const OPEN_FLAG_KEYS: &[&str] = &["open", "isOpen", "opened", "is_open"];

const WEEKDAY_NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

// ─────────────────────────────────────────────────────────────────────────────
// Time of day
// ─────────────────────────────────────────────────────────────────────────────

/// Normalizes a time-of-day string to zero-padded `HH:mm`.
///
/// `"07:00:00"` → `"07:00"`, `"7:5"` → `"07:05"`, `None`/`""` → `""`.
/// Input that is not `H:m[:s]` is returned trimmed and otherwise unchanged.
pub fn normalize_time(raw: Option<&str>) -> String {
    let trimmed = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return String::new(),
    };

    match RE_TIME_OF_DAY.captures(trimmed) {
        Some(caps) => format!("{:0>2}:{:0>2}", &caps[1], &caps[2]),
        None => trimmed.to_string(),
    }
}

/// Normalizes a JSON time-of-day value.
///
/// Accepts strings and the `[hour, minute, second?]` array encoding some
/// backend builds emit for `LocalTime`.
pub fn normalize_time_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => normalize_time(Some(text)),
        Some(Value::Array(parts)) if parts.len() >= 2 => {
            match (parts[0].as_u64(), parts[1].as_u64()) {
                (Some(hour), Some(minute)) => format!("{:02}:{:02}", hour, minute),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

/// Minutes since midnight of a canonical `HH:mm` string.
pub fn minutes_of_day(hhmm: &str) -> Option<u32> {
    let (hour, minute) = hhmm.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

// ─────────────────────────────────────────────────────────────────────────────
// Day of week
// ─────────────────────────────────────────────────────────────────────────────

/// Maps a day-of-week token to `1..=7` (Monday = 1), or `0` when unknown.
///
/// Numbers (and numeric strings) in range pass through unchanged; weekday
/// names match case-insensitively. Anything else, including null, is `0`.
pub fn day_of_week(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .map(weekday_in_range)
            .unwrap_or(0),
        Some(Value::String(token)) => day_of_week_from_token(token),
        _ => 0,
    }
}

/// String form of [`day_of_week`].
pub fn day_of_week_from_token(token: &str) -> u8 {
    let token = token.trim();
    if let Ok(number) = token.parse::<u64>() {
        return weekday_in_range(number);
    }
    WEEKDAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .map(|index| index as u8 + 1)
        .unwrap_or(0)
}

fn weekday_in_range(number: u64) -> u8 {
    if (1..=7).contains(&number) {
        number as u8
    } else {
        0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar dates
// ─────────────────────────────────────────────────────────────────────────────

/// Normalizes a JSON calendar date to `YYYY-MM-DD`, or `""` when absent.
///
/// A trailing time part is dropped; `[year, month, day]` arrays are accepted.
/// Strings in any other format are kept trimmed so they still compare by
/// equality in date queries.
pub fn normalize_date_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            match RE_DATE_PREFIX.captures(trimmed) {
                Some(caps) => caps[1].to_string(),
                None => trimmed.to_string(),
            }
        }
        Some(Value::Array(parts)) if parts.len() == 3 => {
            match (parts[0].as_u64(), parts[1].as_u64(), parts[2].as_u64()) {
                (Some(year), Some(month), Some(day)) => {
                    format!("{:04}-{:02}-{:02}", year, month, day)
                }
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Naming variance
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the first non-blank value among `keys`, in order, or `""`.
pub fn first_present(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| text_of(record.get(*key)))
        .next()
        .unwrap_or_default()
}

/// Like [`first_present`], but `None` instead of `""`.
pub fn first_present_opt(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    Some(first_present(record, keys)).filter(|value| !value.is_empty())
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Unifies the attendance-window flags a record may carry.
///
/// `Some(true)` if any flag is `true`, `Some(false)` if at least one flag is a
/// boolean and none is `true`, `None` if the record carries no boolean flag.
pub fn attendance_flag(record: &Map<String, Value>) -> Option<bool> {
    let mut seen = None;
    for key in OPEN_FLAG_KEYS {
        match record.get(*key) {
            Some(Value::Bool(true)) => return Some(true),
            Some(Value::Bool(false)) => seen = Some(false),
            _ => {}
        }
    }
    seen
}

/// Reads a record id: a non-negative integer, as a number or numeric string.
pub fn record_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().filter(|id| *id >= 0),
        Value::String(text) => text.trim().parse::<i64>().ok().filter(|id| *id >= 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn time_drops_seconds() {
        assert_eq!(normalize_time(Some("07:00:00")), "07:00");
        assert_eq!(normalize_time(Some("13:45:10.250")), "13:45");
    }

    #[test]
    fn time_pads_components() {
        assert_eq!(normalize_time(Some("7:5")), "07:05");
        assert_eq!(normalize_time(Some(" 9:30 ")), "09:30");
    }

    #[test]
    fn time_missing_is_empty() {
        assert_eq!(normalize_time(None), "");
        assert_eq!(normalize_time(Some("")), "");
        assert_eq!(normalize_time_value(None), "");
        assert_eq!(normalize_time_value(Some(&Value::Null)), "");
    }

    #[test]
    fn time_unrecognized_is_kept() {
        assert_eq!(normalize_time(Some("noon")), "noon");
    }

    #[test]
    fn time_accepts_array_encoding() {
        assert_eq!(normalize_time_value(Some(&json!([7, 0, 0]))), "07:00");
        assert_eq!(normalize_time_value(Some(&json!([13, 5]))), "13:05");
        assert_eq!(normalize_time_value(Some(&json!([13]))), "");
    }

    #[test]
    fn minutes_of_day_parses_canonical_time() {
        assert_eq!(minutes_of_day("07:30"), Some(450));
        assert_eq!(minutes_of_day("00:00"), Some(0));
        assert_eq!(minutes_of_day("24:00"), None);
        assert_eq!(minutes_of_day(""), None);
        assert_eq!(minutes_of_day("noon"), None);
    }

    #[test]
    fn weekday_names_map_case_insensitively() {
        assert_eq!(day_of_week(Some(&json!("MONDAY"))), 1);
        assert_eq!(day_of_week(Some(&json!("sunday"))), 7);
        assert_eq!(day_of_week(Some(&json!("Wednesday"))), 3);
    }

    #[test]
    fn numeric_weekdays_pass_through() {
        assert_eq!(day_of_week(Some(&json!(5))), 5);
        assert_eq!(day_of_week(Some(&json!("6"))), 6);
        assert_eq!(day_of_week(Some(&json!(7.0))), 7);
    }

    #[test]
    fn unknown_weekday_tokens_are_zero() {
        assert_eq!(day_of_week(Some(&json!(""))), 0);
        assert_eq!(day_of_week(Some(&Value::Null)), 0);
        assert_eq!(day_of_week(None), 0);
        assert_eq!(day_of_week(Some(&json!("FUNDAY"))), 0);
        assert_eq!(day_of_week(Some(&json!(0))), 0);
        assert_eq!(day_of_week(Some(&json!(8))), 0);
        assert_eq!(day_of_week(Some(&json!(-1))), 0);
        assert_eq!(day_of_week(Some(&json!(true))), 0);
    }

    #[test]
    fn date_values_normalize_to_iso() {
        assert_eq!(normalize_date_value(Some(&json!("2025-01-20"))), "2025-01-20");
        assert_eq!(
            normalize_date_value(Some(&json!("2025-01-20T00:00:00"))),
            "2025-01-20"
        );
        assert_eq!(normalize_date_value(Some(&json!([2025, 1, 20]))), "2025-01-20");
        assert_eq!(normalize_date_value(Some(&Value::Null)), "");
        assert_eq!(normalize_date_value(None), "");
    }

    #[test]
    fn first_present_honours_priority() {
        let both = record(json!({ "subjectName": "Networks", "courseName": "Database" }));
        assert_eq!(first_present(&both, SUBJECT_NAME_KEYS), "Database");

        let room = record(json!({ "className": "CNTT1", "classroomName": "A101" }));
        assert_eq!(first_present(&room, CLASSROOM_KEYS), "A101");
    }

    #[test]
    fn first_present_skips_blank_values() {
        let rec = record(json!({ "roomName": "  ", "classroomName": null, "className": "CNTT1" }));
        assert_eq!(first_present(&rec, CLASSROOM_KEYS), "CNTT1");
    }

    #[test]
    fn first_present_absent_is_empty_string() {
        let rec = record(json!({}));
        assert_eq!(first_present(&rec, LECTURER_KEYS), "");
        assert_eq!(first_present_opt(&rec, LECTURER_KEYS), None);
    }

    #[test]
    fn attendance_flag_unifies_variants() {
        assert_eq!(attendance_flag(&record(json!({ "is_open": true }))), Some(true));
        assert_eq!(
            attendance_flag(&record(json!({ "open": false, "opened": true }))),
            Some(true)
        );
        assert_eq!(attendance_flag(&record(json!({ "isOpen": false }))), Some(false));
        assert_eq!(attendance_flag(&record(json!({ "isOpen": "yes" }))), None);
        assert_eq!(attendance_flag(&record(json!({}))), None);
    }

    #[test]
    fn record_ids_accept_numbers_and_numeric_strings() {
        assert_eq!(record_id(Some(&json!(7))), Some(7));
        assert_eq!(record_id(Some(&json!("12"))), Some(12));
        assert_eq!(record_id(Some(&json!(-3))), None);
        assert_eq!(record_id(Some(&json!("abc"))), None);
        assert_eq!(record_id(Some(&json!(1.5))), None);
        assert_eq!(record_id(None), None);
    }
}
