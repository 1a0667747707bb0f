//! Wire types for the Rollcall scheduling backend.
//!
//! This crate is shared by the core library and its clients to prevent schema
//! drift. It only describes what the backend sends; interpretation of the
//! `data` payload lives in `rollcall-core`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const API_PREFIX: &str = "/api/v1";
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024; // 4MB

/// Response envelope wrapping every backend payload.
///
/// ```json
/// { "statusCode": 200, "message": "OK", "path": "/api/v1/schedules/me", "data": ... }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Builds an envelope from already-decoded JSON without failing.
    ///
    /// Backends have shipped envelopes with mistyped header fields; a header
    /// that has the wrong JSON type is treated as absent so the payload can
    /// still be classified.
    pub fn from_value(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            _ => return Self::default(),
        };

        Self {
            status_code: object.get("statusCode").and_then(Value::as_i64),
            message: take_string(&mut object, "message"),
            path: take_string(&mut object, "path"),
            timestamp: take_string(&mut object, "timestamp"),
            data: object.remove("data").unwrap_or(Value::Null),
        }
    }

    /// Returns the backend-provided message when it carries any text.
    pub fn user_message(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Extracts the `message` field from an error response body, if the body is
/// JSON and the field carries text.
pub fn error_message(body: &str) -> Option<String> {
    let error: ErrorBody = serde_json::from_str(body).ok()?;
    error.message.filter(|message| !message.trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Schedule of the signed-in student or lecturer.
pub fn my_schedule_path() -> String {
    format!("{}/schedules/me", API_PREFIX)
}

/// Lecturer action opening the attendance window of a class occurrence.
pub fn open_attendance_path(schedule_id: i64) -> String {
    format!("{}/schedules/{}/open", API_PREFIX, schedule_id)
}

/// Lecturer action closing the attendance window of a class occurrence.
pub fn close_attendance_path(schedule_id: i64) -> String {
    format!("{}/schedules/{}/close", API_PREFIX, schedule_id)
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_reads_header_and_data() {
        let envelope = Envelope::from_value(json!({
            "statusCode": 200,
            "message": "OK",
            "path": "/api/v1/schedules/me",
            "timestamp": "2025-01-20T07:00:00",
            "data": { "schedules": [] }
        }));

        assert_eq!(envelope.status_code, Some(200));
        assert_eq!(envelope.user_message(), Some("OK"));
        assert_eq!(envelope.path.as_deref(), Some("/api/v1/schedules/me"));
        assert_eq!(envelope.data, json!({ "schedules": [] }));
    }

    #[test]
    fn from_value_ignores_mistyped_header_fields() {
        let envelope = Envelope::from_value(json!({
            "statusCode": "200",
            "message": 42,
            "data": [1, 2]
        }));

        assert_eq!(envelope.status_code, None);
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.data, json!([1, 2]));
    }

    #[test]
    fn from_value_on_non_object_has_null_data() {
        let envelope = Envelope::from_value(json!([{ "weeks": [] }]));
        assert_eq!(envelope, Envelope::default());
        assert!(envelope.data.is_null());
    }

    #[test]
    fn blank_message_is_not_a_user_message() {
        let envelope = Envelope {
            message: Some("   ".to_string()),
            ..Envelope::default()
        };
        assert_eq!(envelope.user_message(), None);
    }

    #[test]
    fn error_message_reads_backend_text() {
        let body = r#"{"statusCode":404,"message":"No class found for student: 3","path":"/x"}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("No class found for student: 3")
        );
    }

    #[test]
    fn error_message_rejects_plain_text_and_blank() {
        assert_eq!(error_message("Bad Gateway"), None);
        assert_eq!(error_message(r#"{"message":""}"#), None);
        assert_eq!(error_message(r#"["message"]"#), None);
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(my_schedule_path(), "/api/v1/schedules/me");
        assert_eq!(open_attendance_path(7), "/api/v1/schedules/7/open");
        assert_eq!(close_attendance_path(7), "/api/v1/schedules/7/close");
    }
}
