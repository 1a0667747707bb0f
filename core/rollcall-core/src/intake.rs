//! Response intake: `(http status, body text)` → decoded envelope.
//!
//! Everything here is fatal to the fetch. The message carried by each error
//! is what the screen shows, preferring the backend's own text.

use rollcall_protocol::{error_message, Envelope, MAX_BODY_BYTES};
use serde_json::Value;

use crate::config::MessageConfig;
use crate::error::{Result, ScheduleError};

/// Decodes a schedule response body into its envelope.
///
/// Non-2xx statuses become `Rejected`; an empty or whitespace body becomes
/// `EmptyBody`; a body that is not JSON becomes `UnparseableJson`.
pub fn read_envelope(status: u16, body: &str, messages: &MessageConfig) -> Result<Envelope> {
    if !(200..300).contains(&status) {
        return Err(ScheduleError::Rejected {
            status,
            message: rejection_message(status, body, messages),
        });
    }

    if body.trim().is_empty() {
        return Err(ScheduleError::EmptyBody {
            status,
            message: messages.empty_body.clone(),
        });
    }

    if body.len() > MAX_BODY_BYTES {
        return Err(ScheduleError::UnparseableJson {
            details: format!("body exceeds {} bytes", MAX_BODY_BYTES),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|err| ScheduleError::UnparseableJson {
        details: err.to_string(),
    })?;

    Ok(Envelope::from_value(value))
}

/// Message for a non-2xx response: the JSON `message`, else the raw text,
/// else the configured fallback.
fn rejection_message(status: u16, body: &str, messages: &MessageConfig) -> String {
    if let Some(message) = error_message(body) {
        return message;
    }

    let is_json = serde_json::from_str::<Value>(body).is_ok();
    let text = body.trim();
    if !is_json && !text.is_empty() {
        return text.to_string();
    }

    format!("{} (status {})", messages.load_failed, status)
}
