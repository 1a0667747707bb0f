//! Core types shared across all Rollcall clients.
//!
//! Student and lecturer screens render these exact records, and the
//! attendance flow addresses class occurrences through them.
//!
//! **FFI Support:** All types are annotated with UniFFI macros for Swift/Kotlin bindings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::minutes_of_day;

// ═══════════════════════════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════════════════════════

/// One concrete, dated occurrence of a class meeting.
///
/// `day_of_week` is `1..=7` (Monday = 1) or `0` when unknown. `date` is an ISO
/// calendar date, or empty for a template whose recurrence detail is missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    pub subject_name: String,
    pub subject_code: String,
    pub classroom_name: String,
    pub start_time: String,
    pub end_time: String,
    pub day_of_week: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lecturer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

impl Session {
    /// Id the attendance flow uses to address this occurrence on the backend.
    pub fn attendance_target_id(&self) -> i64 {
        self.source_id.unwrap_or(self.id)
    }

    /// Students may start check-in unless the lecturer has the window closed.
    pub fn accepts_check_in(&self) -> bool {
        self.is_open != Some(false)
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn start_minutes(&self) -> Option<u32> {
        minutes_of_day(&self.start_time)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Normalization Output
// ═══════════════════════════════════════════════════════════════════════════════

/// Serialized result of one normalization pass.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub schedules: Vec<Session>,
    pub total_schedules: u32,
    /// Entries dropped because they were malformed; not shown to users.
    pub skipped_records: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Calendar Types
// ═══════════════════════════════════════════════════════════════════════════════

/// One cell of a Monday-first month calendar.
///
/// Padding cells before the first and after the last day of the month have
/// `in_month = false`, an empty `date` and `day = 0`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub in_month: bool,
    pub session_count: u32,
}
