//! ScheduleEngine - The main entry point for Rollcall clients.
//!
//! The engine turns one backend response into one immutable [`Schedule`]:
//!
//! ```text
//! (status, body) ─► intake ─► classify ─► expand ─► sort ─► Schedule
//!                                                            ├─ today(now)
//!                                                            ├─ upcoming(now)
//!                                                            └─ on_date(D)
//! ```
//!
//! It is designed to be:
//! - **Synchronous**: No async runtime required; the caller owns the fetch
//! - **Pure**: No auth or base-URL state; input is already-fetched text
//! - **Snapshot-based**: Queries never mutate the schedule they read
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use rollcall_core::ScheduleEngine;
//!
//! let engine = ScheduleEngine::with_config(EngineConfig::default());
//! let schedule = engine.normalize(200, &body)?;
//! let today = schedule.today(now);
//! let upcoming = engine.upcoming(&schedule, now);
//! ```

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime};
use rollcall_protocol::Envelope;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{load_engine_config, EngineConfig};
use crate::error::{Result, ScheduleError, ScheduleFfiError};
use crate::expand::expand;
use crate::intake::read_envelope;
use crate::order::{duplicate_ids, sort_sessions};
use crate::query::{parse_date, Schedule, MAX_UPCOMING_GRACE_MINUTES};
use crate::shape::{classify, Shape};
use crate::types::{CalendarDay, ScheduleResponse, Session};

const LOCAL_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalizes an envelope `data` value into a sorted schedule.
///
/// Pure: no configuration, no I/O. `UnknownShape` carries a generic message;
/// use [`ScheduleEngine::normalize_envelope`] to surface the backend's text.
pub fn normalize_data(data: &Value) -> Result<Schedule> {
    let expansion = expand(classify(data))?;
    let mut sessions = expansion.sessions;
    sort_sessions(&mut sessions);

    let duplicates = duplicate_ids(&sessions);
    if !duplicates.is_empty() {
        warn!(ids = ?duplicates, "Normalized schedule contains duplicate session ids");
    }

    Ok(Schedule::new(sessions, expansion.skipped))
}

/// Parses a naive local timestamp (`YYYY-MM-DDTHH:MM[:SS]`, or RFC 3339 whose
/// offset is dropped).
pub fn parse_local_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .ok_or_else(|| ScheduleError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// The main engine for Rollcall schedule operations.
///
/// This is the primary FFI interface for Swift/Kotlin clients.
#[derive(Debug, uniffi::Object)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    /// Creates an engine with an explicit configuration.
    /// Not exposed to FFI - use `new()` for external clients.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalizes a raw HTTP response into a schedule.
    pub fn normalize(&self, status: u16, body: &str) -> Result<Schedule> {
        let envelope = read_envelope(status, body, &self.config.messages)?;
        self.normalize_envelope(&envelope)
    }

    /// Normalizes an already-decoded envelope into a schedule.
    pub fn normalize_envelope(&self, envelope: &Envelope) -> Result<Schedule> {
        if classify(&envelope.data) == Shape::Unrecognized {
            let message = envelope
                .user_message()
                .unwrap_or(self.config.messages.invalid_data.as_str())
                .to_string();
            debug!(path = ?envelope.path, "Schedule payload has unrecognized shape");
            return Err(ScheduleError::UnknownShape { message });
        }

        let schedule = normalize_data(&envelope.data)?;
        debug!(
            path = ?envelope.path,
            sessions = schedule.len(),
            skipped = schedule.skipped(),
            "Normalized schedule"
        );
        Ok(schedule)
    }

    /// Upcoming sessions using the configured grace period.
    pub fn upcoming(&self, schedule: &Schedule, now: NaiveDateTime) -> Vec<Session> {
        schedule.upcoming(now, self.config.upcoming_grace_minutes)
    }
}

#[uniffi::export]
impl ScheduleEngine {
    /// Creates an engine using the configuration file at the default location.
    #[uniffi::constructor]
    pub fn new() -> std::result::Result<Self, ScheduleFfiError> {
        let config = load_engine_config(None)?;
        Ok(Self::with_config(config))
    }

    /// Creates an engine with default messages and a custom upcoming grace,
    /// clamped to `0..=1440` minutes.
    #[uniffi::constructor]
    pub fn with_grace_minutes(grace_minutes: i64) -> Self {
        Self::with_config(EngineConfig {
            upcoming_grace_minutes: grace_minutes.clamp(0, MAX_UPCOMING_GRACE_MINUTES),
            ..EngineConfig::default()
        })
    }

    /// Normalizes a schedule response. Errors carry the user-facing message.
    pub fn load(
        &self,
        status: u16,
        body: String,
    ) -> std::result::Result<Arc<ScheduleView>, ScheduleFfiError> {
        let schedule = self.normalize(status, &body)?;
        Ok(Arc::new(ScheduleView {
            schedule,
            grace_minutes: self.config.upcoming_grace_minutes,
        }))
    }
}

/// FFI handle over one normalized schedule snapshot.
///
/// Timestamps are naive local strings (`YYYY-MM-DDTHH:MM[:SS]`), dates are
/// `YYYY-MM-DD`.
#[derive(Debug, uniffi::Object)]
pub struct ScheduleView {
    schedule: Schedule,
    grace_minutes: i64,
}

impl ScheduleView {
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

#[uniffi::export]
impl ScheduleView {
    pub fn response(&self) -> ScheduleResponse {
        self.schedule.to_response()
    }

    pub fn today_sessions(
        &self,
        now: String,
    ) -> std::result::Result<Vec<Session>, ScheduleFfiError> {
        let now = parse_local_timestamp(&now)?;
        Ok(self.schedule.today(now))
    }

    pub fn upcoming_sessions(
        &self,
        now: String,
    ) -> std::result::Result<Vec<Session>, ScheduleFfiError> {
        let now = parse_local_timestamp(&now)?;
        Ok(self.schedule.upcoming(now, self.grace_minutes))
    }

    pub fn sessions_on_date(
        &self,
        date: String,
    ) -> std::result::Result<Vec<Session>, ScheduleFfiError> {
        if parse_date(&date).is_none() {
            return Err(ScheduleError::InvalidDate { value: date }.into());
        }
        Ok(self.schedule.on_date(date.trim()))
    }

    pub fn month_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> std::result::Result<Vec<CalendarDay>, ScheduleFfiError> {
        self.schedule.month(year, month).ok_or_else(|| {
            ScheduleError::InvalidDate {
                value: format!("{}-{:02}", year, month),
            }
            .into()
        })
    }

    pub fn find_session(&self, id: i64) -> Option<Session> {
        self.schedule.find(id).cloned()
    }
}
