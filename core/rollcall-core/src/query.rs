//! Window queries over a normalized schedule.
//!
//! A [`Schedule`] is an immutable, `Arc`-backed snapshot of one normalization
//! pass. Clones share the same sessions, so a dashboard can serve its Today
//! and Upcoming panels from one fetch and both stay consistent.
//!
//! All dates are local calendar dates; `now` is a naive local timestamp.
//!
//! ```text
//! today     date within Mon..=Sun of now's week, or (no date) dayOfWeek == now's weekday
//! upcoming  date >= today and minutes(start) >= minutes(now) - grace,
//!           ascending by (date, startTime)
//! on_date   date == D, no weekday fallback
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::types::{CalendarDay, ScheduleResponse, Session};

/// Look-back grace for "upcoming": classes that started this long ago still show.
pub const DEFAULT_UPCOMING_GRACE_MINUTES: i64 = 30;

/// Largest accepted grace, one full day.
pub const MAX_UPCOMING_GRACE_MINUTES: i64 = 24 * 60;

const ISO_DATE: &str = "%Y-%m-%d";

// ═══════════════════════════════════════════════════════════════════════════════
// Schedule snapshot
// ═══════════════════════════════════════════════════════════════════════════════

/// Sorted, immutable result of one normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    sessions: Arc<[Session]>,
    skipped: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

impl Schedule {
    /// Wraps already-sorted sessions.
    pub fn new(sessions: Vec<Session>, skipped: u32) -> Self {
        Self {
            sessions: sessions.into(),
            skipped,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Malformed backend records dropped during normalization.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    pub fn find(&self, id: i64) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    pub fn today(&self, now: NaiveDateTime) -> Vec<Session> {
        today_sessions(&self.sessions, now)
    }

    pub fn upcoming(&self, now: NaiveDateTime, grace_minutes: i64) -> Vec<Session> {
        upcoming_sessions(&self.sessions, now, grace_minutes)
    }

    pub fn on_date(&self, date: &str) -> Vec<Session> {
        sessions_on_date(&self.sessions, date)
    }

    pub fn month(&self, year: i32, month: u32) -> Option<Vec<CalendarDay>> {
        month_calendar(&self.sessions, year, month)
    }

    pub fn to_response(&self) -> ScheduleResponse {
        ScheduleResponse {
            schedules: self.sessions.to_vec(),
            total_schedules: u32::try_from(self.sessions.len()).unwrap_or(u32::MAX),
            skipped_records: self.skipped,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Calendar helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Weekday of `date` as `1..=7`, Monday = 1, Sunday = 7.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(iso_weekday(date)) - 1);
    (monday, monday + Duration::days(6))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE).ok()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════════════════════

/// Sessions of the current Monday–Sunday week.
///
/// Undated sessions match on weekday instead, so a template without
/// recurrence detail still shows on its day.
pub fn today_sessions(sessions: &[Session], now: NaiveDateTime) -> Vec<Session> {
    let today = now.date();
    let (monday, sunday) = week_bounds(today);
    let (from, to) = (format_date(monday), format_date(sunday));
    let weekday = iso_weekday(today);

    sessions
        .iter()
        .filter(|session| {
            if session.date.is_empty() {
                session.day_of_week == weekday
            } else {
                session.date.as_str() >= from.as_str() && session.date.as_str() <= to.as_str()
            }
        })
        .cloned()
        .collect()
}

/// Sessions from today on whose start time of day is at most `grace_minutes`
/// before `now`'s time of day.
///
/// The time-of-day comparison ignores the date, so a 07:00 class next week is
/// excluded once it is past 07:30 today. Seconds of `now` are ignored.
/// Sessions whose start cannot be resolved are excluded.
pub fn upcoming_sessions(
    sessions: &[Session],
    now: NaiveDateTime,
    grace_minutes: i64,
) -> Vec<Session> {
    let today = format_date(now.date());
    let now_minutes = i64::from(now.hour() * 60 + now.minute());
    let cutoff = now_minutes.saturating_sub(grace_minutes.max(0));

    let mut upcoming: Vec<(&str, u32, &Session)> = sessions
        .iter()
        .filter(|session| !session.date.is_empty() && session.date.as_str() >= today.as_str())
        .filter_map(|session| {
            session
                .start_minutes()
                .map(|start| (session.date.as_str(), start, session))
        })
        .filter(|(_, start, _)| i64::from(*start) >= cutoff)
        .collect();

    upcoming.sort_by_key(|(date, start, _)| (*date, *start));
    upcoming
        .into_iter()
        .map(|(_, _, session)| session.clone())
        .collect()
}

/// Sessions held on exactly `date` (`YYYY-MM-DD`).
pub fn sessions_on_date(sessions: &[Session], date: &str) -> Vec<Session> {
    sessions
        .iter()
        .filter(|session| session.date == date)
        .cloned()
        .collect()
}

/// Monday-first calendar grid for `month` of `year`, padded to whole weeks.
///
/// Returns `None` for a month outside `1..=12`.
pub fn month_calendar(sessions: &[Session], year: i32, month: u32) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days_in_month = (next_first - first).num_days() as u32;
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for session in sessions.iter().filter(|s| !s.date.is_empty()) {
        *counts.entry(session.date.as_str()).or_default() += 1;
    }

    let mut cells = vec![CalendarDay::default(); offset];
    for day in 1..=days_in_month {
        let date = format_date(first.with_day(day)?);
        let session_count = counts.get(date.as_str()).copied().unwrap_or(0);
        cells.push(CalendarDay {
            date,
            day,
            in_month: true,
            session_count,
        });
    }
    while cells.len() % 7 != 0 {
        cells.push(CalendarDay::default());
    }

    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64, date: &str, start: &str, day_of_week: u8) -> Session {
        Session {
            id,
            source_id: None,
            subject_name: format!("Subject {id}"),
            subject_code: String::new(),
            classroom_name: String::new(),
            start_time: start.to_string(),
            end_time: String::new(),
            day_of_week,
            lecturer_name: None,
            topic: None,
            date: date.to_string(),
            is_open: None,
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn ids(sessions: &[Session]) -> Vec<i64> {
        sessions.iter().map(|s| s.id).collect()
    }

    #[test]
    fn week_bounds_start_monday_end_sunday() {
        let wednesday = parse_date("2025-01-22").unwrap();
        let (monday, sunday) = week_bounds(wednesday);
        assert_eq!(format_date(monday), "2025-01-20");
        assert_eq!(format_date(sunday), "2025-01-26");
    }

    #[test]
    fn week_bounds_treat_sunday_as_last_day() {
        let sunday = parse_date("2025-01-26").unwrap();
        assert_eq!(iso_weekday(sunday), 7);
        let (monday, end) = week_bounds(sunday);
        assert_eq!(format_date(monday), "2025-01-20");
        assert_eq!(end, sunday);
    }

    #[test]
    fn today_covers_whole_week() {
        let sessions = vec![
            session(1, "2025-01-19", "07:00", 7),
            session(2, "2025-01-20", "07:00", 1),
            session(3, "2025-01-26", "07:00", 7),
            session(4, "2025-01-27", "07:00", 1),
        ];
        let today = today_sessions(&sessions, at("2025-01-22", "10:00:00"));
        assert_eq!(ids(&today), vec![2, 3]);
    }

    #[test]
    fn today_falls_back_to_weekday_for_undated_sessions() {
        let sessions = vec![session(1, "", "07:00", 3)];
        // 2025-01-22 is a Wednesday.
        assert_eq!(today_sessions(&sessions, at("2025-01-22", "08:00:00")).len(), 1);
        assert!(today_sessions(&sessions, at("2025-01-23", "08:00:00")).is_empty());
    }

    #[test]
    fn today_never_matches_unknown_weekday() {
        let sessions = vec![session(1, "", "07:00", 0)];
        for day in 20..=26 {
            let now = at(&format!("2025-01-{day}"), "08:00:00");
            assert!(today_sessions(&sessions, now).is_empty());
        }
    }

    #[test]
    fn upcoming_grace_boundary() {
        let sessions = vec![
            session(1, "2025-01-20", "09:30", 1),
            session(2, "2025-01-20", "09:29", 1),
        ];
        let upcoming = upcoming_sessions(
            &sessions,
            at("2025-01-20", "10:00:00"),
            DEFAULT_UPCOMING_GRACE_MINUTES,
        );
        assert_eq!(ids(&upcoming), vec![1]);
    }

    #[test]
    fn upcoming_ignores_seconds_of_now() {
        let sessions = vec![session(1, "2025-01-20", "09:30", 1)];
        let upcoming = upcoming_sessions(&sessions, at("2025-01-20", "10:00:59"), 30);
        assert_eq!(ids(&upcoming), vec![1]);
    }

    #[test]
    fn upcoming_compares_time_of_day_on_later_days() {
        let sessions = vec![
            session(1, "2025-01-19", "23:00", 7),
            session(2, "2025-01-21", "07:00", 2),
            session(3, "2025-01-21", "19:00", 2),
            session(4, "", "19:00", 1),
        ];
        let upcoming = upcoming_sessions(&sessions, at("2025-01-20", "18:00:00"), 30);
        assert_eq!(ids(&upcoming), vec![3]);
    }

    #[test]
    fn upcoming_sorted_by_date_then_start_and_stable_on_ties() {
        let sessions = vec![
            session(1, "2025-01-22", "07:00", 3),
            session(2, "2025-01-21", "13:00", 2),
            session(3, "2025-01-21", "13:00", 2),
            session(4, "2025-01-21", "07:00", 2),
        ];
        let upcoming = upcoming_sessions(&sessions, at("2025-01-20", "06:00:00"), 30);
        assert_eq!(ids(&upcoming), vec![4, 2, 3, 1]);
    }

    #[test]
    fn upcoming_grace_near_midnight_does_not_wrap() {
        let sessions = vec![
            session(1, "2025-01-20", "00:00", 1),
            session(2, "2025-01-20", "23:59", 1),
        ];
        let upcoming = upcoming_sessions(&sessions, at("2025-01-20", "00:10:00"), 30);
        assert_eq!(ids(&upcoming), vec![1, 2]);
    }

    #[test]
    fn upcoming_tolerates_extreme_grace() {
        let sessions = vec![session(1, "2025-01-20", "00:00", 1)];
        let now = at("2025-01-20", "23:59:00");
        assert_eq!(ids(&upcoming_sessions(&sessions, now, i64::MAX)), vec![1]);
        assert!(upcoming_sessions(&sessions, now, i64::MIN).is_empty());
    }

    #[test]
    fn upcoming_excludes_unparseable_start() {
        let sessions = vec![session(1, "2025-01-21", "noon", 2)];
        assert!(upcoming_sessions(&sessions, at("2025-01-20", "08:00:00"), 30).is_empty());
    }

    #[test]
    fn on_date_is_exact_match_without_fallback() {
        let sessions = vec![
            session(1, "2025-01-20", "07:00", 1),
            session(2, "", "07:00", 1),
            session(3, "2025-01-27", "07:00", 1),
        ];
        assert_eq!(ids(&sessions_on_date(&sessions, "2025-01-20")), vec![1]);
        assert_eq!(ids(&sessions_on_date(&sessions, "")), vec![2]);
        assert!(sessions_on_date(&sessions, "2025-01-21").is_empty());
    }

    #[test]
    fn month_calendar_pads_to_whole_weeks() {
        let sessions = vec![
            session(1, "2025-01-20", "07:00", 1),
            session(2, "2025-01-20", "13:00", 1),
            session(3, "2025-02-03", "07:00", 1),
        ];
        // January 2025 starts on a Wednesday.
        let cells = month_calendar(&sessions, 2025, 1).unwrap();
        assert_eq!(cells.len() % 7, 0);
        assert_eq!(cells.len(), 35);
        assert!(!cells[0].in_month && !cells[1].in_month);
        assert_eq!(cells[2].date, "2025-01-01");
        assert_eq!(cells[2].day, 1);

        let twentieth = cells.iter().find(|c| c.date == "2025-01-20").unwrap();
        assert_eq!(twentieth.session_count, 2);
        assert_eq!(cells.iter().map(|c| c.session_count).sum::<u32>(), 2);
    }

    #[test]
    fn month_calendar_handles_december_and_bad_months() {
        let cells = month_calendar(&[], 2025, 12).unwrap();
        assert_eq!(cells.iter().filter(|c| c.in_month).count(), 31);
        assert!(month_calendar(&[], 2025, 13).is_none());
        assert!(month_calendar(&[], 2025, 0).is_none());
    }

    #[test]
    fn schedule_clones_share_sessions() {
        let schedule = Schedule::new(vec![session(1, "2025-01-20", "07:00", 1)], 2);
        let clone = schedule.clone();
        assert!(std::ptr::eq(schedule.sessions(), clone.sessions()));

        let response = schedule.to_response();
        assert_eq!(response.total_schedules, 1);
        assert_eq!(response.skipped_records, 2);
        assert_eq!(schedule.find(1).map(|s| s.id), Some(1));
        assert!(schedule.find(2).is_none());
    }
}
