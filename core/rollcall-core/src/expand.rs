//! Session expansion: classified payload → flat list of canonical sessions.
//!
//! ## Id synthesis
//!
//! ```text
//! PreFlattened entry          id = entry.id
//! TemplateList study day      id = template.id * 1000 + n   (n = 1, 2, ... across all weeks)
//! TemplateList, no study day  id = template.id              (fallback, date = "", dayOfWeek = 0)
//! ```
//!
//! Malformed entries are skipped with a warning and counted; they never fail
//! the whole pass.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::normalize::{
    attendance_flag, day_of_week, first_present, first_present_opt, normalize_date_value,
    normalize_time_value, record_id, CLASSROOM_KEYS, LECTURER_KEYS, SUBJECT_CODE_KEYS,
    SUBJECT_NAME_KEYS, TOPIC_KEYS,
};
use crate::shape::Shape;
use crate::types::Session;

/// Multiplier separating a template's id from its per-occurrence counter.
pub const OCCURRENCE_ID_STRIDE: i64 = 1000;

/// Output of one expansion pass, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub sessions: Vec<Session>,
    pub skipped: u32,
}

/// Expands a classified payload into sessions.
///
/// `Shape::Unrecognized` is an error, never an empty success.
pub fn expand(shape: Shape<'_>) -> Result<Expansion> {
    let expansion = match shape {
        Shape::PreFlattened(entries) => expand_pre_flattened(entries),
        Shape::TemplateList(templates) => expand_templates(templates),
        Shape::Unrecognized => {
            return Err(ScheduleError::UnknownShape {
                message: "Schedule payload matches no known shape".to_string(),
            })
        }
    };

    debug!(
        kind = ?shape.kind(),
        sessions = expansion.sessions.len(),
        skipped = expansion.skipped,
        "Expanded schedule payload"
    );
    Ok(expansion)
}

// ─────────────────────────────────────────────────────────────────────────────
// PreFlattened
// ─────────────────────────────────────────────────────────────────────────────

fn expand_pre_flattened(entries: &[Value]) -> Expansion {
    let mut expansion = Expansion::default();

    for (index, entry) in entries.iter().enumerate() {
        match session_from_entry(index, entry) {
            Ok(session) => expansion.sessions.push(session),
            Err(err) => {
                warn!(entry = index, error = %err, "Skipping schedule entry");
                expansion.skipped += 1;
            }
        }
    }

    expansion
}

fn session_from_entry(index: usize, entry: &Value) -> Result<Session> {
    let context = || format!("schedules[{}]", index);
    let record =
        as_record(entry).ok_or_else(|| ScheduleError::malformed(context(), "not an object"))?;
    let id = record_id(record.get("id"))
        .ok_or_else(|| ScheduleError::malformed(context(), "missing or invalid id"))?;

    Ok(Session {
        id,
        source_id: record_id(record.get("sourceId")).or(Some(id)),
        subject_name: first_present(record, SUBJECT_NAME_KEYS),
        subject_code: first_present(record, SUBJECT_CODE_KEYS),
        classroom_name: first_present(record, CLASSROOM_KEYS),
        start_time: normalize_time_value(record.get("startTime")),
        end_time: normalize_time_value(record.get("endTime")),
        day_of_week: day_of_week(record.get("dayOfWeek")),
        lecturer_name: first_present_opt(record, LECTURER_KEYS),
        topic: first_present_opt(record, TOPIC_KEYS),
        date: normalize_date_value(record.get("date")),
        is_open: attendance_flag(record),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// TemplateList
// ─────────────────────────────────────────────────────────────────────────────

fn expand_templates(templates: &[Value]) -> Expansion {
    let mut expansion = Expansion::default();

    for (index, item) in templates.iter().enumerate() {
        match expand_template(index, item) {
            Ok(expanded) => {
                expansion.sessions.extend(expanded.sessions);
                expansion.skipped += expanded.skipped;
            }
            Err(err) => {
                warn!(template = index, error = %err, "Skipping schedule template");
                expansion.skipped += 1;
            }
        }
    }

    expansion
}

/// Fields every occurrence inherits from its template.
struct TemplateSlot<'a> {
    id: i64,
    record: &'a Map<String, Value>,
}

impl TemplateSlot<'_> {
    fn session(&self, id: i64, date: String, day_of_week: u8, is_open: Option<bool>) -> Session {
        Session {
            id,
            source_id: Some(self.id),
            subject_name: first_present(self.record, SUBJECT_NAME_KEYS),
            subject_code: first_present(self.record, SUBJECT_CODE_KEYS),
            classroom_name: first_present(self.record, CLASSROOM_KEYS),
            start_time: normalize_time_value(self.record.get("startTime")),
            end_time: normalize_time_value(self.record.get("endTime")),
            day_of_week,
            lecturer_name: first_present_opt(self.record, LECTURER_KEYS),
            topic: first_present_opt(self.record, TOPIC_KEYS),
            date,
            is_open,
        }
    }
}

fn expand_template(index: usize, item: &Value) -> Result<Expansion> {
    let context = format!("template[{}]", index);
    let record =
        as_record(item).ok_or_else(|| ScheduleError::malformed(&context, "not an object"))?;
    let id = record_id(record.get("id"))
        .ok_or_else(|| ScheduleError::malformed(&context, "missing or invalid id"))?;
    let slot = TemplateSlot { id, record };
    let template_open = attendance_flag(record);

    let mut expansion = Expansion::default();
    let mut counter: i64 = 0;

    for (week_index, week) in array_field(record, "weeks").iter().enumerate() {
        let Some(week) = as_record(week) else {
            warn!(template = id, week = week_index, "Skipping malformed week");
            expansion.skipped += 1;
            continue;
        };

        for (day_index, study_day) in array_field(week, "studyDays").iter().enumerate() {
            let Some(study_day) = as_record(study_day) else {
                warn!(
                    template = id,
                    week = week_index,
                    day = day_index,
                    "Skipping malformed study day"
                );
                expansion.skipped += 1;
                continue;
            };

            let date = normalize_date_value(study_day.get("date"));
            if date.is_empty() {
                warn!(
                    template = id,
                    week = week_index,
                    day = day_index,
                    "Skipping study day without date"
                );
                expansion.skipped += 1;
                continue;
            }

            counter += 1;
            let occurrence_id = id
                .checked_mul(OCCURRENCE_ID_STRIDE)
                .and_then(|base| base.checked_add(counter))
                .ok_or_else(|| {
                    ScheduleError::malformed(&context, "id too large to synthesize occurrences")
                })?;

            expansion.sessions.push(slot.session(
                occurrence_id,
                date,
                day_of_week(study_day.get("dayOfWeek")),
                attendance_flag(study_day).or(template_open),
            ));
        }
    }

    if expansion.sessions.is_empty() {
        expansion
            .sessions
            .push(slot.session(id, String::new(), 0, template_open));
    }

    Ok(expansion)
}

fn as_record(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

fn array_field<'a>(record: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match record.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}
