//! Payload shape detection.
//!
//! The schedule endpoint has answered with two unrelated layouts over its
//! lifetime:
//!
//! ```text
//! PreFlattened  data = { "schedules": [ SessionLike, ... ], "totalSchedules": n }
//! TemplateList  data = [ { "id", "startTime", ..., "weeks": [ { "studyDays": [...] } ] }, ... ]
//! ```
//!
//! Classification borrows the relevant slice of the payload so the expander
//! consumes a typed variant instead of re-sniffing JSON.

use serde_json::Value;

/// Classified `data` payload of a schedule envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// `data.schedules`, entries already resembling sessions.
    PreFlattened(&'a [Value]),
    /// `data` itself, recurring templates carrying `weeks`.
    TemplateList(&'a [Value]),
    Unrecognized,
}

impl Shape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::PreFlattened(_) => ShapeKind::PreFlattened,
            Shape::TemplateList(_) => ShapeKind::TemplateList,
            Shape::Unrecognized => ShapeKind::Unrecognized,
        }
    }
}

/// Payload-free tag of a [`Shape`], for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    PreFlattened,
    TemplateList,
    Unrecognized,
}

/// Classifies an envelope's `data` value.
///
/// A template list must be a non-empty array with at least one object exposing
/// a `weeks` array; elements without weeks are still handed to the expander,
/// which applies its no-weeks fallback to them.
pub fn classify(data: &Value) -> Shape<'_> {
    match data {
        Value::Object(object) => match object.get("schedules") {
            Some(Value::Array(schedules)) => Shape::PreFlattened(schedules),
            _ => Shape::Unrecognized,
        },
        Value::Array(items) if items.iter().any(has_weeks) => Shape::TemplateList(items),
        _ => Shape::Unrecognized,
    }
}

fn has_weeks(item: &Value) -> bool {
    matches!(item.get("weeks"), Some(Value::Array(_)))
}
