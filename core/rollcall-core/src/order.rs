//! Canonical ordering of expanded sessions.
//!
//! Sessions are ordered by `(date, startTime)` using plain lexical comparison
//! of the canonical strings. An empty `date` therefore sorts before every ISO
//! date, which puts undated fallback sessions first. The sort is stable, so
//! sessions sharing a date and start keep their payload order.

use std::collections::BTreeSet;

use crate::types::Session;

/// Sorts sessions in place by `(date, start_time)`, stable.
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

fn sort_key(session: &Session) -> (&str, &str) {
    (session.date.as_str(), session.start_time.as_str())
}

/// Ids occurring more than once, ascending.
///
/// Synthesized ids never collide with each other while every template holds
/// fewer than 1000 study days. A no-weeks fallback keeps the raw template id,
/// so template `7001` without weeks collides with the first occurrence of
/// template `7`. Callers log a non-empty result; `source_id` still tells the
/// two apart for attendance.
pub fn duplicate_ids(sessions: &[Session]) -> Vec<i64> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for session in sessions {
        if !seen.insert(session.id) {
            duplicates.insert(session.id);
        }
    }
    duplicates.into_iter().collect()
}
