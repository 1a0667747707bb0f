//! Compiled regex patterns for parsing backend field values.
//!
//! These patterns are compiled once on first use and reused by the field
//! normalizer. Update these when the backend's time or date encoding changes.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Time-of-day
// ═══════════════════════════════════════════════════════════════════════════════

/// `H:m`, `HH:mm`, `HH:mm:ss` and `HH:mm:ss.fff`, components possibly unpadded.
pub static RE_TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})(?::\d{1,2}(?:\.\d+)?)?$").unwrap());

// ═══════════════════════════════════════════════════════════════════════════════
// Calendar dates
// ═══════════════════════════════════════════════════════════════════════════════

/// ISO date, optionally followed by a time part (`2025-01-20T00:00:00`).
pub static RE_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ].*)?$").unwrap());
