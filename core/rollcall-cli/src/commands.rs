//! Subcommand implementations.
//!
//! Each command returns a JSON value; `main` prints it. Keeping output as
//! data makes the commands testable without capturing stdout.

use chrono::NaiveDateTime;
use clap::Subcommand;
use rollcall_core::query::parse_date;
use rollcall_core::{
    load_engine_config, parse_local_timestamp, Schedule, ScheduleEngine, ScheduleError, Session,
};
use rollcall_protocol::{close_attendance_path, open_attendance_path, MAX_BODY_BYTES};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the full normalized schedule
    Normalize,

    /// Sessions of the current Monday-Sunday week
    Today {
        /// Local time (YYYY-MM-DDTHH:MM[:SS]); defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Sessions not yet started (or started within the grace period)
    Upcoming {
        /// Local time (YYYY-MM-DDTHH:MM[:SS]); defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Sessions on one calendar date
    On {
        /// Calendar date (YYYY-MM-DD)
        #[arg(value_name = "DATE")]
        date: String,
    },

    /// Monday-first month grid with per-day session counts
    Month {
        #[arg(value_name = "YEAR")]
        year: i32,

        #[arg(value_name = "MONTH")]
        month: u32,
    },

    /// One session with its attendance endpoints
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Input(#[source] io::Error),

    #[error("Input exceeds {0} bytes")]
    InputTooLarge(usize),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Engine plus the schedule normalized from this invocation's input.
pub struct Context {
    engine: ScheduleEngine,
    schedule: Schedule,
}

impl Context {
    pub fn load(
        config: Option<PathBuf>,
        input: Option<&Path>,
        status: u16,
    ) -> Result<Self, CliError> {
        let engine = ScheduleEngine::with_config(load_engine_config(config)?);
        let body = read_input(input)?;
        let schedule = engine.normalize(status, &body)?;
        tracing::debug!(
            sessions = schedule.len(),
            skipped = schedule.skipped(),
            "Loaded schedule"
        );
        Ok(Self { engine, schedule })
    }
}

/// Session with the identifiers the attendance flow needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub attendance_target_id: i64,
    pub accepts_check_in: bool,
    pub open_path: String,
    pub close_path: String,
}

impl SessionDetail {
    pub fn new(session: Session) -> Self {
        let target = session.attendance_target_id();
        Self {
            accepts_check_in: session.accepts_check_in(),
            attendance_target_id: target,
            open_path: open_attendance_path(target),
            close_path: close_attendance_path(target),
            session,
        }
    }
}

pub fn execute(context: &Context, command: &Command) -> Result<Value, CliError> {
    let schedule = &context.schedule;
    let value = match command {
        Command::Normalize => serde_json::to_value(schedule.to_response())?,
        Command::Today { now } => {
            let now = resolve_now(now.as_deref())?;
            serde_json::to_value(schedule.today(now))?
        }
        Command::Upcoming { now } => {
            let now = resolve_now(now.as_deref())?;
            serde_json::to_value(context.engine.upcoming(schedule, now))?
        }
        Command::On { date } => {
            if parse_date(date).is_none() {
                return Err(ScheduleError::InvalidDate {
                    value: date.clone(),
                }
                .into());
            }
            serde_json::to_value(schedule.on_date(date.trim()))?
        }
        Command::Month { year, month } => {
            let cells = schedule
                .month(*year, *month)
                .ok_or_else(|| ScheduleError::InvalidDate {
                    value: format!("{}-{:02}", year, month),
                })?;
            serde_json::to_value(cells)?
        }
        Command::Show { id } => {
            let session = schedule
                .find(*id)
                .cloned()
                .ok_or(CliError::SessionNotFound(*id))?;
            serde_json::to_value(SessionDetail::new(session))?
        }
    };
    Ok(value)
}

pub fn emit<W: Write>(mut out: W, value: &Value) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out).map_err(CliError::Output)?;
    out.flush().map_err(CliError::Output)
}

fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime, CliError> {
    match now {
        Some(value) => Ok(parse_local_timestamp(value)?),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) => {
            let file = fs_err::File::open(path).map_err(CliError::Input)?;
            read_limited(file)
        }
        None => read_limited(io::stdin().lock()),
    }
}

fn read_limited<R: Read>(reader: R) -> Result<String, CliError> {
    let mut body = String::new();
    reader
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_string(&mut body)
        .map_err(CliError::Input)?;
    if body.len() > MAX_BODY_BYTES {
        return Err(CliError::InputTooLarge(MAX_BODY_BYTES));
    }
    Ok(body)
}
