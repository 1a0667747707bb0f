//! # rollcall-core
//!
//! Core library for the Rollcall attendance client: turns the scheduling
//! backend's responses into one canonical list of class sessions, and answers
//! the "today", "upcoming" and "on date" queries student and lecturer screens
//! share.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The HTTP fetch stays with the client.
//! - **Immutable snapshots**: A normalized [`Schedule`] is never mutated; re-fetch instead.
//! - **Graceful degradation**: Malformed records are skipped, not fatal.
//! - **FFI-ready**: UniFFI annotations enable Swift and Kotlin bindings.
//!   Prefer additive public API changes; removing or renaming breaks FFI clients.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rollcall_core::{EngineConfig, ScheduleEngine};
//!
//! let engine = ScheduleEngine::with_config(EngineConfig::default());
//! let schedule = engine.normalize(status, &body)?;
//! let today = schedule.today(now);
//! ```

// UniFFI scaffolding for Swift/Kotlin bindings
uniffi::setup_scaffolding!();

// Public modules
pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod intake;
pub mod normalize;
pub mod order;
pub mod patterns;
pub mod query;
pub mod shape;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{default_config_path, load_engine_config, EngineConfig, MessageConfig};
pub use engine::{normalize_data, parse_local_timestamp, ScheduleEngine, ScheduleView};
pub use error::{Result, ScheduleError, ScheduleFfiError};
pub use expand::{expand, Expansion};
pub use intake::read_envelope;
pub use order::{duplicate_ids, sort_sessions};
pub use query::{Schedule, DEFAULT_UPCOMING_GRACE_MINUTES, MAX_UPCOMING_GRACE_MINUTES};
pub use shape::{classify, Shape, ShapeKind};
pub use types::*;
