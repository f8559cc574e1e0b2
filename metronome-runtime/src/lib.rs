//! Metronome Runtime - Core engine for tick-driven timers
//!
//! This crate provides the timer store, the scheduler loop, callback
//! dispatch with panic isolation, and the control API.

mod config;
mod diagnostics;
mod dispatch;
mod error;
mod job;
mod registry;
mod scheduler;
mod store;
mod time_unit;

// Re-export public API
pub use linkme;

pub use crate::config::{load_toml_config, load_yaml_config, resolve_duration, resolve_value};
pub use crate::diagnostics::{CallFrame, DiagnosticSink, FailureReport, TracingSink};
pub use crate::error::TimerError;
pub use crate::job::{Job, JobSchedule};
pub use crate::registry::{TimerDef, TIMER_DEFS};
pub use crate::scheduler::{Scheduler, SchedulerBuilder, SchedulerHandle, DEFAULT_RESOLUTION};
pub use crate::time_unit::{parse_duration, TimeUnit};
