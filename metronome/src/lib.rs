//! # Metronome - Tick-Driven Timers for Rust
//!
//! This library keeps time for your background work: register one-shot or
//! repeating callbacks and a single loop fires them at (approximately) the
//! right time.
//!
//! ## Features
//!
//! - **One-shot timers**: Run a callback once, a delay after registration
//! - **Repeating timers**: Run a callback at a fixed interval
//! - **Tag-based control**: Stop every timer sharing a tag at once
//! - **Failure isolation**: A panicking callback is reported with call
//!   frames and never disturbs the loop or other timers
//! - **Config support**: Use placeholders like `${jobs.interval:30s}` to
//!   read schedules from config files
//! - **Enable/disable**: Conditionally enable timers via config
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use metronome::{timer, SchedulerBuilder};
//!
//! #[timer(every = "30s")]
//! async fn every_30_seconds() {
//!     println!("This runs every 30 seconds");
//! }
//!
//! #[timer(once = "${app.warmup:2s}")]
//! async fn warmup() {
//!     println!("Delay comes from config, with a default");
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), metronome::TimerError> {
//!     let handle = SchedulerBuilder::new().build().start();
//!
//!     handle.add_once("reminder", Duration::from_secs(5), || async {
//!         println!("five seconds in");
//!     })?;
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     handle.shutdown().await
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [metronome]
//! resolution = "100ms"
//!
//! [jobs.sync]
//! interval = "30s"
//! enabled = true
//! ```
//!
//! Or `config/application.yaml`:
//!
//! ```yaml
//! metronome:
//!   resolution: 100ms
//! jobs:
//!   sync:
//!     interval: 30s
//!     enabled: true
//! ```
//!
//! You can also use environment variables with `APP_` prefix:
//!
//! ```bash
//! export APP_METRONOME_RESOLUTION=50ms
//! export APP_JOBS_SYNC_INTERVAL=10s
//! ```

// Re-export macros
pub use metronome_macro::timer;

// Re-export core types
pub use metronome_runtime::{
    CallFrame, DiagnosticSink, FailureReport, Job, JobSchedule, Scheduler, SchedulerBuilder,
    SchedulerHandle, TimeUnit, TimerError, TracingSink, DEFAULT_RESOLUTION,
};

// Make metronome_runtime available for macro expansion
pub use metronome_runtime;
