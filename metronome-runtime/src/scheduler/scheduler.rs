use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::engine::{Command, EngineLoop};
use super::handle::SchedulerHandle;
use crate::config::{resolve_duration, resolve_value};
use crate::diagnostics::DiagnosticSink;
use crate::dispatch::Dispatcher;
use crate::error::TimerError;
use crate::job::{Job, JobSchedule};
use crate::registry::TimerDef;
use crate::store::{TimerCallback, TimerKind};
use crate::time_unit::parse_duration;

/// Tick resolution used when neither the builder nor the configuration
/// says otherwise.
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(100);

/// Configured scheduler ready to start.
///
/// Holds every registration made so far but runs nothing yet. `start`
/// consumes the scheduler, so a scheduler cannot be started twice.
pub struct Scheduler {
    config: Arc<Config>,
    resolution: Option<Duration>,
    sink: Arc<dyn DiagnosticSink>,
    defs: Vec<TimerDef>,
    jobs: Vec<(String, JobSchedule, Arc<dyn Job>)>,
    command_tx: mpsc::UnboundedSender<Command>,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

impl Scheduler {
    pub(crate) fn new(
        config: Arc<Config>,
        resolution: Option<Duration>,
        sink: Arc<dyn DiagnosticSink>,
        defs: Vec<TimerDef>,
        jobs: Vec<(String, JobSchedule, Arc<dyn Job>)>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            config,
            resolution,
            sink,
            defs,
            jobs,
            command_tx,
            command_rx,
        }
    }

    /// Handle onto the engine.
    ///
    /// Usable before `start`: timers registered through an early handle are
    /// queued and picked up the moment the loop starts.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Start the engine loop and hand back a controlling handle.
    ///
    /// Must be called from within a Tokio runtime. Registrations that fail
    /// to resolve are logged and skipped; the rest of the schedule starts
    /// normally.
    pub fn start(self) -> SchedulerHandle {
        let resolution = self.tick_resolution();
        let handle = self.handle();

        info!(
            timers = self.defs.len(),
            jobs = self.jobs.len(),
            resolution_ms = resolution.as_millis() as u64,
            "Starting timer engine"
        );

        for def in &self.defs {
            if let Err(e) = Self::register_def(&handle, def, &self.config) {
                warn!(name = def.name, error = %e, "Skipping timer");
            }
        }

        for (tag, schedule, job) in &self.jobs {
            let job = Arc::clone(job);
            let callback: TimerCallback = Arc::new(move || {
                let job = Arc::clone(&job);
                let future: Pin<Box<dyn Future<Output = ()> + Send>> =
                    Box::pin(async move {
                        job.run().await;
                    });
                future
            });
            let result = match schedule {
                JobSchedule::Once(delay) => handle.add(tag, TimerKind::Once, *delay, callback),
                JobSchedule::Every(interval) => {
                    handle.add(tag, TimerKind::Repeating, *interval, callback)
                }
            };
            if let Err(e) = result {
                warn!(tag = %tag, error = %e, "Skipping job");
            }
        }

        let dispatcher = Dispatcher::new(Arc::clone(&self.sink));
        tokio::spawn(EngineLoop::new(dispatcher, resolution, self.command_rx).run());

        handle
    }

    /// Resolution precedence: builder override, then the
    /// `metronome.resolution` config key, then the built-in default.
    fn tick_resolution(&self) -> Duration {
        if let Some(resolution) = self.resolution {
            return resolution;
        }
        match self.config.get_string("metronome.resolution") {
            Ok(value) => match parse_duration(&value) {
                Ok(resolution) => resolution,
                Err(e) => {
                    warn!(value = %value, error = %e, "Invalid metronome.resolution, using default");
                    DEFAULT_RESOLUTION
                }
            },
            Err(_) => DEFAULT_RESOLUTION,
        }
    }

    fn register_def(
        handle: &SchedulerHandle,
        def: &TimerDef,
        config: &Config,
    ) -> Result<(), TimerError> {
        let enabled = resolve_value(def.enabled, config)?;
        if enabled.to_lowercase() == "false" {
            info!(name = def.name, "Timer disabled by configuration");
            return Ok(());
        }

        let schedule = resolve_duration(def.schedule, config)?;
        let callback: TimerCallback = Arc::new(def.handler);

        match def.mode {
            "once" => handle.add(def.tag, TimerKind::Once, schedule, callback),
            "every" => handle.add(def.tag, TimerKind::Repeating, schedule, callback),
            other => {
                warn!(name = def.name, mode = other, "Unknown timer mode");
                Ok(())
            }
        }
    }
}
