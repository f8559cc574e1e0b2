use std::sync::Arc;
use std::time::Duration;

use config::Config;
use tracing::info;

use super::scheduler::Scheduler;
use crate::config::{load_toml_config, load_yaml_config};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::job::{Job, JobSchedule};
use crate::registry::{TimerDef, TIMER_DEFS};

/// Builder for the scheduler.
pub struct SchedulerBuilder {
    pub(crate) config: Arc<Config>,
    pub(crate) resolution: Option<Duration>,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
    pub(crate) jobs: Vec<(String, JobSchedule, Arc<dyn Job>)>,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBuilder {
    /// Create a new scheduler builder with default config (empty).
    pub fn new() -> Self {
        Self {
            config: Arc::new(Config::default()),
            resolution: None,
            sink: Arc::new(TracingSink),
            jobs: Vec::new(),
        }
    }

    /// Create with a TOML config file.
    ///
    /// # Panics
    ///
    /// Panics if the config file cannot be loaded or parsed. This is
    /// intentional as configuration errors should be caught early during
    /// setup.
    pub fn with_toml(path: &str) -> Self {
        let config = load_toml_config(path)
            .unwrap_or_else(|e| panic!("Failed to load TOML config from '{}': {}", path, e));
        Self {
            config: Arc::new(config),
            ..Self::new()
        }
    }

    /// Create with a YAML config file.
    ///
    /// # Panics
    ///
    /// Panics if the config file cannot be loaded or parsed. This is
    /// intentional as configuration errors should be caught early during
    /// setup.
    pub fn with_yaml(path: &str) -> Self {
        let config = load_yaml_config(path)
            .unwrap_or_else(|e| panic!("Failed to load YAML config from '{}': {}", path, e));
        Self {
            config: Arc::new(config),
            ..Self::new()
        }
    }

    /// Create with custom config.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            ..Self::new()
        }
    }

    /// Override the tick resolution of the loop.
    ///
    /// Without an override the `metronome.resolution` config key applies,
    /// and without that the engine ticks every 100ms.
    pub fn with_resolution(mut self, resolution: Duration) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Replace the sink that receives callback failure reports.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Register a stateful job.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::future::Future;
    /// use std::pin::Pin;
    /// use std::time::Duration;
    ///
    /// use metronome_runtime::{Job, JobSchedule, SchedulerBuilder};
    ///
    /// struct Heartbeat {
    ///     name: String,
    /// }
    ///
    /// impl Job for Heartbeat {
    ///     fn run(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
    ///         Box::pin(async move {
    ///             println!("beat from {}", self.name);
    ///         })
    ///     }
    /// }
    ///
    /// # fn main() {
    /// let scheduler = SchedulerBuilder::new()
    ///     .job(
    ///         "heartbeat",
    ///         JobSchedule::Every(Duration::from_secs(5)),
    ///         Heartbeat { name: "db".to_string() },
    ///     )
    ///     .build();
    /// // scheduler.start() inside a tokio runtime
    /// # let _ = scheduler;
    /// # }
    /// ```
    pub fn job<J>(mut self, tag: &str, schedule: JobSchedule, job: J) -> Self
    where
        J: Job + 'static,
    {
        self.jobs.push((tag.to_string(), schedule, Arc::new(job)));
        self
    }

    /// Build the scheduler (does not start it yet).
    ///
    /// Collects every `#[timer]` function discovered at link time together
    /// with the jobs registered on this builder.
    pub fn build(self) -> Scheduler {
        let defs: Vec<TimerDef> = TIMER_DEFS.iter().map(|f| f()).collect();

        info!(
            timers = defs.len(),
            jobs = self.jobs.len(),
            "Building scheduler"
        );

        Scheduler::new(self.config, self.resolution, self.sink, defs, self.jobs)
    }
}
