use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A reusable unit of work registered through the builder.
///
/// Implement this when the work carries state; plain async functions are
/// better served by the `#[timer]` attribute or the handle's add methods.
pub trait Job: Send + Sync {
    fn run(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// When a job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSchedule {
    /// Fire once, after the delay.
    Once(Duration),
    /// Fire repeatedly, at the interval.
    Every(Duration),
}
