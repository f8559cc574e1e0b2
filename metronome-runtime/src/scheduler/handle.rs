use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

use super::engine::Command;
use crate::error::TimerError;
use crate::store::{TimerCallback, TimerEntry, TimerKind};

/// Handle for a running scheduler.
///
/// Cheap to clone; every clone drives the same engine loop. A handle taken
/// before `start` works too: registrations queue up and are drained once
/// the loop is running.
#[derive(Clone)]
pub struct SchedulerHandle {
    pub(crate) command_tx: tokio::sync::mpsc::UnboundedSender<Command>,
}

impl SchedulerHandle {
    /// Schedule a one-shot timer that fires `delay` from now.
    ///
    /// The deadline is computed here, at registration time, so the delay
    /// runs from this call even while the loop is busy.
    pub fn add_once<F, Fut>(
        &self,
        tag: &str,
        delay: Duration,
        callback: F,
    ) -> Result<(), TimerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add(tag, TimerKind::Once, delay, box_callback(callback))
    }

    /// Schedule a repeating timer that fires every `interval`, first
    /// `interval` from now.
    pub fn add_forever<F, Fut>(
        &self,
        tag: &str,
        interval: Duration,
        callback: F,
    ) -> Result<(), TimerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add(tag, TimerKind::Repeating, interval, box_callback(callback))
    }

    /// Deactivate every timer carrying `tag`.
    ///
    /// A stopped timer never fires again, but its entry lingers in the
    /// store until it surfaces at the head. Stopping does not cancel a
    /// callback that has already been dispatched.
    pub fn stop(&self, tag: &str) -> Result<(), TimerError> {
        self.command_tx
            .send(Command::Stop {
                tag: tag.to_string(),
            })
            .map_err(|_| TimerError::Closed)
    }

    /// Stop the loop and wait for it to acknowledge.
    ///
    /// Callbacks already running keep running to completion.
    pub async fn shutdown(self) -> Result<(), TimerError> {
        let (ack, done) = oneshot::channel();
        self.command_tx
            .send(Command::Shutdown { ack })
            .map_err(|_| TimerError::Closed)?;
        done.await.map_err(|_| TimerError::Closed)
    }

    pub(crate) fn add(
        &self,
        tag: &str,
        kind: TimerKind,
        interval: Duration,
        callback: TimerCallback,
    ) -> Result<(), TimerError> {
        self.command_tx
            .send(Command::Add(TimerEntry {
                tag: tag.to_string(),
                kind,
                next_fire_at: Some(Instant::now() + interval),
                interval,
                active: true,
                callback,
            }))
            .map_err(|_| TimerError::Closed)
    }
}

pub(crate) fn box_callback<F, Fut>(callback: F) -> TimerCallback
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || {
        let future: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(callback());
        future
    })
}
