use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::dispatch::Dispatcher;
use crate::store::{TimerEntry, TimerKind, TimerStore};

/// Mutations accepted by the engine loop.
pub(crate) enum Command {
    Add(TimerEntry),
    Stop { tag: String },
    Shutdown { ack: oneshot::Sender<()> },
}

/// The scheduler loop. Sole owner of the timer store; every structural
/// mutation arrives over the command channel.
pub(crate) struct EngineLoop {
    store: TimerStore,
    dispatcher: Dispatcher,
    resolution: Duration,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

impl EngineLoop {
    pub(crate) fn new(
        dispatcher: Dispatcher,
        resolution: Duration,
        command_rx: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        Self {
            store: TimerStore::new(),
            dispatcher,
            resolution,
            command_rx,
        }
    }

    /// Run until shutdown is requested or every handle is gone.
    ///
    /// The tick arm is disabled while the store is empty, so an idle engine
    /// does no periodic work.
    pub(crate) async fn run(mut self) {
        let mut tick = time::interval(self.resolution);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick(), if !self.store.is_empty() => {
                    self.on_tick(Instant::now());
                }
                command = self.command_rx.recv() => match command {
                    Some(Command::Add(entry)) => {
                        tracing::debug!(tag = %entry.tag, kind = ?entry.kind, "adding timer");
                        let was_idle = self.store.is_empty();
                        self.store.insert(entry);
                        if was_idle {
                            // Leaving the idle state; don't count the time
                            // spent idle against the first tick.
                            tick.reset();
                        }
                    }
                    Some(Command::Stop { tag }) => {
                        let deactivated = self.store.deactivate(&tag);
                        tracing::debug!(tag = %tag, deactivated, "stopping timers");
                    }
                    Some(Command::Shutdown { ack }) => {
                        tracing::info!(remaining = self.store.len(), "timer engine shutting down");
                        let _ = ack.send(());
                        return;
                    }
                    None => {
                        tracing::info!("all scheduler handles dropped, stopping");
                        return;
                    }
                },
            }
        }
    }

    /// Examine the head of the store, and only the head.
    ///
    /// An inactive head is discarded and nothing else happens this tick;
    /// timers with identical deadlines therefore fire on successive ticks,
    /// in insertion order.
    fn on_tick(&mut self, now: Instant) {
        let (active, next_fire_at, kind, interval) = match self.store.head() {
            Some(head) => (head.active, head.next_fire_at, head.kind, head.interval),
            None => return,
        };

        if !active {
            if let Some(entry) = self.store.pop_head() {
                tracing::debug!(tag = %entry.tag, "removing stopped timer");
            }
            return;
        }

        // A timer with no deadline counts as overdue.
        let due = next_fire_at.map_or(true, |at| now >= at);
        if !due {
            return;
        }

        if let Some(head) = self.store.head() {
            self.dispatcher.dispatch(head);
        }
        match kind {
            TimerKind::Once => {
                self.store.pop_head();
            }
            TimerKind::Repeating => self.store.rearm_head(now + interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::diagnostics::TracingSink;
    use crate::store::TimerCallback;

    fn engine() -> (EngineLoop, mpsc::UnboundedSender<Command>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(Arc::new(TracingSink));
        (
            EngineLoop::new(dispatcher, Duration::from_millis(100), command_rx),
            command_tx,
        )
    }

    fn entry(tag: &str, kind: TimerKind, next_fire_at: Option<Instant>, active: bool) -> TimerEntry {
        entry_with(tag, kind, next_fire_at, active, Arc::new(|| Box::pin(async {})))
    }

    fn entry_with(
        tag: &str,
        kind: TimerKind,
        next_fire_at: Option<Instant>,
        active: bool,
        callback: TimerCallback,
    ) -> TimerEntry {
        TimerEntry {
            tag: tag.to_string(),
            kind,
            next_fire_at,
            interval: Duration::from_millis(250),
            active,
            callback,
        }
    }

    #[tokio::test]
    async fn discards_one_inactive_head_per_tick() {
        let (mut engine, _tx) = engine();
        let now = Instant::now();
        engine.store.insert(entry("a", TimerKind::Once, Some(now), false));
        engine.store.insert(entry("b", TimerKind::Once, Some(now), false));

        engine.on_tick(now);
        assert_eq!(engine.store.len(), 1);
        engine.on_tick(now);
        assert!(engine.store.is_empty());
    }

    #[tokio::test]
    async fn due_once_timer_fires_and_is_removed() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let (mut engine, _tx) = engine();
        let now = Instant::now();
        engine.store.insert(entry_with(
            "once",
            TimerKind::Once,
            Some(now),
            true,
            Arc::new(|| {
                Box::pin(async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                })
            }),
        ));

        engine.on_tick(now);
        assert!(engine.store.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn due_repeating_timer_is_rearmed() {
        let (mut engine, _tx) = engine();
        let now = Instant::now();
        engine
            .store
            .insert(entry("every", TimerKind::Repeating, Some(now), true));

        engine.on_tick(now);
        assert_eq!(engine.store.len(), 1);
        assert_eq!(
            engine.store.head().unwrap().next_fire_at,
            Some(now + Duration::from_millis(250))
        );
    }

    #[tokio::test]
    async fn future_head_is_left_alone() {
        let (mut engine, _tx) = engine();
        let now = Instant::now();
        engine.store.insert(entry(
            "later",
            TimerKind::Once,
            Some(now + Duration::from_secs(3_600)),
            true,
        ));

        engine.on_tick(now);
        assert_eq!(engine.store.len(), 1);
    }

    #[tokio::test]
    async fn unset_deadline_counts_as_overdue() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let (mut engine, _tx) = engine();
        engine.store.insert(entry_with(
            "zero",
            TimerKind::Once,
            None,
            true,
            Arc::new(|| {
                Box::pin(async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                })
            }),
        ));

        engine.on_tick(Instant::now());
        assert!(engine.store.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
