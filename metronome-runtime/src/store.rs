use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Callback invoked when a timer fires.
///
/// The callback is shared between the store and in-flight dispatches, so it
/// is reference counted rather than boxed.
pub type TimerCallback = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Whether a timer fires once or keeps firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Once,
    Repeating,
}

/// A single scheduled timer.
pub struct TimerEntry {
    /// Caller-supplied identifier. Not required to be unique.
    pub tag: String,
    pub kind: TimerKind,
    /// Absolute deadline of the next fire. `None` sorts after every set
    /// deadline and is treated as already due once it reaches the head.
    pub next_fire_at: Option<Instant>,
    /// Rearm period for repeating timers.
    pub interval: Duration,
    /// Cleared by `Stop`; the entry is physically removed later, when it
    /// reaches the head of the store.
    pub active: bool,
    pub callback: TimerCallback,
}

impl fmt::Debug for TimerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEntry")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("next_fire_at", &self.next_fire_at)
            .field("interval", &self.interval)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Timers ordered by next fire time.
///
/// The vector is kept sorted so the loop only ever has to look at the first
/// element. Sorting is stable, so timers with equal deadlines fire in
/// insertion order.
#[derive(Debug, Default)]
pub struct TimerStore {
    entries: Vec<TimerEntry>,
}

impl TimerStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry and restore the ordering.
    pub fn insert(&mut self, entry: TimerEntry) {
        self.entries.push(entry);
        self.sort();
    }

    /// Mark every entry carrying `tag` as inactive.
    ///
    /// Entries are not removed here; the loop discards them lazily when they
    /// surface at the head. Returns how many entries were deactivated.
    pub fn deactivate(&mut self, tag: &str) -> usize {
        let mut count = 0;
        for entry in &mut self.entries {
            if entry.tag == tag && entry.active {
                entry.active = false;
                count += 1;
            }
        }
        count
    }

    pub fn head(&self) -> Option<&TimerEntry> {
        self.entries.first()
    }

    pub fn pop_head(&mut self) -> Option<TimerEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Push the head's deadline forward and restore the ordering.
    pub fn rearm_head(&mut self, next: Instant) {
        if let Some(entry) = self.entries.first_mut() {
            entry.next_fire_at = Some(next);
            self.sort();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| match (a.next_fire_at, b.next_fire_at) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
}
