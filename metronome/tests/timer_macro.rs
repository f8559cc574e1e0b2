use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use metronome::{timer, SchedulerBuilder};

static EVERY: AtomicU32 = AtomicU32::new(0);
static ONCE: AtomicU32 = AtomicU32::new(0);
static DISABLED: AtomicU32 = AtomicU32::new(0);
static FROM_CONFIG: AtomicU32 = AtomicU32::new(0);

#[timer(every = "50ms")]
async fn every_timer() {
    EVERY.fetch_add(1, Ordering::SeqCst);
}

#[timer(once = "100ms", tag = "macro-once")]
async fn once_timer() {
    ONCE.fetch_add(1, Ordering::SeqCst);
}

#[timer(every = "50ms", enabled = "false")]
async fn disabled_timer() {
    DISABLED.fetch_add(1, Ordering::SeqCst);
}

#[timer(every = "${jobs.tick.interval:60ms}")]
async fn configured_timer() {
    FROM_CONFIG.fetch_add(1, Ordering::SeqCst);
}

// A single test drives every timer in this binary: each scheduler discovers
// all of them, so separate tests would double-count the statics.
#[tokio::test]
async fn macro_timers_are_discovered_and_scheduled() {
    let handle = SchedulerBuilder::new()
        .with_resolution(Duration::from_millis(10))
        .build()
        .start();

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(EVERY.load(Ordering::SeqCst) >= 3);
    assert_eq!(ONCE.load(Ordering::SeqCst), 1);
    assert_eq!(DISABLED.load(Ordering::SeqCst), 0);
    assert!(FROM_CONFIG.load(Ordering::SeqCst) >= 2);

    handle.shutdown().await.unwrap();
}
