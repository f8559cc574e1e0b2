use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use metronome::{timer, SchedulerBuilder};

static TICKS: AtomicU32 = AtomicU32::new(0);

/// Runs every 500 milliseconds
#[timer(every = "500ms")]
async fn fast_task() {
    let count = TICKS.fetch_add(1, Ordering::SeqCst) + 1;
    println!("[FAST] execution #{} (every 500ms)", count);
}

/// Runs once, two seconds after start
#[timer(once = "2s")]
async fn warmup_task() {
    println!("[WARMUP] one-shot fired");
}

#[tokio::main]
async fn main() -> Result<(), metronome::TimerError> {
    tracing_subscriber::fmt().init();

    let handle = SchedulerBuilder::new().build().start();

    handle.add_forever("inline", Duration::from_secs(1), || async {
        println!(
            "[INLINE] every second, at {}",
            chrono::Local::now().format("%H:%M:%S%.3f")
        );
    })?;

    tokio::time::sleep(Duration::from_secs(5)).await;

    println!(
        "fast task ran {} times in 5s (expected ~10)",
        TICKS.load(Ordering::SeqCst)
    );
    handle.shutdown().await
}
