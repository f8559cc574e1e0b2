use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use metronome::SchedulerBuilder;

static HEALTHY: AtomicU32 = AtomicU32::new(0);

#[tokio::main]
async fn main() -> Result<(), metronome::TimerError> {
    tracing_subscriber::fmt().init();

    let handle = SchedulerBuilder::new().build().start();

    handle.add_forever("healthy", Duration::from_millis(300), || async {
        let count = HEALTHY.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[HEALTHY] execution #{}", count);
    })?;

    handle.add_once("faulty", Duration::from_millis(500), || async {
        panic!("deliberate failure in a callback");
    })?;

    tokio::time::sleep(Duration::from_secs(2)).await;

    println!(
        "healthy timer kept running: {} executions",
        HEALTHY.load(Ordering::SeqCst)
    );
    handle.shutdown().await
}
