use std::time::Duration;

use metronome::SchedulerBuilder;

#[tokio::main]
async fn main() -> Result<(), metronome::TimerError> {
    tracing_subscriber::fmt().init();

    let scheduler = SchedulerBuilder::new()
        .with_resolution(Duration::from_millis(50))
        .build();

    // Handles work before start; this registration is buffered until the
    // loop is running.
    let early = scheduler.handle();
    early.add_forever("ping", Duration::from_millis(200), || async {
        println!("[PING]");
    })?;

    let handle = scheduler.start();

    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("stopping the ping timer");
    handle.stop("ping")?;

    // Stopped timers never fire again, even though their entries are
    // discarded lazily.
    tokio::time::sleep(Duration::from_secs(1)).await;

    handle.shutdown().await
}
