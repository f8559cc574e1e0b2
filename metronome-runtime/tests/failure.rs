use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use metronome_runtime::{DiagnosticSink, FailureReport, SchedulerBuilder};

#[derive(Default)]
struct CollectingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, report: &FailureReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

#[tokio::test]
async fn panicking_callback_is_reported_and_loop_survives() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let sink = Arc::new(CollectingSink::default());
    let counter = Arc::new(AtomicU32::new(0));

    let handle = SchedulerBuilder::new()
        .with_resolution(Duration::from_millis(10))
        .with_sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
        .build()
        .start();

    let counted = Arc::clone(&counter);
    handle
        .add_forever("healthy", Duration::from_millis(50), move || {
            let counted = Arc::clone(&counted);
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

    handle
        .add_once("faulty", Duration::from_millis(30), || async {
            panic!("deliberate failure");
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    // The failure was reported with its context.
    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].tag, "faulty");
    assert_eq!(reports[0].message, "deliberate failure");
    assert!(!reports[0].frames.is_empty());
    assert!(reports[0].payloads.iter().any(|p| p.contains("faulty")));
    drop(reports);

    // The loop and the other timer never noticed.
    assert!(counter.load(Ordering::SeqCst) >= 3);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn every_firing_of_a_faulty_repeating_timer_is_reported() {
    let sink = Arc::new(CollectingSink::default());

    let handle = SchedulerBuilder::new()
        .with_resolution(Duration::from_millis(10))
        .with_sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
        .build()
        .start();

    handle
        .add_forever("flaky", Duration::from_millis(50), || async {
            panic!("still broken");
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.stop("flaky").unwrap();

    let reports = sink.reports.lock().unwrap();
    assert!(reports.len() >= 3);
    assert!(reports.iter().all(|r| r.tag == "flaky"));
}
