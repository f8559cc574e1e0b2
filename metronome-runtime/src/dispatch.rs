use std::panic;
use std::sync::{Arc, Once};

use crate::diagnostics::{capture_frames, panic_message, DiagnosticSink, FailureReport};
use crate::store::TimerEntry;

tokio::task_local! {
    static DISPATCH: DispatchContext;
}

/// Identifies the callback currently running on a dispatch task, so the
/// panic hook can attribute a failure to its timer.
#[derive(Clone)]
struct DispatchContext {
    tag: String,
    payloads: Vec<String>,
    sink: Arc<dyn DiagnosticSink>,
}

static HOOK: Once = Once::new();

/// Install the process-wide panic hook, once.
///
/// Panics raised outside a dispatch task fall through to whatever hook was
/// installed before.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let handled = DISPATCH
                .try_with(|context| {
                    let report = FailureReport {
                        tag: context.tag.clone(),
                        message: panic_message(info),
                        frames: capture_frames(),
                        payloads: context.payloads.clone(),
                        at: chrono::Utc::now(),
                    };
                    context.sink.report(&report);
                })
                .is_ok();
            if !handled {
                previous(info);
            }
        }));
    });
}

/// Runs callbacks on their own tasks, isolated from the scheduler loop.
pub(crate) struct Dispatcher {
    sink: Arc<dyn DiagnosticSink>,
}

impl Dispatcher {
    pub(crate) fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        install_panic_hook();
        Self { sink }
    }

    /// Spawn the entry's callback. A panic tears down the spawned task
    /// only; the hook turns it into a `FailureReport` before the task
    /// unwinds.
    pub(crate) fn dispatch(&self, entry: &TimerEntry) {
        tracing::debug!(tag = %entry.tag, kind = ?entry.kind, "dispatching timer callback");
        let context = DispatchContext {
            tag: entry.tag.clone(),
            payloads: vec![format!("{:#?}", entry)],
            sink: Arc::clone(&self.sink),
        };
        let callback = Arc::clone(&entry.callback);
        tokio::spawn(DISPATCH.scope(context, async move {
            callback().await;
        }));
    }
}
