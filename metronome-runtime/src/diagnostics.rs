use std::panic::PanicHookInfo;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One resolved frame from a callback panic.
#[derive(Debug, Clone, Serialize)]
pub struct CallFrame {
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// Everything known about a callback that panicked.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Tag of the timer whose callback failed.
    pub tag: String,
    /// The panic payload, rendered as text.
    pub message: String,
    /// Call frames captured at the panic site.
    pub frames: Vec<CallFrame>,
    /// Debug renderings of the timer's state at dispatch time.
    pub payloads: Vec<String>,
    pub at: DateTime<Utc>,
}

/// Receives failure reports from the dispatch layer.
///
/// Implementations must not panic; a report is the last thing the engine
/// does for a failed callback.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, report: &FailureReport);
}

/// Default sink that writes reports to the `tracing` error stream, one
/// event for the failure and one per resolved frame.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, report: &FailureReport) {
        tracing::error!(
            tag = %report.tag,
            message = %report.message,
            payloads = ?report.payloads,
            at = %report.at,
            "timer callback panicked"
        );
        for frame in &report.frames {
            tracing::error!(
                function = frame.function.as_deref().unwrap_or("<unknown>"),
                file = frame.file.as_deref().unwrap_or("<unknown>"),
                line = frame.line.unwrap_or(0),
                "  at"
            );
        }
    }
}

/// Resolve the current call stack into frames.
///
/// Must be called while the panicking stack is still live, i.e. from inside
/// the panic hook.
pub(crate) fn capture_frames() -> Vec<CallFrame> {
    let backtrace = backtrace::Backtrace::new();
    let mut frames = Vec::new();
    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            frames.push(CallFrame {
                function: symbol.name().map(|name| name.to_string()),
                file: symbol
                    .filename()
                    .map(|path| path.display().to_string()),
                line: symbol.lineno(),
            });
        }
    }
    frames
}

/// Render a panic payload as text.
pub(crate) fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_frames_resolves_symbols() {
        let frames = capture_frames();
        assert!(!frames.is_empty());
    }

    #[test]
    fn tracing_sink_accepts_reports() {
        let report = FailureReport {
            tag: "job".to_string(),
            message: "boom".to_string(),
            frames: vec![CallFrame {
                function: Some("example::run".to_string()),
                file: Some("src/example.rs".to_string()),
                line: Some(42),
            }],
            payloads: vec!["state dump".to_string()],
            at: Utc::now(),
        };
        TracingSink.report(&report);
    }
}
