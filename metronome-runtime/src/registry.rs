use std::future::Future;
use std::pin::Pin;

use linkme::distributed_slice;

/// A timer declared with the `#[timer]` attribute macro.
///
/// All fields except the handler stay as the literal text written in the
/// attribute; placeholders are resolved against the configuration when the
/// scheduler starts.
#[derive(Debug, Clone, Copy)]
pub struct TimerDef {
    /// Name of the annotated function.
    pub name: &'static str,
    /// Either `"once"` or `"every"`.
    pub mode: &'static str,
    /// Duration expression, or a `${key:default}` placeholder.
    pub schedule: &'static str,
    /// Timer tag. Defaults to the function name.
    pub tag: &'static str,
    /// `"true"`, `"false"`, or a placeholder deciding whether the timer is
    /// registered at all.
    pub enabled: &'static str,
    pub handler: fn() -> Pin<Box<dyn Future<Output = ()> + Send>>,
}

/// Every `#[timer]` in the final binary lands here at link time.
#[distributed_slice]
pub static TIMER_DEFS: [fn() -> TimerDef] = [..];
