//! Diagnostic sinks for recoverable querystring failures

use crate::error::QuerystringError;

/// Receives querystring inputs that could not be parsed
///
/// Any `Fn(&str, &QuerystringError)` closure is a sink, which makes the
/// failure path easy to observe in tests.
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::{DelimitedCodec, Diagnostics, QuerystringCodec, QuerystringError};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let rejected = AtomicUsize::new(0);
/// let sink: &dyn Diagnostics = &|_: &str, _: &QuerystringError| {
///     rejected.fetch_add(1, Ordering::SeqCst);
/// };
///
/// let params = DelimitedCodec::default().deserialize("a=%", Some(sink));
/// assert!(params.is_empty());
/// assert_eq!(rejected.load(Ordering::SeqCst), 1);
/// ```
pub trait Diagnostics: Send + Sync {
    /// Called once per rejected querystring
    fn querystring_rejected(&self, input: &str, error: &QuerystringError);
}

impl<F> Diagnostics for F
where
    F: Fn(&str, &QuerystringError) + Send + Sync,
{
    fn querystring_rejected(&self, input: &str, error: &QuerystringError) {
        self(input, error)
    }
}

/// Default sink: reports rejected querystrings as `tracing` warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn querystring_rejected(&self, input: &str, error: &QuerystringError) {
        tracing::warn!(querystring = input, %error, "could not parse query string");
    }
}
