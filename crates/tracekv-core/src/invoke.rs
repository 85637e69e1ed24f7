//! Invocation decorators: call counting and call-history recording
//!
//! Wrapping is explicit trait composition rather than dynamic function
//! decoration: an `Invocable` names itself and executes against a
//! positional argument list, and each decorator holds the operation it
//! wraps. Composition order matters — in
//! `RecordingInvocable(CountingInvocable(op))` the innermost effect runs
//! first, so the counter moves before anything else happens.

use std::sync::Arc;

use crate::client::{inputs_key, outputs_key, KvClient};
use crate::error::TraceResult;
use crate::value::{render_args, Value};

/// A named operation executing against positional arguments.
pub trait Invocable: Send + Sync {
    /// Stable name for this operation, used as the namespace for its
    /// counter and call logs. Must not be derived from the process
    /// instance — it has to survive restarts.
    fn identity(&self) -> &str;

    /// Execute against positional arguments.
    fn invoke(&self, args: &[Value]) -> TraceResult<Value>;
}

/// Increments the per-identity call counter, then delegates.
///
/// The increment happens before delegation: a call that fails inside the
/// wrapped operation still counts as attempted, and a failed increment
/// propagates without running the operation at all. The wrapped result
/// passes through unchanged.
pub struct CountingInvocable<I> {
    client: Arc<dyn KvClient>,
    inner: I,
}

impl<I: Invocable> CountingInvocable<I> {
    pub fn new(client: Arc<dyn KvClient>, inner: I) -> Self {
        Self { client, inner }
    }
}

impl<I: Invocable> Invocable for CountingInvocable<I> {
    fn identity(&self) -> &str {
        self.inner.identity()
    }

    fn invoke(&self, args: &[Value]) -> TraceResult<Value> {
        self.client.increment(self.identity())?;
        self.inner.invoke(args)
    }
}

/// Appends rendered inputs and outputs to the per-identity call logs.
///
/// Call sequence: render the argument list, append it to the input log,
/// delegate, render the result, append that to the output log. The
/// input append always precedes the output append for one call, and a
/// failed delegation leaves the output log untouched, so the logs can
/// briefly disagree in length. Cross-call interleaving is whatever the
/// store's per-append atomicity provides.
///
/// The wrapper returns `Value::Text` of the rendered result — the
/// textual serialization, not the inner result itself. The rendered form
/// of text is the text itself, so operations that already return text
/// are observably unchanged; any other result type reaches the caller as
/// its rendered text. Callers that need the typed result must not wrap
/// with this decorator.
pub struct RecordingInvocable<I> {
    client: Arc<dyn KvClient>,
    inner: I,
}

impl<I: Invocable> RecordingInvocable<I> {
    pub fn new(client: Arc<dyn KvClient>, inner: I) -> Self {
        Self { client, inner }
    }
}

impl<I: Invocable> Invocable for RecordingInvocable<I> {
    fn identity(&self) -> &str {
        self.inner.identity()
    }

    fn invoke(&self, args: &[Value]) -> TraceResult<Value> {
        let rendered_args = render_args(args);
        self.client
            .append_to_list(&inputs_key(self.identity()), rendered_args.as_bytes())?;

        let result = self.inner.invoke(args)?;

        let rendered = result.render();
        self.client
            .append_to_list(&outputs_key(self.identity()), rendered.as_bytes())?;
        Ok(Value::Text(rendered))
    }
}
