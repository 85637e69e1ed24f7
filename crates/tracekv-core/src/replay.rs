//! Best-effort transcript of an operation's recorded call history
//!
//! Replay is a debugging aid and must never fail because of store state:
//! a missing or malformed counter reads as 0, unreadable logs read as
//! empty, and an entry that does not decode renders as an empty string.
//! Only writing to the caller's sink can fail.
//!
//! The store handle is an explicit parameter — there is no implicit
//! default client.

use std::fmt::Write as _;
use std::io;

use log::warn;

use crate::client::{inputs_key, outputs_key, KvClient};

/// Render the transcript for `identity`.
///
/// Output format, one line per recorded call, in call order:
///
/// ```text
/// <identity> was called <count> times:
/// <identity>(*<input>) -> <output>
/// ```
///
/// Inputs and outputs are paired by position; pairing stops at the
/// shorter log, so a partially-written call (input appended, output
/// never reached) drops off the transcript instead of breaking it.
pub fn render_transcript(client: &dyn KvClient, identity: &str) -> String {
    let count = match client.get(identity) {
        Ok(Some(raw)) => match std::str::from_utf8(&raw).ok().and_then(|s| s.parse::<i64>().ok()) {
            Some(n) => n,
            None => {
                warn!("counter at {} is not an integer, reporting 0", identity);
                0
            }
        },
        Ok(None) => 0,
        Err(err) => {
            warn!("could not read counter at {}: {}", identity, err);
            0
        }
    };

    let mut transcript = String::new();
    let _ = writeln!(transcript, "{} was called {} times:", identity, count);

    let inputs = client.read_range(&inputs_key(identity), 0, -1).unwrap_or_else(|err| {
        warn!("could not read input log for {}: {}", identity, err);
        Vec::new()
    });
    let outputs = client.read_range(&outputs_key(identity), 0, -1).unwrap_or_else(|err| {
        warn!("could not read output log for {}: {}", identity, err);
        Vec::new()
    });

    for (input, output) in inputs.iter().zip(outputs.iter()) {
        let input = std::str::from_utf8(input).unwrap_or("");
        let output = std::str::from_utf8(output).unwrap_or("");
        let _ = writeln!(transcript, "{}(*{}) -> {}", identity, input, output);
    }

    transcript
}

/// Write the transcript for `identity` to `sink`.
///
/// Store failures never surface here; only sink I/O errors do.
pub fn replay(client: &dyn KvClient, identity: &str, sink: &mut dyn io::Write) -> io::Result<()> {
    sink.write_all(render_transcript(client, identity).as_bytes())
}
