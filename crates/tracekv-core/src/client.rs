//! Store collaborator trait and key-naming conventions
//!
//! The external key-value store is treated as a black box behind `KvClient`.
//! Everything this crate does — value storage, call counters, call logs —
//! goes through this surface, so any backend with per-key atomic increment
//! and tail-append can carry the instrumentation.
//!
//! Key layout for a wrapped operation with identity `id`:
//! - counter: `id`
//! - input log: `id:inputs`
//! - output log: `id:outputs`

use crate::error::TraceResult;

/// Suffix appended to an operation identity to form its input log key
pub const INPUTS_SUFFIX: &str = ":inputs";

/// Suffix appended to an operation identity to form its output log key
pub const OUTPUTS_SUFFIX: &str = ":outputs";

/// Input log key for an operation identity.
pub fn inputs_key(identity: &str) -> String {
    format!("{}{}", identity, INPUTS_SUFFIX)
}

/// Output log key for an operation identity.
pub fn outputs_key(identity: &str) -> String {
    format!("{}{}", identity, OUTPUTS_SUFFIX)
}

/// Client surface of the external key-value store.
///
/// All methods take `&self` for concurrent access; implementations are
/// responsible for their own synchronization. Concurrency safety for
/// counters and list appends is delegated entirely to the backend's
/// per-key atomicity.
pub trait KvClient: Send + Sync {
    /// Store `value` under `key`, overwriting anything already there.
    fn set(&self, key: &str, value: &[u8]) -> TraceResult<()>;

    /// Read the scalar value at `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> TraceResult<Option<Vec<u8>>>;

    /// Atomically add 1 to the integer at `key`, creating it at 0 if
    /// absent. Returns the value after the increment.
    fn increment(&self, key: &str) -> TraceResult<i64>;

    /// Append `item` at the tail of the list at `key`, creating the list
    /// if absent. Insertion order is preserved.
    fn append_to_list(&self, key: &str, item: &[u8]) -> TraceResult<()>;

    /// Read the inclusive index range `[start, stop]` of the list at
    /// `key`. Negative indices count from the tail (`-1` is the last
    /// element), so `(0, -1)` reads the whole list. An absent list reads
    /// as empty.
    fn read_range(&self, key: &str, start: i64, stop: i64) -> TraceResult<Vec<Vec<u8>>>;

    /// Wipe every key in the current store namespace.
    fn clear_all(&self) -> TraceResult<()>;
}
