//! The user-facing cache facade
//!
//! `Cache` stores opaque values under fresh random keys and reads them
//! back with optional coercion. Its store operation is instrumented as
//! `RecordingInvocable(CountingInvocable(raw store))` — counting is the
//! innermost layer, so the counter moves before anything is logged and a
//! store failure still counts as an attempted call. Reads go straight to
//! the client and bypass instrumentation.

use std::io;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::client::KvClient;
use crate::config::CacheConfig;
use crate::error::{TraceError, TraceResult};
use crate::invoke::{CountingInvocable, Invocable, RecordingInvocable};
use crate::replay::{render_transcript, replay};
use crate::value::Value;

/// The uninstrumented store operation: fresh random key, one `set`.
struct StoreValue {
    client: Arc<dyn KvClient>,
    identity: String,
}

impl Invocable for StoreValue {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn invoke(&self, args: &[Value]) -> TraceResult<Value> {
        if args.len() != 1 {
            return Err(TraceError::Arity {
                identity: self.identity.clone(),
                expected: 1,
                actual: args.len(),
            });
        }

        // 128-bit random identifier; collision probability is negligible.
        let key = Uuid::new_v4().to_string();
        self.client.set(&key, &args[0].encode())?;
        debug!("stored {} value under {}", args[0].type_name(), key);
        Ok(Value::Text(key))
    }
}

/// Cache facade over an external key-value store.
///
/// Holds a single immutable client handle; all operations are stateless
/// requests against the store, so `&self` calls may run concurrently
/// from multiple threads.
pub struct Cache {
    client: Arc<dyn KvClient>,
    store_op: RecordingInvocable<CountingInvocable<StoreValue>>,
}

impl Cache {
    /// Construct with the default configuration (identity `Cache.store`,
    /// store wiped on open).
    pub fn new(client: Arc<dyn KvClient>) -> TraceResult<Self> {
        Self::with_config(client, CacheConfig::default())
    }

    /// Construct with an explicit configuration.
    pub fn with_config(client: Arc<dyn KvClient>, config: CacheConfig) -> TraceResult<Self> {
        config.validate().map_err(|reason| TraceError::Config { reason })?;

        if config.clear_on_open {
            client.clear_all()?;
            debug!("cleared store namespace on open");
        }

        let raw = StoreValue {
            client: Arc::clone(&client),
            identity: config.store_identity,
        };
        let store_op = RecordingInvocable::new(
            Arc::clone(&client),
            CountingInvocable::new(Arc::clone(&client), raw),
        );

        Ok(Self { client, store_op })
    }

    /// Store `data` under a fresh random key and return the key.
    ///
    /// The instrumented pipeline returns the rendered text of the inner
    /// result; the inner result is the key string, and rendered text of
    /// text is the text itself, so the key comes back unchanged.
    pub fn store(&self, data: impl Into<Value>) -> TraceResult<String> {
        let out = self.store_op.invoke(&[data.into()])?;
        Ok(out.render())
    }

    /// Read the raw bytes at `key`, or `None` if absent. Bypasses
    /// instrumentation.
    pub fn get(&self, key: &str) -> TraceResult<Option<Vec<u8>>> {
        self.client.get(key)
    }

    /// Read the value at `key` and coerce it when present.
    ///
    /// The coercion never runs for an absent key; a failing coercion
    /// propagates to the caller.
    pub fn get_with<T, F>(&self, key: &str, coerce: F) -> TraceResult<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> TraceResult<T>,
    {
        match self.client.get(key)? {
            None => Ok(None),
            Some(raw) => coerce(raw).map(Some),
        }
    }

    /// Read the value at `key` as UTF-8 text.
    pub fn get_text(&self, key: &str) -> TraceResult<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw).map_err(|err| TraceError::Decode {
                key: key.to_string(),
                target: "text",
                reason: err.to_string(),
            })
        })
    }

    /// Read the value at `key` as a signed integer.
    pub fn get_int(&self, key: &str) -> TraceResult<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(&raw)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| TraceError::Decode {
                    key: key.to_string(),
                    target: "integer",
                    reason: String::from_utf8_lossy(&raw).into_owned(),
                })
        })
    }

    /// Read the value at `key` as a float.
    pub fn get_float(&self, key: &str) -> TraceResult<Option<f64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(&raw)
                .ok()
                .and_then(|text| text.parse::<f64>().ok())
                .ok_or_else(|| TraceError::Decode {
                    key: key.to_string(),
                    target: "float",
                    reason: String::from_utf8_lossy(&raw).into_owned(),
                })
        })
    }

    /// Identity of the instrumented store operation.
    pub fn store_identity(&self) -> &str {
        self.store_op.identity()
    }

    /// Transcript of the store operation's recorded calls. Never fails
    /// on store state.
    pub fn store_transcript(&self) -> String {
        render_transcript(self.client.as_ref(), self.store_identity())
    }

    /// Write the store operation's transcript to `sink`.
    pub fn replay_store(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        replay(self.client.as_ref(), self.store_identity(), sink)
    }

    /// Wipe every key in the store namespace, recorded history included.
    pub fn clear(&self) -> TraceResult<()> {
        debug!("clearing store namespace");
        self.client.clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{inputs_key, outputs_key};
    use crate::memory::MemoryClient;
    use std::cell::Cell;

    fn test_cache() -> (Cache, Arc<MemoryClient>) {
        let client = Arc::new(MemoryClient::new());
        let cache = Cache::new(client.clone()).unwrap();
        (cache, client)
    }

    #[test]
    fn test_store_returns_fresh_keys() {
        let (cache, _client) = test_cache();
        let k1 = cache.store("first").unwrap();
        let k2 = cache.store("second").unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_text_roundtrip() {
        let (cache, _client) = test_cache();
        let key = cache.store("hello").unwrap();
        assert_eq!(cache.get_text(&key).unwrap(), Some("hello".to_string()));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let (cache, _client) = test_cache();
        let key = cache.store(vec![0xde_u8, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(vec![0xde_u8, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_int_roundtrip() {
        let (cache, _client) = test_cache();
        let key = cache.store(-42i64).unwrap();
        assert_eq!(cache.get_int(&key).unwrap(), Some(-42));
    }

    #[test]
    fn test_float_roundtrip() {
        let (cache, _client) = test_cache();
        let key = cache.store(2.5f64).unwrap();
        assert_eq!(cache.get_float(&key).unwrap(), Some(2.5));
    }

    #[test]
    fn test_get_absent_is_none() {
        let (cache, _client) = test_cache();
        assert_eq!(cache.get("missing").unwrap(), None);
        assert_eq!(cache.get_text("missing").unwrap(), None);
        assert_eq!(cache.get_int("missing").unwrap(), None);
    }

    #[test]
    fn test_coercion_not_called_on_absent() {
        let (cache, _client) = test_cache();
        let called = Cell::new(false);

        let out: Option<i64> = cache
            .get_with("missing", |_raw| {
                called.set(true);
                Ok(0)
            })
            .unwrap();

        assert_eq!(out, None);
        assert!(!called.get());
    }

    #[test]
    fn test_failed_coercion_propagates() {
        let (cache, _client) = test_cache();
        let key = cache.store("not a number").unwrap();
        assert!(matches!(
            cache.get_int(&key),
            Err(TraceError::Decode { target: "integer", .. })
        ));
    }

    #[test]
    fn test_store_counts_and_records() {
        let (cache, client) = test_cache();
        let identity = cache.store_identity().to_string();

        for i in 0..3 {
            cache.store(format!("value {}", i)).unwrap();
        }

        assert_eq!(client.get(&identity).unwrap(), Some(b"3".to_vec()));
        assert_eq!(client.read_range(&inputs_key(&identity), 0, -1).unwrap().len(), 3);
        assert_eq!(client.read_range(&outputs_key(&identity), 0, -1).unwrap().len(), 3);
    }

    #[test]
    fn test_logs_are_index_aligned() {
        let (cache, client) = test_cache();
        let identity = cache.store_identity().to_string();

        let k1 = cache.store("a").unwrap();
        let k2 = cache.store("b").unwrap();

        let inputs = client.read_range(&inputs_key(&identity), 0, -1).unwrap();
        let outputs = client.read_range(&outputs_key(&identity), 0, -1).unwrap();
        assert_eq!(inputs, vec![b"(\"a\")".to_vec(), b"(\"b\")".to_vec()]);
        assert_eq!(outputs, vec![k1.into_bytes(), k2.into_bytes()]);
    }

    #[test]
    fn test_store_transcript() {
        let (cache, _client) = test_cache();
        let k1 = cache.store("first").unwrap();
        let k2 = cache.store("second").unwrap();

        let transcript = cache.store_transcript();
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines[0], "Cache.store was called 2 times:");
        assert_eq!(lines[1], format!("Cache.store(*(\"first\")) -> {}", k1));
        assert_eq!(lines[2], format!("Cache.store(*(\"second\")) -> {}", k2));
    }

    #[test]
    fn test_replay_store_to_sink() {
        let (cache, _client) = test_cache();
        cache.store("x").unwrap();

        let mut sink = Vec::new();
        cache.replay_store(&mut sink).unwrap();
        assert!(String::from_utf8(sink).unwrap().starts_with("Cache.store was called 1 times:"));
    }

    #[test]
    fn test_clear_wipes_history() {
        let (cache, client) = test_cache();
        let key = cache.store("x").unwrap();
        cache.clear().unwrap();

        assert_eq!(cache.get(&key).unwrap(), None);
        assert_eq!(client.get(cache.store_identity()).unwrap(), None);
        assert!(cache.store_transcript().starts_with("Cache.store was called 0 times:"));
    }

    #[test]
    fn test_clear_on_open_wipes_existing_keys() {
        let client = Arc::new(MemoryClient::new());
        client.set("stale", b"old").unwrap();

        let cache = Cache::new(client.clone()).unwrap();
        assert_eq!(cache.get("stale").unwrap(), None);
    }

    #[test]
    fn test_open_without_clearing() {
        let client = Arc::new(MemoryClient::new());
        client.set("kept", b"data").unwrap();

        let config = CacheConfig { clear_on_open: false, ..Default::default() };
        let cache = Cache::with_config(client.clone(), config).unwrap();
        assert_eq!(cache.get("kept").unwrap(), Some(b"data".to_vec()));
    }

    #[test]
    fn test_custom_identity() {
        let client = Arc::new(MemoryClient::new());
        let config = CacheConfig {
            store_identity: "Session.store".to_string(),
            clear_on_open: false,
        };
        let cache = Cache::with_config(client.clone(), config).unwrap();

        cache.store("x").unwrap();
        assert_eq!(client.get("Session.store").unwrap(), Some(b"1".to_vec()));
        assert!(cache.store_transcript().starts_with("Session.store was called 1 times:"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let client = Arc::new(MemoryClient::new());
        let config = CacheConfig { store_identity: String::new(), ..Default::default() };
        assert!(matches!(
            Cache::with_config(client, config),
            Err(TraceError::Config { .. })
        ));
    }

    #[test]
    fn test_concurrent_stores_count_exactly() {
        let (cache, client) = test_cache();
        let cache = Arc::new(cache);
        let identity = cache.store_identity().to_string();

        let mut handles = vec![];
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..25 {
                    cache.store(format!("t{}-{}", t, i)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(client.get(&identity).unwrap(), Some(b"200".to_vec()));
        let inputs = client.read_range(&inputs_key(&identity), 0, -1).unwrap();
        let outputs = client.read_range(&outputs_key(&identity), 0, -1).unwrap();
        assert_eq!(inputs.len(), 200);
        assert_eq!(outputs.len(), 200);
    }
}
