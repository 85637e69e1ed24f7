//! In-memory reference backend
//!
//! `MemoryClient` implements the full `KvClient` surface over a RAM hash
//! table. It backs the test suite and works as a local store when no
//! external server is running. Per-key atomicity comes from the map-wide
//! write lock, which is stricter than what a remote store guarantees.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::client::KvClient;
use crate::error::{TraceError, TraceResult};

/// A single keyed entry. Keys hold either a scalar or a list, never both;
/// mixing the two surfaces as `WrongType`, matching Redis semantics.
#[derive(Debug, Clone)]
enum Stored {
    Scalar(Vec<u8>),
    List(Vec<Vec<u8>>),
}

impl Stored {
    fn kind(&self) -> &'static str {
        match self {
            Stored::Scalar(_) => "scalar",
            Stored::List(_) => "list",
        }
    }
}

/// In-memory `KvClient` backed by a single locked hash table.
#[derive(Default)]
pub struct MemoryClient {
    data: RwLock<HashMap<String, Stored>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys, counting scalars and lists alike.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KvClient for MemoryClient {
    fn set(&self, key: &str, value: &[u8]) -> TraceResult<()> {
        let mut data = self.data.write();
        data.insert(key.to_string(), Stored::Scalar(value.to_vec()));
        Ok(())
    }

    fn get(&self, key: &str) -> TraceResult<Option<Vec<u8>>> {
        let data = self.data.read();
        match data.get(key) {
            None => Ok(None),
            Some(Stored::Scalar(value)) => Ok(Some(value.clone())),
            Some(entry @ Stored::List(_)) => Err(TraceError::WrongType {
                key: key.to_string(),
                expected: "scalar",
                actual: entry.kind(),
            }),
        }
    }

    fn increment(&self, key: &str) -> TraceResult<i64> {
        let mut data = self.data.write();
        let next = match data.get(key) {
            None => 1,
            Some(Stored::Scalar(raw)) => {
                let current = std::str::from_utf8(raw)
                    .ok()
                    .and_then(|text| text.parse::<i64>().ok())
                    .ok_or_else(|| TraceError::NotACounter {
                        key: key.to_string(),
                        raw: String::from_utf8_lossy(raw).into_owned(),
                    })?;
                current + 1
            }
            Some(entry @ Stored::List(_)) => {
                return Err(TraceError::WrongType {
                    key: key.to_string(),
                    expected: "scalar",
                    actual: entry.kind(),
                })
            }
        };
        data.insert(key.to_string(), Stored::Scalar(next.to_string().into_bytes()));
        Ok(next)
    }

    fn append_to_list(&self, key: &str, item: &[u8]) -> TraceResult<()> {
        let mut data = self.data.write();
        match data.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Stored::List(vec![item.to_vec()]));
                Ok(())
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Stored::List(items) => {
                    items.push(item.to_vec());
                    Ok(())
                }
                Stored::Scalar(_) => Err(TraceError::WrongType {
                    key: key.to_string(),
                    expected: "list",
                    actual: "scalar",
                }),
            },
        }
    }

    fn read_range(&self, key: &str, start: i64, stop: i64) -> TraceResult<Vec<Vec<u8>>> {
        let data = self.data.read();
        let items = match data.get(key) {
            None => return Ok(Vec::new()),
            Some(Stored::List(items)) => items,
            Some(entry @ Stored::Scalar(_)) => {
                return Err(TraceError::WrongType {
                    key: key.to_string(),
                    expected: "list",
                    actual: entry.kind(),
                })
            }
        };

        // Inclusive range with negative indices counting from the tail.
        let len = items.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if len == 0 || start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(items[start as usize..=stop as usize].to_vec())
    }

    fn clear_all(&self) -> TraceResult<()> {
        self.data.write().clear();
        Ok(())
    }
}
