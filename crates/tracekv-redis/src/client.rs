//! `KvClient` implementation over a synchronous Redis connection

use log::debug;
use parking_lot::Mutex;
use redis::{Commands, Connection, ErrorKind, RedisError};

use tracekv_core::{KvClient, TraceError, TraceResult};

use crate::config::RedisConfig;

/// Redis-backed store client.
///
/// The trait surface takes `&self`, while `redis-rs` commands need
/// `&mut Connection`, so the connection sits behind a Mutex. Commands
/// from concurrent callers serialize at this client; atomicity per key
/// is the server's.
pub struct RedisClient {
    conn: Mutex<Connection>,
}

impl RedisClient {
    /// Connect eagerly, so an unreachable server surfaces as
    /// `Unavailable` at construction instead of on first use.
    pub fn open(config: &RedisConfig) -> TraceResult<Self> {
        config.validate().map_err(|reason| TraceError::Config { reason })?;

        let client = redis::Client::open(config.url.as_str()).map_err(unavailable)?;
        let conn = match config.connect_timeout {
            Some(timeout) => client.get_connection_with_timeout(timeout),
            None => client.get_connection(),
        }
        .map_err(unavailable)?;

        debug!("connected to redis at {}", config.url);
        Ok(Self { conn: Mutex::new(conn) })
    }
}

/// Driver or server failure with no more specific mapping.
fn unavailable(err: RedisError) -> TraceError {
    TraceError::Unavailable { message: err.to_string() }
}

/// Map a WRONGTYPE reply to the trait's error; everything else is a
/// backend failure.
fn wrong_type(key: &str, expected: &'static str, err: RedisError) -> TraceError {
    if err.kind() == ErrorKind::TypeError {
        let actual = if expected == "scalar" { "list" } else { "scalar" };
        TraceError::WrongType { key: key.to_string(), expected, actual }
    } else {
        unavailable(err)
    }
}

impl KvClient for RedisClient {
    fn set(&self, key: &str, value: &[u8]) -> TraceResult<()> {
        let mut conn = self.conn.lock();
        conn.set::<_, _, ()>(key, value).map_err(unavailable)
    }

    fn get(&self, key: &str) -> TraceResult<Option<Vec<u8>>> {
        let mut conn = self.conn.lock();
        conn.get::<_, Option<Vec<u8>>>(key)
            .map_err(|err| wrong_type(key, "scalar", err))
    }

    fn increment(&self, key: &str) -> TraceResult<i64> {
        let mut conn = self.conn.lock();
        conn.incr::<_, _, i64>(key, 1).map_err(|err| {
            if err.kind() == ErrorKind::TypeError {
                TraceError::NotACounter {
                    key: key.to_string(),
                    raw: err.detail().unwrap_or_default().to_string(),
                }
            } else {
                unavailable(err)
            }
        })
    }

    fn append_to_list(&self, key: &str, item: &[u8]) -> TraceResult<()> {
        let mut conn = self.conn.lock();
        conn.rpush::<_, _, ()>(key, item)
            .map_err(|err| wrong_type(key, "list", err))
    }

    fn read_range(&self, key: &str, start: i64, stop: i64) -> TraceResult<Vec<Vec<u8>>> {
        let mut conn = self.conn.lock();
        conn.lrange::<_, Vec<Vec<u8>>>(key, start as isize, stop as isize)
            .map_err(|err| wrong_type(key, "list", err))
    }

    fn clear_all(&self) -> TraceResult<()> {
        let mut conn = self.conn.lock();
        redis::cmd("FLUSHDB").query::<()>(&mut *conn).map_err(unavailable)
    }
}
