//! Redis adapter for tracekv
//!
//! Implements tracekv's `KvClient` trait over a synchronous `redis-rs`
//! connection.
//!
//! # Operation mapping
//!
//! | `KvClient`       | Redis command |
//! |------------------|---------------|
//! | `set`            | SET           |
//! | `get`            | GET           |
//! | `increment`      | INCR          |
//! | `append_to_list` | RPUSH         |
//! | `read_range`     | LRANGE        |
//! | `clear_all`      | FLUSHDB       |
//!
//! Per-key atomicity for INCR and RPUSH comes from the server, so the
//! instrumentation counters and logs stay exact across processes.
//! Namespace isolation is the server's database index — pick it in the
//! connection URL.

pub mod client;
pub mod config;

pub use client::RedisClient;
pub use config::RedisConfig;
