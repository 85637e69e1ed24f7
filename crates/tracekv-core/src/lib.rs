//! tracekv Core — Call-Instrumented Cache Facade
//!
//! A thin instrumentation layer over an external key-value store:
//! values go in under fresh random keys, come back out with optional
//! type coercion, and every store call leaves a durable trail —
//! an invocation counter plus paired input/output logs — that can be
//! replayed later as a human-readable transcript.
//!
//! # Architecture
//!
//! - **Store path**: `RecordingInvocable(CountingInvocable(raw store))`
//!   — counter moves first, then the call is logged around the write
//! - **Read path**: straight to the store client, no instrumentation
//! - **Replay**: best-effort transcript rendering that never fails on
//!   missing or corrupt history
//!
//! # Zero Backend Assumptions
//!
//! This crate has no opinion about where the data lives. Anything
//! implementing `KvClient` — per-key atomic increment and tail-append
//! are the only hard requirements — can carry the instrumentation.
//! A RAM-backed reference client ships in [`memory`]; the Redis
//! adapter lives in a separate crate (tracekv-redis).

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod invoke;
pub mod memory;
pub mod replay;
pub mod value;

// Re-export key types for convenience
pub use cache::Cache;
pub use client::{inputs_key, outputs_key, KvClient};
pub use config::CacheConfig;
pub use error::{TraceError, TraceResult};
pub use invoke::{CountingInvocable, Invocable, RecordingInvocable};
pub use memory::MemoryClient;
pub use replay::{render_transcript, replay};
pub use value::{render_args, Value};
