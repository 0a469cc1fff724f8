//! Metadata cache chain for da-extra-cache.
//!
//! Records are spread over an ordered list of key/value backends, typically
//! a low-latency cache in front of a durable store.
//!
//! # Architecture
//!
//! ```text
//! resolve(key)                         observe(key, record)
//!     │                                       │
//!     ▼                                  (every backend,
//! ┌──────────────┐                        independently)
//! │  backend 0   │── hit ──▶ return             │
//! └──────┬───────┘                              ▼
//!   miss │ / error                      ┌───────────────┐
//!        ▼                              │ get(key)      │
//! ┌──────────────┐                      └───────┬───────┘
//! │  backend 1   │── hit ──▶ return        ┌────┴────┐
//! └──────┬───────┘                       PRESENT   ABSENT
//!   miss │ / error                          │         │
//!        ▼                                skip    put(key)
//!    NoExtraInfo
//! ```
//!
//! Backend failures are logged and treated as misses. Neither path ever
//! surfaces a transport error to its caller.

mod backend;
mod chain;
mod fs;
mod memory;

pub use backend::{BackendError, MetadataBackend};
pub use chain::{
    BackfillOutcome, BackfillReport, ChainStats, MetadataChain, DEFAULT_BACKEND_TIMEOUT,
};
pub use fs::FsBackend;
pub use memory::{CacheStats, MemoryBackend, DEFAULT_CACHE_CAPACITY};
