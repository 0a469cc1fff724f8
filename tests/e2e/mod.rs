//! End-to-end tests for da-extra-cache.
//!
//! Every test drives an [`InterceptingClient`](da_extra_cache::InterceptingClient)
//! over a scripted disperser and a two-tier chain (in-memory LRU in front of
//! a filesystem store in a temp directory), then reads records back through
//! the public retrieval path.

mod integration_tests;

pub use harness::{confirmed_info, reply, TestHarness};
