//! # da-extra-cache
//!
//! Certificate-addressed metadata caching for a data-availability (DA)
//! dispersal proxy.
//!
//! Clients disperse blobs to the DA network and get back a compact binary
//! certificate. This crate lets them later trade that certificate for
//! out-of-band request metadata ("extra info") without any extra work on the
//! dispersal path: the metadata is captured as a side effect of ordinary
//! status polling.
//!
//! ## Components
//!
//! - [`cert`]: the certificate model and its canonical RLP codec
//! - [`extra`]: correlation key derivation and the metadata record
//! - [`cache`]: backend contract, shipped backends, and the read-through /
//!   write-once chain over them
//! - [`disperser`]: the dispersal client contract and the intercepting
//!   wrapper that backfills the chain
//! - [`retrieval`]: commitment decoding and the lookup entry point
//!
//! ## Data flow
//!
//! ```text
//! status poll ──▶ InterceptingClient ──▶ Certificate ──▶ ExtraKey ──▶ MetadataChain::observe
//! commitment  ──▶ get_extra ──▶ Certificate ──▶ ExtraKey ──▶ MetadataChain::resolve ──▶ record
//! ```

pub mod cache;
pub mod cert;
pub mod config;
pub mod disperser;
pub mod error;
pub mod extra;
pub mod retrieval;

pub use cache::{FsBackend, MemoryBackend, MetadataBackend, MetadataChain};
pub use cert::{Certificate, G1Commitment};
pub use config::ProxyConfig;
pub use disperser::{DisperserClient, InterceptingClient};
pub use error::{Error, Result};
pub use extra::{ExtraInfo, ExtraKey};
pub use retrieval::{decode_commitment_hex, get_extra, CommitmentMode, ExtraInfoSource};
