//! Dispersal client boundary for da-extra-cache.
//!
//! The DA network's dispersal transport is an external collaborator; this
//! module only defines its contract ([`DisperserClient`]), the status reply
//! messages it returns, and the [`InterceptingClient`] wrapper that turns
//! ordinary status polling into cache backfill.
//!
//! # Example
//!
//! ```rust,ignore
//! use da_extra_cache::cache::{FsBackend, MemoryBackend, MetadataChain};
//! use da_extra_cache::disperser::{DisperserClient, InterceptingClient};
//! use std::sync::Arc;
//!
//! let chain = MetadataChain::default()
//!     .with_backend(MemoryBackend::new())
//!     .with_backend(FsBackend::open("/var/lib/da-extra")?);
//! let client = InterceptingClient::new(grpc_disperser, Arc::new(chain));
//!
//! // Status polls behave exactly as before; confirmed blobs are cached.
//! let reply = client.get_blob_status(&request_id).await?;
//! ```

mod client;
mod proxy;
mod types;

pub use client::{DisperserClient, DisperserError};
pub use proxy::InterceptingClient;
pub use types::{
    BatchHeader, BatchMetadata, BlobHeader, BlobInfo, BlobQuorumParam, BlobStatus,
    BlobStatusReply, BlobVerificationProof,
};
