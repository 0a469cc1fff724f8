//! Dispersal client wrapper that caches extra info on status polls.
//!
//! The `InterceptingClient` forwards every call to the wrapped client
//! unchanged. Status polls additionally backfill the metadata chain:
//!
//! ```text
//! get_blob_status(request_id)
//!     │
//!     ▼
//! ┌──────────────────┐
//! │ inner client     │
//! └────────┬─────────┘
//!          │ reply
//!    ┌─────┴──────────────┐
//!    │                    │
//! CONFIRMED /          anything
//! FINALIZED              else
//!    │                    │
//!    ▼                    │
//! ┌──────────────────┐    │
//! │ extract cert,    │    │
//! │ derive key,      │    │
//! │ observe (task)   │    │
//! └────────┬─────────┘    │
//!          │ result       │
//!          │ logged and   │
//!          │ discarded    │
//!          ▼              ▼
//!       return reply unchanged
//! ```

use super::client::{DisperserClient, DisperserError};
use super::types::{BlobStatus, BlobStatusReply};
use crate::cache::MetadataChain;
use crate::cert::Certificate;
use crate::error::{Error, Result};
use crate::extra::{ExtraInfo, ExtraKey};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A dispersal client that warms the metadata chain as a side effect.
pub struct InterceptingClient<C> {
    client: C,
    chain: Arc<MetadataChain>,
    shutdown: CancellationToken,
}

impl<C: DisperserClient> InterceptingClient<C> {
    /// Wrap `client`, backfilling `chain` on terminal status replies.
    #[must_use]
    pub fn new(client: C, chain: Arc<MetadataChain>) -> Self {
        info!(
            "Intercepting disperser status polls (backends=[{}])",
            chain.backend_names().join(", ")
        );
        Self {
            client,
            chain,
            shutdown: CancellationToken::new(),
        }
    }

    /// The wrapped client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// The metadata chain this client backfills.
    #[must_use]
    pub fn chain(&self) -> &Arc<MetadataChain> {
        &self.chain
    }

    /// Look up the extra info cached for a blob position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoExtraInfo`] if no backend holds a record, or
    /// [`Error::Cancelled`] if `cancel` fires first.
    pub async fn resolve_extra(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        let key = ExtraKey::derive(batch_header_hash, blob_index);
        self.chain.resolve(&key, cancel).await
    }

    /// Backfill the chain from a status reply, swallowing every failure.
    async fn cache_extra_info(&self, reply: &BlobStatusReply) {
        if !reply.status.is_terminal_success() {
            return;
        }

        let (key, record) = match prepare_backfill(reply) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Skipping extra info cache for {:?} reply: {e}", reply.status);
                return;
            }
        };

        let chain = Arc::clone(&self.chain);
        let cancel = self.shutdown.child_token();
        let task_key = key.clone();
        let task =
            tokio::spawn(async move { chain.observe(&task_key, record, &cancel).await });

        match task.await {
            Ok(report) => {
                debug!(
                    "Extra info backfill for {key}: {} written, {} present, {} failed",
                    report.written(),
                    report.skipped(),
                    report.failed()
                );
            }
            Err(e) => error!("Extra info backfill for {key} aborted: {e}"),
        }
    }
}

/// Derive the key and record for a terminal status reply.
fn prepare_backfill(reply: &BlobStatusReply) -> Result<(ExtraKey, Bytes)> {
    let info = reply
        .info
        .as_ref()
        .ok_or(Error::MissingProofField("info"))?;
    let cert = Certificate::try_from(info)?;
    let key = ExtraKey::for_certificate(&cert);
    let record = ExtraInfo::for_key(&key).to_bytes()?;
    Ok((key, Bytes::from(record)))
}

#[async_trait]
impl<C: DisperserClient> DisperserClient for InterceptingClient<C> {
    async fn disperse_blob(
        &self,
        data: Bytes,
        custom_quorums: &[u8],
    ) -> std::result::Result<(BlobStatus, Bytes), DisperserError> {
        self.client.disperse_blob(data, custom_quorums).await
    }

    async fn disperse_blob_authenticated(
        &self,
        data: Bytes,
        custom_quorums: &[u8],
    ) -> std::result::Result<(BlobStatus, Bytes), DisperserError> {
        self.client
            .disperse_blob_authenticated(data, custom_quorums)
            .await
    }

    async fn disperse_paid_blob(
        &self,
        data: Bytes,
        quorums: &[u8],
    ) -> std::result::Result<(BlobStatus, Bytes), DisperserError> {
        self.client.disperse_paid_blob(data, quorums).await
    }

    async fn get_blob_status(
        &self,
        request_id: &[u8],
    ) -> std::result::Result<BlobStatusReply, DisperserError> {
        let reply = self.client.get_blob_status(request_id).await;
        if let Ok(ref status) = reply {
            self.cache_extra_info(status).await;
        }
        reply
    }

    async fn retrieve_blob(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
    ) -> std::result::Result<Bytes, DisperserError> {
        self.client.retrieve_blob(batch_header_hash, blob_index).await
    }

    async fn close(&self) -> std::result::Result<(), DisperserError> {
        self.shutdown.cancel();
        self.client.close().await
    }
}
