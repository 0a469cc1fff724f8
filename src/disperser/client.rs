//! Contract of the DA network dispersal client.

use super::types::{BlobStatus, BlobStatusReply};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failure reported by a dispersal client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisperserError {
    /// The RPC to the disperser failed.
    #[error("disperser rpc failed: {0}")]
    Rpc(String),

    /// The client has been closed.
    #[error("disperser client closed")]
    Closed,
}

/// Client for the DA network's disperser.
///
/// Dispersal calls return the initial status together with the request id
/// used for status polling.
#[async_trait]
pub trait DisperserClient: Send + Sync {
    /// Submit a blob for dispersal.
    async fn disperse_blob(
        &self,
        data: Bytes,
        custom_quorums: &[u8],
    ) -> Result<(BlobStatus, Bytes), DisperserError>;

    /// Submit a blob, authenticating the account that pays for it.
    async fn disperse_blob_authenticated(
        &self,
        data: Bytes,
        custom_quorums: &[u8],
    ) -> Result<(BlobStatus, Bytes), DisperserError>;

    /// Submit a blob paid from the account's reservation or balance.
    async fn disperse_paid_blob(
        &self,
        data: Bytes,
        quorums: &[u8],
    ) -> Result<(BlobStatus, Bytes), DisperserError>;

    /// Poll the status of a dispersal request.
    async fn get_blob_status(&self, request_id: &[u8]) -> Result<BlobStatusReply, DisperserError>;

    /// Fetch blob bytes back from the network.
    async fn retrieve_blob(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
    ) -> Result<Bytes, DisperserError>;

    /// Release the client's resources.
    async fn close(&self) -> Result<(), DisperserError>;
}
