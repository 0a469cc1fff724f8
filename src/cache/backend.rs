//! Key/value backend contract used by the metadata chain.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of a backend.
///
/// A missing key is not an error; backends report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or rejected the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured timeout.
    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    /// Local I/O failure.
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key/value store participating in the metadata chain.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait MetadataBackend: Send + Sync {
    /// Short name used in logs and backfill reports.
    fn name(&self) -> &str;

    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent. An empty value is also
    /// treated as absent by the chain.
    async fn get(&self, key: &[u8]) -> Result<Option<Bytes>, BackendError>;

    /// Store `value` under `key`.
    async fn put(&self, key: &[u8], value: Bytes) -> Result<(), BackendError>;
}
