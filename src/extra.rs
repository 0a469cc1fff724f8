//! Correlation keys and the metadata records stored under them.
//!
//! A key names a blob's *position* in the DA network, so two certificates
//! for the same `(batch_header_hash, blob_index)` always share a record no
//! matter how their other fields differ.

use crate::cert::Certificate;
use serde::{Deserialize, Serialize};
use std::fmt;

const KEY_PREFIX: &str = "extra-info";
const KEY_DELIMITER: char = '_';

/// Deterministic cache key derived from a blob's batch hash and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtraKey(String);

impl ExtraKey {
    /// Derive the key for a blob position.
    ///
    /// The format is `extra-info_<lowercase hex hash>_<decimal index>`.
    #[must_use]
    pub fn derive(batch_header_hash: &[u8], blob_index: u32) -> Self {
        Self(format!(
            "{KEY_PREFIX}{KEY_DELIMITER}{}{KEY_DELIMITER}{blob_index}",
            hex::encode(batch_header_hash)
        ))
    }

    /// Derive the key for the blob a certificate points at.
    #[must_use]
    pub fn for_certificate(cert: &Certificate) -> Self {
        Self::derive(&cert.batch_header_hash, cert.blob_index)
    }

    /// The raw key bytes handed to backends.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtraKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for ExtraKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Out-of-band metadata cached for a dispersed blob.
///
/// The record is a pure function of its key. Concurrent backfills of the
/// same key therefore always write identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraInfo {
    /// Lowercase hex of the correlation key bytes.
    pub request_id: String,
}

impl ExtraInfo {
    /// Build the record stored under `key`.
    #[must_use]
    pub fn for_key(key: &ExtraKey) -> Self {
        Self {
            request_id: hex::encode(key.as_bytes()),
        }
    }

    /// Serialize the record as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parse a record previously produced by [`ExtraInfo::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON record.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
