//! Error types for da-extra-cache.

use crate::cache::BackendError;
use crate::cert::CodecError;
use crate::disperser::DisperserError;
use thiserror::Error;

/// Result type for da-extra-cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for da-extra-cache.
#[derive(Debug, Error)]
pub enum Error {
    /// Certificate bytes failed to encode or decode.
    #[error("certificate codec error: {0}")]
    Codec(#[from] CodecError),

    /// A status reply carried a proof with a required sub-message missing.
    #[error("blob info is missing {0}")]
    MissingProofField(&'static str),

    /// Commitment input was not valid hex or carried an unexpected prefix.
    #[error("invalid commitment: {0}")]
    InvalidCommitment(String),

    /// The commitment mode does not address an EigenDA certificate.
    #[error("only eigenda backend is supported")]
    UnsupportedCommitmentMode,

    /// No backend in the chain holds a record for this key.
    #[error("no extra info available for {key}")]
    NoExtraInfo {
        /// The correlation key that missed.
        key: String,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The metadata record could not be serialized.
    #[error("metadata record error: {0}")]
    Record(#[from] serde_json::Error),

    /// The wrapped dispersal client failed.
    #[error("disperser error: {0}")]
    Disperser(#[from] DisperserError),

    /// A cache backend failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if the error was caused by malformed caller input.
    ///
    /// Such errors are terminal and should be surfaced as a bad request,
    /// never retried.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Codec(_) | Self::InvalidCommitment(_) | Self::UnsupportedCommitmentMode
        )
    }

    /// Returns true if the error is the normal cold-cache outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoExtraInfo { .. })
    }
}
