//! Retrieval entry point: commitment in, extra info out.
//!
//! An HTTP layer hands over the commitment exactly as a client sent it
//! (hex, optionally `0x`-prefixed, carrying a commitment-mode prefix). This
//! module strips the framing, decodes the certificate, and asks an
//! [`ExtraInfoSource`] for the record. Framing the answer as a response is
//! left to the caller; [`Error::is_client_error`] tells it which failures
//! were the client's fault.

use crate::cache::MetadataChain;
use crate::cert::Certificate;
use crate::disperser::{DisperserClient, InterceptingClient};
use crate::error::{Error, Result};
use crate::extra::ExtraKey;
use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Commitment type byte for keccak-keyed Optimism commitments.
const OP_KECCAK_COMMITMENT_BYTE: u8 = 0x00;
/// Commitment type byte for generic Optimism commitments.
const OP_GENERIC_COMMITMENT_BYTE: u8 = 0x01;
/// DA layer byte identifying EigenDA inside a generic commitment.
const EIGENDA_LAYER_BYTE: u8 = 0x00;
/// Certificate version byte.
const CERT_V0: u8 = 0x00;

/// Anything that can answer extra-info lookups for a blob position.
#[async_trait]
pub trait ExtraInfoSource: Send + Sync {
    /// Fetch the record cached for `(batch_header_hash, blob_index)`.
    async fn resolve_extra(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
        cancel: &CancellationToken,
    ) -> Result<Bytes>;
}

#[async_trait]
impl ExtraInfoSource for MetadataChain {
    async fn resolve_extra(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        let key = ExtraKey::derive(batch_header_hash, blob_index);
        self.resolve(&key, cancel).await
    }
}

#[async_trait]
impl<C: DisperserClient> ExtraInfoSource for InterceptingClient<C> {
    async fn resolve_extra(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        InterceptingClient::resolve_extra(self, batch_header_hash, blob_index, cancel).await
    }
}

/// How a commitment is framed in front of the certificate bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitmentMode {
    /// `[version] ++ cert`.
    #[default]
    Simple,
    /// `[0x01, da_layer, version] ++ cert`.
    OptimismGeneric,
    /// `[0x00] ++ keccak(payload)`; not backed by a certificate.
    OptimismKeccak,
}

/// Strip the commitment framing and decode the certificate.
///
/// # Errors
///
/// Returns a client error if the prefix does not match `mode`, the mode does
/// not carry a certificate, or the certificate fails to decode.
pub fn decode_commitment(raw: &[u8], mode: CommitmentMode) -> Result<Certificate> {
    let cert_bytes = match mode {
        CommitmentMode::Simple => strip_prefix(raw, &[CERT_V0])?,
        CommitmentMode::OptimismGeneric => {
            strip_prefix(raw, &[OP_GENERIC_COMMITMENT_BYTE, EIGENDA_LAYER_BYTE, CERT_V0])?
        }
        CommitmentMode::OptimismKeccak => {
            // Only reject frames that really are keccak commitments.
            strip_prefix(raw, &[OP_KECCAK_COMMITMENT_BYTE])?;
            return Err(Error::UnsupportedCommitmentMode);
        }
    };
    Ok(Certificate::from_bytes(cert_bytes)?)
}

fn strip_prefix<'a>(raw: &'a [u8], prefix: &[u8]) -> Result<&'a [u8]> {
    raw.strip_prefix(prefix).ok_or_else(|| {
        Error::InvalidCommitment(format!(
            "expected prefix 0x{}, got 0x{}",
            hex::encode(prefix),
            hex::encode(&raw[..raw.len().min(prefix.len())])
        ))
    })
}

/// Decode a hex-encoded commitment, with or without a `0x` prefix.
///
/// # Errors
///
/// Returns a client error if the input is not hex or does not decode.
pub fn decode_commitment_hex(commitment_hex: &str, mode: CommitmentMode) -> Result<Certificate> {
    let trimmed = commitment_hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let raw = hex::decode(digits)
        .map_err(|e| Error::InvalidCommitment(format!("failed to decode commitment hex: {e}")))?;
    decode_commitment(&raw, mode)
}

/// Resolve the extra info for a hex-encoded commitment.
///
/// # Errors
///
/// Returns a client error for malformed input, [`Error::NoExtraInfo`] when
/// nothing is cached, or [`Error::Cancelled`] if `cancel` fires first.
pub async fn get_extra<S: ExtraInfoSource + ?Sized>(
    source: &S,
    commitment_hex: &str,
    mode: CommitmentMode,
    cancel: &CancellationToken,
) -> Result<Bytes> {
    let cert = decode_commitment_hex(commitment_hex, mode)?;
    debug!(
        "Resolving extra info for batch 0x{} index {}",
        hex::encode(&cert.batch_header_hash),
        cert.blob_index
    );
    source
        .resolve_extra(&cert.batch_header_hash, cert.blob_index, cancel)
        .await
}
