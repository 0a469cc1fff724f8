//! DA certificate model and its canonical RLP codec.
//!
//! A certificate identifies one dispersed blob by the batch it landed in and
//! its position within that batch. The binary layout is the RLP list the DA
//! network itself emits:
//!
//! ```text
//! [ batch_header_hash, blob_index, reference_block_number, [quorum_id, ...], [x, y] ]
//! ```
//!
//! Certificates produced here are byte-identical to the ones issued by the
//! network, so they can be handed back and forth without reinterpretation.

use alloy_primitives::U256;
use alloy_rlp::{Decodable, RlpDecodable, RlpEncodable};
use bytes::Bytes;
use thiserror::Error;

/// Errors produced by the certificate codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The RLP structure was truncated, non-canonical, or of the wrong shape.
    #[error("malformed RLP: {0}")]
    Rlp(#[from] alloy_rlp::Error),

    /// Input continued past the end of the certificate list.
    #[error("{0} trailing bytes after certificate")]
    TrailingBytes(usize),

    /// The batch header hash was empty.
    #[error("batch header hash is empty")]
    EmptyBatchHeaderHash,

    /// A commitment coordinate does not fit a 256-bit integer.
    #[error("commitment coordinate {coordinate} ({len} bytes) exceeds 256 bits")]
    CoordinateTooLarge {
        /// Which coordinate overflowed (`x` or `y`).
        coordinate: &'static str,
        /// Byte length of the offending coordinate.
        len: usize,
    },
}

/// A G1 point commitment to the blob polynomial.
///
/// Both coordinates are big-endian unsigned integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct G1Commitment {
    /// X coordinate.
    pub x: Bytes,
    /// Y coordinate.
    pub y: Bytes,
}

/// A certificate locating one blob in the DA network.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct Certificate {
    /// Hash of the batch header the blob was confirmed in.
    pub batch_header_hash: Bytes,
    /// Position of the blob within the batch.
    pub blob_index: u32,
    /// Chain height the batch was anchored against.
    pub reference_block_number: u32,
    /// Quorums that attested the blob, in attestation order.
    pub quorum_ids: Vec<u32>,
    /// Commitment to the blob contents.
    pub blob_commitment: G1Commitment,
}

impl Certificate {
    /// Encode the certificate into its canonical wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate is not well-formed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        self.validate()?;
        Ok(alloy_rlp::encode(self))
    }

    /// Decode a certificate from its canonical wire form.
    ///
    /// The whole input must be consumed.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated, non-canonical, or structurally invalid
    /// input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut buf = bytes;
        let cert = <Self as Decodable>::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(CodecError::TrailingBytes(buf.len()));
        }
        cert.validate()?;
        Ok(cert)
    }

    /// Interpret the commitment coordinates as 256-bit integers.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is wider than 32 bytes.
    pub fn blob_commitment_fields(&self) -> Result<(U256, U256), CodecError> {
        let x = coordinate("x", &self.blob_commitment.x)?;
        let y = coordinate("y", &self.blob_commitment.y)?;
        Ok((x, y))
    }

    pub(crate) fn validate(&self) -> Result<(), CodecError> {
        if self.batch_header_hash.is_empty() {
            return Err(CodecError::EmptyBatchHeaderHash);
        }
        Ok(())
    }
}

fn coordinate(name: &'static str, bytes: &[u8]) -> Result<U256, CodecError> {
    U256::try_from_be_slice(bytes).ok_or(CodecError::CoordinateTooLarge {
        coordinate: name,
        len: bytes.len(),
    })
}
