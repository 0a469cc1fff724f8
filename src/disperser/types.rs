//! Status reply messages returned by the DA network's disperser.
//!
//! These mirror the disperser's protobuf messages: nested sub-messages are
//! optional on the wire, so every one of them is an `Option` here and is
//! checked explicitly when a [`Certificate`] is extracted.

use crate::cert::{Certificate, G1Commitment};
use crate::error::{Error, Result};
use bytes::Bytes;

/// Lifecycle state of a dispersal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlobStatus {
    /// Status not known to the disperser.
    #[default]
    Unknown,
    /// Blob accepted and being processed.
    Processing,
    /// Blob confirmed on chain.
    Confirmed,
    /// Dispersal failed.
    Failed,
    /// Confirmation block finalized.
    Finalized,
    /// Not enough quorum signatures were gathered.
    InsufficientSignatures,
    /// Blob is being dispersed to operators.
    Dispersing,
}

impl BlobStatus {
    /// Map a wire status code, treating unrecognised codes as `Unknown`.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Processing,
            2 => Self::Confirmed,
            3 => Self::Failed,
            4 => Self::Finalized,
            5 => Self::InsufficientSignatures,
            6 => Self::Dispersing,
            _ => Self::Unknown,
        }
    }

    /// The wire status code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Processing => 1,
            Self::Confirmed => 2,
            Self::Failed => 3,
            Self::Finalized => 4,
            Self::InsufficientSignatures => 5,
            Self::Dispersing => 6,
        }
    }

    /// Returns true once the blob is confirmed or finalized.
    ///
    /// Only replies in these states carry a usable certificate.
    #[must_use]
    pub fn is_terminal_success(self) -> bool {
        matches!(self, Self::Confirmed | Self::Finalized)
    }
}

/// Reply to a status poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobStatusReply {
    /// Current status of the request.
    pub status: BlobStatus,
    /// Blob location and proof; populated once confirmed.
    pub info: Option<BlobInfo>,
}

/// Header and inclusion proof of a confirmed blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobInfo {
    /// Commitment and quorum parameters.
    pub blob_header: Option<BlobHeader>,
    /// Where the blob landed and how to prove it.
    pub blob_verification_proof: Option<BlobVerificationProof>,
}

/// Blob header as signed by the disperser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobHeader {
    /// Commitment to the blob polynomial.
    pub commitment: Option<G1Commitment>,
    /// Length of the blob in field elements.
    pub data_length: u32,
    /// Per-quorum security parameters, in attestation order.
    pub blob_quorum_params: Vec<BlobQuorumParam>,
}

/// Security parameters for one quorum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobQuorumParam {
    /// Quorum identifier.
    pub quorum_number: u32,
    /// Adversary threshold, in percent.
    pub adversary_threshold_percentage: u32,
    /// Confirmation threshold, in percent.
    pub confirmation_threshold_percentage: u32,
    /// Chunk length assigned to the quorum.
    pub chunk_length: u32,
}

/// Proof that a blob is included in a confirmed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobVerificationProof {
    /// On-chain batch identifier.
    pub batch_id: u32,
    /// Position of the blob within the batch.
    pub blob_index: u32,
    /// Batch the blob belongs to.
    pub batch_metadata: Option<BatchMetadata>,
    /// Merkle inclusion proof.
    pub inclusion_proof: Bytes,
    /// Index of each quorum in the batch's quorum list.
    pub quorum_indexes: Bytes,
}

/// Metadata of a confirmed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMetadata {
    /// The batch header.
    pub batch_header: Option<BatchHeader>,
    /// Hash of the non-signer record.
    pub signatory_record_hash: Bytes,
    /// Fee paid for the batch.
    pub fee: Bytes,
    /// Block the batch was confirmed in.
    pub confirmation_block_number: u32,
    /// Hash of the batch header.
    pub batch_header_hash: Bytes,
}

/// Header of a batch of blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchHeader {
    /// Merkle root of the blob headers.
    pub batch_root: Bytes,
    /// Quorums covered by the batch.
    pub quorum_numbers: Bytes,
    /// Signed stake percentage per quorum.
    pub quorum_signed_percentages: Bytes,
    /// Chain height the operator set was taken at.
    pub reference_block_number: u32,
}

impl TryFrom<&BlobInfo> for Certificate {
    type Error = Error;

    fn try_from(info: &BlobInfo) -> Result<Self> {
        let header = info
            .blob_header
            .as_ref()
            .ok_or(Error::MissingProofField("blob_header"))?;
        let commitment = header
            .commitment
            .as_ref()
            .ok_or(Error::MissingProofField("blob_header.commitment"))?;
        let proof = info
            .blob_verification_proof
            .as_ref()
            .ok_or(Error::MissingProofField("blob_verification_proof"))?;
        let metadata = proof
            .batch_metadata
            .as_ref()
            .ok_or(Error::MissingProofField("batch_metadata"))?;
        let batch_header = metadata
            .batch_header
            .as_ref()
            .ok_or(Error::MissingProofField("batch_metadata.batch_header"))?;

        let cert = Self {
            batch_header_hash: metadata.batch_header_hash.clone(),
            blob_index: proof.blob_index,
            reference_block_number: batch_header.reference_block_number,
            quorum_ids: header
                .blob_quorum_params
                .iter()
                .map(|p| p.quorum_number)
                .collect(),
            blob_commitment: commitment.clone(),
        };

        cert.validate()?;
        Ok(cert)
    }
}
