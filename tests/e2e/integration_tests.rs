//! Scenario tests for status-poll backfill and commitment retrieval.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{confirmed_info, reply, TestHarness};
use bytes::Bytes;
use da_extra_cache::cache::MetadataChain;
use da_extra_cache::config::{BackendConfig, CacheConfig};
use da_extra_cache::disperser::{BlobStatus, DisperserClient};
use da_extra_cache::{get_extra, Certificate, CommitmentMode, Error, ExtraInfo};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

const KEY: &str = "extra-info_4269_420";
const RECORD: &str = r#"{"request_id":"65787472612d696e666f5f343236395f343230"}"#;

fn simple_commitment(hash: &'static [u8], index: u32) -> String {
    let cert = Certificate::try_from(&confirmed_info(hash, index)).unwrap();
    format!("0x00{}", hex::encode(cert.to_bytes().unwrap()))
}

/// A confirmed poll writes the record once per backend; a later lookup is
/// answered by the first tier without touching the second.
#[tokio::test]
async fn test_confirmed_poll_then_resolve() {
    let harness = TestHarness::setup().unwrap();
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
    );

    let status = harness.client().get_blob_status(b"req-0").await.unwrap();
    assert_eq!(status.status, BlobStatus::Confirmed);
    assert_eq!(harness.memory().puts(), 1);
    assert_eq!(harness.durable().puts(), 1);

    let stored = harness.durable().peek(KEY.as_bytes()).await.unwrap();
    assert_eq!(stored, Bytes::from_static(RECORD.as_bytes()));

    let durable_gets = harness.durable().gets();
    let record = get_extra(
        harness.client(),
        &simple_commitment(&[0x42, 0x69], 420),
        CommitmentMode::Simple,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(record, Bytes::from_static(RECORD.as_bytes()));
    assert_eq!(harness.durable().gets(), durable_gets);
    assert_eq!(
        ExtraInfo::from_bytes(&record).unwrap().request_id,
        hex::encode(KEY)
    );
}

/// Re-polling a cached blob checks presence and writes nothing new.
#[tokio::test]
async fn test_repeated_polls_write_once() {
    let harness = TestHarness::setup().unwrap();
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Finalized, Some(confirmed_info(&[0x42, 0x69], 420))),
    );

    for _ in 0..3 {
        harness.client().get_blob_status(b"req-0").await.unwrap();
    }

    assert_eq!(harness.disperser().status_calls(), 3);
    assert_eq!(harness.memory().puts(), 1);
    assert_eq!(harness.durable().puts(), 1);
    assert_eq!(harness.client().chain().stats().backfill_skips, 4);
}

/// Non-terminal and failed statuses never reach the cache.
#[tokio::test]
async fn test_non_terminal_statuses_never_cache() {
    let harness = TestHarness::setup().unwrap();
    let statuses = [
        BlobStatus::Unknown,
        BlobStatus::Processing,
        BlobStatus::Dispersing,
        BlobStatus::Failed,
        BlobStatus::InsufficientSignatures,
    ];
    for (i, status) in statuses.into_iter().enumerate() {
        let id = format!("req-{i}");
        harness.disperser().script(
            id.as_bytes(),
            reply(status, Some(confirmed_info(&[0x42, 0x69], 420))),
        );
        let polled = harness.client().get_blob_status(id.as_bytes()).await.unwrap();
        assert_eq!(polled.status, status);
    }

    assert_eq!(harness.memory().gets(), 0);
    assert_eq!(harness.durable().gets(), 0);
    assert_eq!(harness.memory().puts(), 0);
    assert_eq!(harness.durable().puts(), 0);
}

/// A confirmed reply with an unusable proof is returned untouched.
#[tokio::test]
async fn test_malformed_proof_is_isolated() {
    let harness = TestHarness::setup().unwrap();
    let mut info = confirmed_info(&[0x42, 0x69], 420);
    info.blob_verification_proof
        .as_mut()
        .unwrap()
        .batch_metadata = None;
    let scripted = reply(BlobStatus::Confirmed, Some(info));
    harness.disperser().script(b"req-0", scripted.clone());
    harness
        .disperser()
        .script(b"req-1", reply(BlobStatus::Confirmed, None));

    assert_eq!(
        harness.client().get_blob_status(b"req-0").await.unwrap(),
        scripted
    );
    assert!(harness.client().get_blob_status(b"req-1").await.is_ok());
    assert_eq!(harness.memory().puts(), 0);
    assert_eq!(harness.durable().puts(), 0);
}

/// A failing tier does not stop the other tier from being warmed, and
/// lookups fall through to it.
#[tokio::test]
async fn test_failing_tier_is_isolated() {
    let harness = TestHarness::setup().unwrap();
    harness.memory().fail_puts(true);
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
    );

    let status = harness.client().get_blob_status(b"req-0").await.unwrap();
    assert_eq!(status.status, BlobStatus::Confirmed);
    assert_eq!(harness.memory().puts(), 0);
    assert_eq!(harness.durable().puts(), 1);

    let record = harness
        .client()
        .resolve_extra(&[0x42, 0x69], 420, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(record, Bytes::from_static(RECORD.as_bytes()));
    assert!(harness.durable().gets() >= 2);
}

/// Concurrent polls for the same blob converge on one consistent record.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_polls_same_certificate() {
    let harness = TestHarness::setup().unwrap();
    for i in 0..8 {
        harness.disperser().script(
            format!("req-{i}").as_bytes(),
            reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
        );
    }

    let ids: Vec<String> = (0..8).map(|i| format!("req-{i}")).collect();
    let results = join_all(
        ids.iter()
            .map(|id| harness.client().get_blob_status(id.as_bytes())),
    )
    .await;
    assert!(results.iter().all(Result::is_ok));

    assert!(harness.memory().puts() >= 1);
    assert!(harness.durable().puts() >= 1);
    let expected = Bytes::from_static(RECORD.as_bytes());
    assert_eq!(harness.memory().peek(KEY.as_bytes()).await.unwrap(), expected);
    assert_eq!(harness.durable().peek(KEY.as_bytes()).await.unwrap(), expected);
}

/// Distinct blobs get distinct keys and records.
#[tokio::test]
async fn test_distinct_blobs_distinct_records() {
    let harness = TestHarness::setup().unwrap();
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
    );
    harness.disperser().script(
        b"req-1",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 421))),
    );
    harness.client().get_blob_status(b"req-0").await.unwrap();
    harness.client().get_blob_status(b"req-1").await.unwrap();

    let cancel = CancellationToken::new();
    let a = harness.client().resolve_extra(&[0x42, 0x69], 420, &cancel).await.unwrap();
    let b = harness.client().resolve_extra(&[0x42, 0x69], 421, &cancel).await.unwrap();
    assert_ne!(a, b);
    assert_eq!(
        ExtraInfo::from_bytes(&b).unwrap().request_id,
        hex::encode("extra-info_4269_421")
    );
}

/// Op-generic framing resolves the same record; keccak framing is refused.
#[tokio::test]
async fn test_retrieval_commitment_modes() {
    let harness = TestHarness::setup().unwrap();
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
    );
    harness.client().get_blob_status(b"req-0").await.unwrap();

    let cert = Certificate::try_from(&confirmed_info(&[0x42, 0x69], 420)).unwrap();
    let generic = format!("010000{}", hex::encode(cert.to_bytes().unwrap()));
    let cancel = CancellationToken::new();

    let record = get_extra(harness.client(), &generic, CommitmentMode::OptimismGeneric, &cancel)
        .await
        .unwrap();
    assert_eq!(record, Bytes::from_static(RECORD.as_bytes()));

    let keccak = format!("00{}", "ab".repeat(32));
    let err = get_extra(harness.client(), &keccak, CommitmentMode::OptimismKeccak, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedCommitmentMode));
}

/// Lookups for blobs never polled report not-found, not a client error.
#[tokio::test]
async fn test_unknown_blob_not_found() {
    let harness = TestHarness::setup().unwrap();
    let err = get_extra(
        harness.client(),
        &simple_commitment(&[0xde, 0xad], 7),
        CommitmentMode::Simple,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_client_error());
    assert_eq!(harness.memory().gets(), 1);
    assert_eq!(harness.durable().gets(), 1);
}

/// Records in the durable tier survive a fresh chain built from config.
#[tokio::test]
async fn test_durable_tier_survives_restart() {
    let harness = TestHarness::setup().unwrap();
    harness.disperser().script(
        b"req-0",
        reply(BlobStatus::Confirmed, Some(confirmed_info(&[0x42, 0x69], 420))),
    );
    harness.client().get_blob_status(b"req-0").await.unwrap();

    let config = CacheConfig {
        backends: vec![
            BackendConfig::Memory { capacity: 16 },
            BackendConfig::Filesystem {
                root_dir: harness.durable_root(),
            },
        ],
        backend_timeout_ms: 500,
    };
    let restarted = MetadataChain::from_config(&config).unwrap();
    let record = get_extra(
        &restarted,
        &simple_commitment(&[0x42, 0x69], 420),
        CommitmentMode::Simple,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(record, Bytes::from_static(RECORD.as_bytes()));
    assert_eq!(restarted.stats().hits, 1);
}

/// Closing the client closes the disperser; lookups still honour the
/// caller's own token.
#[tokio::test]
async fn test_close() {
    let harness = TestHarness::setup().unwrap();
    harness.client().close().await.unwrap();
    assert!(harness.disperser().is_closed());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = harness
        .client()
        .resolve_extra(&[0x42, 0x69], 420, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
