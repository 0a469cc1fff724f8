//! Ordered chain of metadata backends.
//!
//! Reads walk the chain in priority order and stop at the first hit.
//! Backfills visit every backend independently and only write where the key
//! is still absent.

use super::backend::{BackendError, MetadataBackend};
use super::fs::FsBackend;
use super::memory::MemoryBackend;
use crate::config::{BackendConfig, CacheConfig};
use crate::error::{Error, Result};
use crate::extra::ExtraKey;
use bytes::Bytes;
use futures::future::join_all;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default per-call backend timeout.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of backfilling a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// The record was absent and has been written.
    Written,
    /// The backend already held a value; nothing was written.
    AlreadyPresent,
    /// The write failed.
    Failed(String),
    /// The caller cancelled before the backend finished.
    Cancelled,
}

/// Per-backend results of one backfill.
#[derive(Debug, Clone, Default)]
pub struct BackfillReport {
    entries: Vec<(String, BackfillOutcome)>,
}

impl BackfillReport {
    /// Number of backends written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, BackfillOutcome::Written))
    }

    /// Number of backends skipped because they already held a value.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BackfillOutcome::AlreadyPresent))
    }

    /// Number of backends whose write failed or was cancelled.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BackfillOutcome::Failed(_) | BackfillOutcome::Cancelled))
    }

    /// Outcome for the backend with the given name.
    #[must_use]
    pub fn outcome(&self, backend: &str) -> Option<&BackfillOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == backend)
            .map(|(_, outcome)| outcome)
    }

    /// Iterate over `(backend name, outcome)` pairs in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackfillOutcome)> {
        self.entries.iter().map(|(name, o)| (name.as_str(), o))
    }

    /// True if the chain had no backends.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, pred: impl Fn(&BackfillOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Statistics about chain operations.
#[derive(Debug, Default, Clone)]
pub struct ChainStats {
    /// Lookups answered by some backend.
    pub hits: u64,
    /// Lookups no backend could answer.
    pub misses: u64,
    /// Backend calls that failed or timed out.
    pub backend_failures: u64,
    /// Records written during backfill.
    pub backfill_writes: u64,
    /// Backfill writes skipped because the backend already held a value.
    pub backfill_skips: u64,
}

impl ChainStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

enum CallError {
    Cancelled,
    Backend(BackendError),
}

/// An ordered list of metadata backends.
pub struct MetadataChain {
    backends: Vec<Arc<dyn MetadataBackend>>,
    timeout: Duration,
    stats: RwLock<ChainStats>,
}

impl MetadataChain {
    /// Create an empty chain with the given per-call timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            backends: Vec::new(),
            timeout,
            stats: RwLock::new(ChainStats::default()),
        }
    }

    /// Build a chain from configuration, preserving backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a backend cannot
    /// be opened.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let mut chain = Self::new(Duration::from_millis(config.backend_timeout_ms));
        for backend in &config.backends {
            chain = match backend {
                BackendConfig::Memory { capacity } => {
                    chain.with_backend(MemoryBackend::with_capacity(*capacity))
                }
                BackendConfig::Filesystem { root_dir } => {
                    chain.with_backend(FsBackend::open(root_dir)?)
                }
            };
        }
        info!(
            "Metadata chain initialized (backends=[{}], timeout={:?})",
            chain.backend_names().join(", "),
            chain.timeout
        );
        Ok(chain)
    }

    /// Append a backend at the lowest priority.
    #[must_use]
    pub fn with_backend<B: MetadataBackend + 'static>(self, backend: B) -> Self {
        self.with_backend_arc(Arc::new(backend))
    }

    /// Append a shared backend at the lowest priority.
    #[must_use]
    pub fn with_backend_arc(mut self, backend: Arc<dyn MetadataBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Number of backends in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// True if the chain has no backends.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Backend names in priority order.
    #[must_use]
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Get current statistics.
    #[must_use]
    pub fn stats(&self) -> ChainStats {
        self.stats.read().clone()
    }

    /// Reset statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = ChainStats::default();
    }

    /// Look up the record stored under `key`.
    ///
    /// Backends are queried one at a time in priority order; the first one
    /// holding a non-empty value answers. Misses and transport failures fall
    /// through to the next backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoExtraInfo`] if no backend holds the key, or
    /// [`Error::Cancelled`] if `cancel` fires first.
    pub async fn resolve(&self, key: &ExtraKey, cancel: &CancellationToken) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        for backend in &self.backends {
            match self.call(cancel, backend.get(key.as_bytes())).await {
                Ok(Some(value)) if !value.is_empty() => {
                    debug!("Extra info {} found in {}", key, backend.name());
                    self.stats.write().hits += 1;
                    return Ok(value);
                }
                Ok(_) => {
                    debug!("Extra info {} not in {}", key, backend.name());
                }
                Err(CallError::Cancelled) => return Err(Error::Cancelled),
                Err(CallError::Backend(e)) => {
                    warn!("Failed to get extra info {} from {}: {e}", key, backend.name());
                    self.stats.write().backend_failures += 1;
                }
            }
        }

        debug!("Extra info {} not found in any backend", key);
        self.stats.write().misses += 1;
        Err(Error::NoExtraInfo {
            key: key.to_string(),
        })
    }

    /// Warm every backend that does not yet hold `key`.
    ///
    /// Each backend is checked and written independently of the others, so a
    /// slow or failing backend never holds up the rest. Existing values are
    /// never overwritten. Failures are logged and reported, never returned.
    pub async fn observe(
        &self,
        key: &ExtraKey,
        value: Bytes,
        cancel: &CancellationToken,
    ) -> BackfillReport {
        let outcomes = join_all(
            self.backends
                .iter()
                .map(|backend| self.backfill_one(backend.as_ref(), key, value.clone(), cancel)),
        )
        .await;

        BackfillReport {
            entries: self
                .backends
                .iter()
                .map(|b| b.name().to_string())
                .zip(outcomes)
                .collect(),
        }
    }

    async fn backfill_one(
        &self,
        backend: &dyn MetadataBackend,
        key: &ExtraKey,
        value: Bytes,
        cancel: &CancellationToken,
    ) -> BackfillOutcome {
        match self.call(cancel, backend.get(key.as_bytes())).await {
            Ok(Some(existing)) if !existing.is_empty() => {
                debug!("Extra info {} already in {}", key, backend.name());
                self.stats.write().backfill_skips += 1;
                return BackfillOutcome::AlreadyPresent;
            }
            Ok(_) => {}
            Err(CallError::Cancelled) => return BackfillOutcome::Cancelled,
            // The write is idempotent, so a failed presence check still tries it.
            Err(CallError::Backend(e)) => {
                warn!("Presence check for {} in {} failed: {e}", key, backend.name());
                self.stats.write().backend_failures += 1;
            }
        }

        match self.call(cancel, backend.put(key.as_bytes(), value)).await {
            Ok(()) => {
                info!("Put extra info {} to {}", key, backend.name());
                self.stats.write().backfill_writes += 1;
                BackfillOutcome::Written
            }
            Err(CallError::Cancelled) => BackfillOutcome::Cancelled,
            Err(CallError::Backend(e)) => {
                warn!("Failed to put extra info {} to {}: {e}", key, backend.name());
                self.stats.write().backend_failures += 1;
                BackfillOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run one backend call under the chain timeout and the caller's token.
    async fn call<T, F>(&self, cancel: &CancellationToken, fut: F) -> std::result::Result<T, CallError>
    where
        F: Future<Output = std::result::Result<T, BackendError>>,
    {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(CallError::Cancelled),
            result = tokio::time::timeout(self.timeout, fut) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(CallError::Backend(e)),
                Err(_) => Err(CallError::Backend(BackendError::Timeout(self.timeout))),
            },
        }
    }
}

impl Default for MetadataChain {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_TIMEOUT)
    }
}
