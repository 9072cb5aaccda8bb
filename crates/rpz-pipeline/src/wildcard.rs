//! Wildcard-coverage filtering.
//!
//! A domain is wildcard-covered when some suffix of its label sequence
//! exactly equals an entry already in the reference database. The walk runs
//! from most-specific to least-specific ancestor and stops at the first hit,
//! so a match at any level marks the whole domain as covered.

use async_trait::async_trait;
use rpz_core::{Result, RpzError};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::DomainDb;
use crate::sink::DomainSink;

/// How much of the incoming domain's own label sequence participates in the
/// coverage walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    /// Only proper ancestors are candidates: the leftmost label is always
    /// dropped first. Used when the incoming domain is itself a wildcard
    /// base, which must not match its own database entry.
    ProperAncestors,
    /// The full label sequence is also a candidate, since a wildcard base
    /// may exactly equal a non-wildcard literal.
    IncludeSelf,
}

/// Candidate suffixes must keep at least this many labels.
const MIN_SUFFIX_LABELS: usize = 2;

/// Walk `domain`'s ancestor chain against `db`.
///
/// Returns true at the first suffix (per `mode`) with ≥2 labels that is an
/// exact member of the database.
#[must_use]
pub fn is_covered(db: &DomainDb, domain: &str, mode: CoverageMode) -> bool {
    if db.is_empty() {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    let start = match mode {
        CoverageMode::ProperAncestors => 1,
        CoverageMode::IncludeSelf => 0,
    };
    for dropped in start..labels.len() {
        if labels.len() - dropped < MIN_SUFFIX_LABELS {
            break;
        }
        if db.contains(&labels[dropped..].join(".")) {
            return true;
        }
    }
    false
}

/// Pass-1 collector for wildcard-category sources.
///
/// The reference database and the collection target are the same structure
/// here: an incoming wildcard base is admitted when no already-collected
/// entry covers it, then appended. A single owner keeps the growing database
/// exclusive to this stage.
#[derive(Debug, Default)]
pub struct WildcardCollector {
    db: DomainDb,
    covered: u64,
    duplicates: u64,
}

impl WildcardCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one wildcard base domain.
    pub fn accept(&mut self, domain: &str) {
        if is_covered(&self.db, domain, CoverageMode::ProperAncestors) {
            self.covered += 1;
        } else if !self.db.insert(domain) {
            self.duplicates += 1;
        }
    }

    /// Tear down, reporting filter counts, and yield the collected database.
    pub fn finish(self) -> DomainDb {
        info!(
            collected = self.db.len(),
            covered = self.covered,
            duplicates = self.duplicates,
            "wildcard collection pass complete"
        );
        self.db
    }
}

/// Pass 2: re-walk every entry of `d1` against the frozen `d1`, keeping only
/// entries not covered by a broader cousin.
///
/// Arrival order in pass 1 may have admitted a narrower wildcard before its
/// broader cousin was seen; the re-walk removes those, leaving a minimal set
/// in which no entry is a proper ancestor-suffix of another.
#[must_use]
pub fn reduce(d1: &DomainDb) -> DomainDb {
    let mut d2 = DomainDb::new();
    for domain in d1.iter() {
        if is_covered(d1, domain, CoverageMode::ProperAncestors) {
            debug!(domain, "dropping wildcard covered by a broader entry");
        } else {
            d2.insert(domain);
        }
    }
    info!(
        kept = d2.len(),
        dropped = d1.len() - d2.len(),
        "wildcard reduction pass complete"
    );
    d2
}

/// Batch size evaluated by each worker.
const PER_WORKER_BATCH: usize = 333;
/// Fixed worker-pool size.
const WORKERS: usize = 3;

/// Wildcard-miss filter evaluating membership walks in concurrent batches.
///
/// Incoming domains accumulate into a fixed-size batch; full batches are
/// split across a small worker pool, each worker walking its slice against
/// the shared frozen database snapshot. Results are joined and forwarded in
/// original order, so the accepted sequence is identical to a serial walk.
/// Only valid over a frozen database.
pub struct BatchedWildcardFilter<S: DomainSink> {
    db: Arc<DomainDb>,
    mode: CoverageMode,
    next: S,
    batch: Vec<String>,
    filtered: u64,
}

impl<S: DomainSink> BatchedWildcardFilter<S> {
    /// Wrap `next` behind a filter over the frozen `db` snapshot.
    pub fn new(db: Arc<DomainDb>, mode: CoverageMode, next: S) -> Self {
        Self {
            db,
            mode,
            next,
            batch: Vec::with_capacity(WORKERS * PER_WORKER_BATCH),
            filtered: 0,
        }
    }

    /// Recover the downstream stage after `close`.
    pub fn into_inner(self) -> S {
        self.next
    }

    async fn flush(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.batch);

        // Nothing can match against an empty snapshot; skip the pool.
        if self.db.is_empty() {
            for domain in &batch {
                self.next.accept(domain).await?;
            }
            return Ok(());
        }

        let mut handles = Vec::with_capacity(WORKERS);
        for chunk in batch.chunks(PER_WORKER_BATCH) {
            let db = Arc::clone(&self.db);
            let mode = self.mode;
            let chunk = chunk.to_vec();
            handles.push(tokio::spawn(async move {
                chunk
                    .into_iter()
                    .map(|domain| {
                        let hit = is_covered(&db, &domain, mode);
                        (domain, hit)
                    })
                    .collect::<Vec<_>>()
            }));
        }

        // Joining in spawn order reassembles the original batch order.
        for handle in handles {
            let results = handle
                .await
                .map_err(|e| RpzError::Internal(format!("wildcard worker failed: {e}")))?;
            for (domain, hit) in results {
                if hit {
                    self.filtered += 1;
                } else {
                    self.next.accept(&domain).await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DomainSink> DomainSink for BatchedWildcardFilter<S> {
    async fn accept(&mut self, domain: &str) -> Result<()> {
        self.batch.push(domain.to_string());
        if self.batch.len() >= WORKERS * PER_WORKER_BATCH {
            self.flush().await?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.flush().await?;
        info!(filtered = self.filtered, "wildcard-covered domains filtered out");
        self.next.close().await
    }
}
