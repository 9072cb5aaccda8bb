//! First-seen uniqueness filter.

use async_trait::async_trait;
use rpz_core::Result;
use std::collections::HashSet;
use tracing::info;

use crate::sink::DomainSink;

/// Forwards a domain the first time it is seen and silently drops
/// subsequent duplicates. The membership set is append-only; there is no
/// removal operation.
pub struct UniqueFilter<S: DomainSink> {
    seen: HashSet<String>,
    duplicates: u64,
    next: S,
}

impl<S: DomainSink> UniqueFilter<S> {
    /// Wrap `next` behind a uniqueness filter.
    pub fn new(next: S) -> Self {
        Self {
            seen: HashSet::new(),
            duplicates: 0,
            next,
        }
    }

    /// Recover the downstream stage after `close`.
    pub fn into_inner(self) -> S {
        self.next
    }
}

#[async_trait]
impl<S: DomainSink> DomainSink for UniqueFilter<S> {
    async fn accept(&mut self, domain: &str) -> Result<()> {
        if self.seen.insert(domain.to_string()) {
            self.next.accept(domain).await
        } else {
            self.duplicates += 1;
            Ok(())
        }
    }

    async fn close(&mut self) -> Result<()> {
        info!(duplicates = self.duplicates, "duplicates filtered out");
        self.next.close().await
    }
}
