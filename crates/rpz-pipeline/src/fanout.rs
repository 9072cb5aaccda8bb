//! Content hashing and fan-out to the configured output lanes.

use async_trait::async_trait;
use md5::{Digest, Md5};
use rpz_core::Result;
use std::path::PathBuf;
use tracing::info;

use crate::format::RpzFormatter;
use crate::sink::DomainSink;
use crate::writer::ZoneWriter;

/// One (formatter, writer) pair receiving every accepted domain.
pub struct OutputLane {
    /// Policy-bound rule renderer for this destination
    pub formatter: RpzFormatter,
    /// Destination writer
    pub writer: ZoneWriter,
}

/// Terminal stage: hashes the accepted-domain sequence and fans every domain
/// out to all output lanes.
///
/// The digest is an order-sensitive MD5 over the UTF-8 bytes of exactly the
/// domain sequence written, so re-running with unchanged inputs reproduces
/// an identical digest and triggers no file replacement. At close, each lane
/// receives the digest trailer and runs its publish decision.
pub struct HashingFanout {
    hash: Md5,
    lanes: Vec<OutputLane>,
    accepted: u64,
    digest: Option<String>,
    published: Vec<(PathBuf, bool)>,
}

impl HashingFanout {
    /// Build the terminal stage over the configured lanes.
    #[must_use]
    pub fn new(lanes: Vec<OutputLane>) -> Self {
        Self {
            hash: Md5::new(),
            lanes,
            accepted: 0,
            digest: None,
            published: Vec::new(),
        }
    }

    /// Number of domains accepted into the rule section.
    #[must_use]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Final content digest; `Some` once the stage has been closed.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Per-destination publish decisions recorded at close.
    #[must_use]
    pub fn published(&self) -> &[(PathBuf, bool)] {
        &self.published
    }
}

#[async_trait]
impl DomainSink for HashingFanout {
    async fn accept(&mut self, domain: &str) -> Result<()> {
        self.hash.update(domain.as_bytes());
        self.accepted += 1;
        for lane in &mut self.lanes {
            let rule = lane.formatter.format_entry(domain);
            lane.writer.write_line(&rule)?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let digest = hex::encode(std::mem::replace(&mut self.hash, Md5::new()).finalize());
        info!(accepted = self.accepted, digest = %digest, "rule section complete");

        for lane in std::mem::take(&mut self.lanes) {
            let destination = lane.writer.destination().to_path_buf();
            let replaced = lane.writer.finish(&digest)?;
            self.published.push((destination, replaced));
        }
        self.digest = Some(digest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md5::{Digest, Md5};
    use rpz_core::PolicyAction;
    use tempfile::tempdir;

    fn lane(dir: &std::path::Path, name: &str, action: PolicyAction) -> OutputLane {
        let dest = dir.join(name);
        OutputLane {
            formatter: RpzFormatter::new(action),
            writer: ZoneWriter::create(&dest, &[String::from("; header")]).unwrap(),
        }
    }

    #[tokio::test]
    async fn hashes_the_exact_accepted_sequence() {
        let dir = tempdir().unwrap();
        let mut fanout = HashingFanout::new(vec![lane(
            dir.path(),
            "a.rpz",
            PolicyAction::Nxdomain,
        )]);

        fanout.accept("ads.example.com").await.unwrap();
        fanout.accept("tracker.example.net").await.unwrap();
        fanout.close().await.unwrap();

        let mut expected = Md5::new();
        expected.update(b"ads.example.com");
        expected.update(b"tracker.example.net");
        assert_eq!(fanout.digest().unwrap(), hex::encode(expected.finalize()));
        assert_eq!(fanout.accepted(), 2);
    }

    #[tokio::test]
    async fn every_lane_receives_every_domain_in_its_own_form() {
        let dir = tempdir().unwrap();
        let mut fanout = HashingFanout::new(vec![
            lane(dir.path(), "nx.rpz", PolicyAction::Nxdomain),
            lane(dir.path(), "null.rpz", PolicyAction::NullRoute),
        ]);

        fanout.accept("ads.example.com").await.unwrap();
        fanout.close().await.unwrap();

        let nx = std::fs::read_to_string(dir.path().join("nx.rpz")).unwrap();
        let null = std::fs::read_to_string(dir.path().join("null.rpz")).unwrap();
        assert!(nx.contains("ads.example.com CNAME ."));
        assert!(null.contains("ads.example.com A 0.0.0.0"));

        // Both destinations share one digest over the same sequence.
        let nx_digest = nx.lines().last().unwrap().to_string();
        let null_digest = null.lines().last().unwrap().to_string();
        assert_eq!(nx_digest, null_digest);
        assert_eq!(fanout.published().len(), 2);
        assert!(fanout.published().iter().all(|(_, replaced)| *replaced));
    }

    #[tokio::test]
    async fn trailer_is_separated_by_a_blank_line() {
        let dir = tempdir().unwrap();
        let mut fanout = HashingFanout::new(vec![lane(
            dir.path(),
            "a.rpz",
            PolicyAction::Nxdomain,
        )]);
        fanout.accept("ads.example.com").await.unwrap();
        fanout.close().await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("a.rpz")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[lines.len() - 2], "");
        assert!(lines[lines.len() - 1].starts_with("; md5sum: "));
    }
}
