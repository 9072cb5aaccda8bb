//! The stage interface connecting pipeline components.

use async_trait::async_trait;
use rpz_core::Result;

/// A pipeline stage that consumes domains one at a time.
///
/// `accept` returns only after the domain has been fully processed by the
/// stage and everything downstream of it; this direct-call handoff is the
/// backpressure contract of the pipeline. `close` tears the stage down,
/// flushing any buffered work into the next stage before closing it in turn.
#[async_trait]
pub trait DomainSink: Send {
    /// Feed one domain into the stage.
    async fn accept(&mut self, domain: &str) -> Result<()>;

    /// Flush buffered work and tear the stage down, cascading downstream.
    async fn close(&mut self) -> Result<()>;
}
