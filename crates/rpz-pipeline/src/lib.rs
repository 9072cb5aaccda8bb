//! # rpz-pipeline
//!
//! The streaming extraction-and-wildcard-reduction pipeline behind rpzgen.
//!
//! Domains flow one at a time through explicit stages connected by direct
//! calls: extractor, wildcard-miss filter, unique filter, and a hashing
//! fan-out that renders every accepted domain into one or more zone files.
//! A call into [`sink::DomainSink::accept`] does not return until the item
//! has been processed by everything downstream, so a fast producer cannot
//! outrun a slow consumer.
//!
//! Wildcard-category sources are resolved first by a two-pass pre-pass
//! ([`run::wildcard_prepass`]) so that broader wildcards collected from one
//! source can suppress narrower ones from another regardless of arrival
//! order.

pub mod db;
pub mod extract;
pub mod fanout;
pub mod format;
pub mod run;
pub mod sink;
pub mod unique;
pub mod wildcard;
pub mod writer;
pub mod zone;

pub use db::DomainDb;
pub use extract::DomainExtractor;
pub use fanout::{HashingFanout, OutputLane};
pub use format::RpzFormatter;
pub use run::{run, PipelineConfig, RunReport};
pub use sink::DomainSink;
pub use unique::UniqueFilter;
pub use wildcard::{is_covered, reduce, BatchedWildcardFilter, CoverageMode, WildcardCollector};
pub use writer::ZoneWriter;
