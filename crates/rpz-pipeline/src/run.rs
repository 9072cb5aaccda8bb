//! Pipeline orchestration: concurrent downloads, the two-pass wildcard
//! pre-pass, and the main extraction run.

use chrono::Local;
use rpz_core::{Output, Result, RpzError, Source, SourceCategory};
use rpz_fetch::LineFetcher;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::db::DomainDb;
use crate::extract::DomainExtractor;
use crate::fanout::{HashingFanout, OutputLane};
use crate::format::RpzFormatter;
use crate::sink::DomainSink;
use crate::unique::UniqueFilter;
use crate::wildcard::{reduce, BatchedWildcardFilter, CoverageMode, WildcardCollector};
use crate::writer::ZoneWriter;
use crate::zone;

/// Lines buffered per in-flight download before its producer task blocks.
const CHANNEL_CAPACITY: usize = 1024;

/// Everything one run needs beyond the fetcher.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Configured (URL, format) sources
    pub sources: Vec<Source>,
    /// Configured (destination, policy) outputs
    pub outputs: Vec<Output>,
    /// Primary name server for the SOA record
    pub name_server: String,
    /// Hostmaster email address for the SOA record
    pub email: String,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Wildcard bases surviving the two-pass reduction
    pub wildcards: usize,
    /// Domains accepted into the rule section (wildcard entries included)
    pub accepted: u64,
    /// Final content digest over the accepted sequence
    pub digest: String,
    /// Per-destination publish decision (true = replaced)
    pub published: Vec<(PathBuf, bool)>,
}

/// Build and publish every configured zone file.
///
/// Sources are downloaded concurrently but consumed strictly in configured
/// order — wildcard-category sources first (the pre-pass), then the rest —
/// so the accepted sequence and its digest are reproducible across runs.
/// Any fetch failure aborts the whole run before anything is published.
pub async fn run(fetcher: &LineFetcher, config: &PipelineConfig) -> Result<RunReport> {
    let (wildcard_sources, plain_sources): (Vec<Source>, Vec<Source>) = config
        .sources
        .iter()
        .cloned()
        .partition(|s| s.category() == SourceCategory::Wildcard);

    // Pre-pass: resolve covering relationships among the wildcard sources
    // before they can suppress anything else.
    let d2 = wildcard_prepass(fetcher, &wildcard_sources).await?;
    let d2 = Arc::new(d2);

    // Header source numbering follows processing order.
    let mut ordered = wildcard_sources.clone();
    ordered.extend(plain_sources.iter().cloned());
    let header = zone::header_lines(&ordered, &config.name_server, &config.email, Local::now());

    let mut lanes = Vec::with_capacity(config.outputs.len());
    for output in &config.outputs {
        lanes.push(OutputLane {
            formatter: RpzFormatter::new(output.action),
            writer: ZoneWriter::create(&output.destination, &header)?,
        });
    }

    // Wildcard bases enter the artifact directly, ahead of any literal
    // domain, carrying their `*.` marker.
    let mut fanout = HashingFanout::new(lanes);
    for base in d2.iter() {
        fanout.accept(&format!("*.{base}")).await?;
    }

    let unique = UniqueFilter::new(fanout);
    let mut pipeline =
        BatchedWildcardFilter::new(Arc::clone(&d2), CoverageMode::IncludeSelf, unique);

    consume_sources(fetcher, &plain_sources, &mut pipeline).await?;
    pipeline.close().await?;

    let fanout = pipeline.into_inner().into_inner();
    Ok(RunReport {
        wildcards: d2.len(),
        accepted: fanout.accepted(),
        digest: fanout.digest().unwrap_or_default().to_string(),
        published: fanout.published().to_vec(),
    })
}

/// Two-pass wildcard collection.
///
/// Pass 1 streams every wildcard-category source through a growing
/// collector; pass 2 re-walks the collected set against itself to drop any
/// entry covered by a broader cousin that arrived later.
pub async fn wildcard_prepass(
    fetcher: &LineFetcher,
    sources: &[Source],
) -> Result<DomainDb> {
    if sources.is_empty() {
        return Ok(DomainDb::new());
    }

    let mut collector = WildcardCollector::new();
    let downloads = spawn_downloads(fetcher, sources);
    for (source, mut rx) in downloads {
        let mut extractor = DomainExtractor::new(&source);
        while let Some(item) = rx.recv().await {
            if let Some(domain) = extractor.extract(&item?) {
                collector.accept(&domain);
            }
        }
        extractor.finish();
    }

    Ok(reduce(&collector.finish()))
}

/// Stream every source, in configured order, into `sink`.
async fn consume_sources<S: DomainSink>(
    fetcher: &LineFetcher,
    sources: &[Source],
    sink: &mut S,
) -> Result<()> {
    let downloads = spawn_downloads(fetcher, sources);
    for (source, mut rx) in downloads {
        let mut extractor = DomainExtractor::new(&source);
        while let Some(item) = rx.recv().await {
            if let Some(domain) = extractor.extract(&item?) {
                sink.accept(&domain).await?;
            }
        }
        extractor.finish();
    }
    Ok(())
}

/// Start one download task per source.
///
/// Every task streams its body into a bounded channel, so all transfers make
/// progress concurrently while no source buffers more than the channel
/// capacity ahead of the consumer. A failed fetch surfaces as an `Err` line
/// and terminates the task; consumers treat it as fatal to the run.
fn spawn_downloads(
    fetcher: &LineFetcher,
    sources: &[Source],
) -> Vec<(Source, mpsc::Receiver<Result<String>>)> {
    sources
        .iter()
        .map(|source| {
            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            let fetcher = fetcher.clone();
            let task_source = source.clone();
            tokio::spawn(async move {
                download_into(&fetcher, &task_source, tx).await;
            });
            (source.clone(), rx)
        })
        .collect()
}

async fn download_into(
    fetcher: &LineFetcher,
    source: &Source,
    tx: mpsc::Sender<Result<String>>,
) {
    debug!(url = %source.url, format = %source.format, "processing source");
    let mut stream = match fetcher.fetch(&source.url).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = tx.send(Err(fetch_error(source, &e))).await;
            return;
        }
    };
    loop {
        match stream.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Ok(line)).await.is_err() {
                    // Consumer is gone; the run is aborting.
                    return;
                }
            }
            Ok(None) => {
                debug!(url = %source.url, "done processing source");
                return;
            }
            Err(e) => {
                let _ = tx.send(Err(fetch_error(source, &e))).await;
                return;
            }
        }
    }
}

fn fetch_error(source: &Source, cause: &RpzError) -> RpzError {
    warn!(
        url = %source.url,
        format = %source.format,
        error = %cause,
        "cannot process source"
    );
    RpzError::Fetch {
        url: source.url.clone(),
        format: source.format.to_string(),
        reason: cause.to_string(),
    }
}
