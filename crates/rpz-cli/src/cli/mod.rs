//! CLI argument parsing and run dispatch.

pub mod args;

use anyhow::{bail, Context, Result};
use args::Cli;
use clap::Parser;
use rpz_core::{Output, Source};
use rpz_fetch::LineFetcher;
use rpz_pipeline::PipelineConfig;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let pipeline_config = build_pipeline_config(&cli, &config)?;

    let mut fetcher = LineFetcher::builder();
    if let Some(secs) = cli.timeout.or(config.timeout_secs) {
        fetcher = fetcher.timeout(Duration::from_secs(secs));
    }
    let fetcher = fetcher.build();

    let report = rpz_pipeline::run(&fetcher, &pipeline_config).await?;

    let replaced = report
        .published
        .iter()
        .filter(|(_, replaced)| *replaced)
        .count();
    info!(
        wildcards = report.wildcards,
        accepted = report.accepted,
        destinations = report.published.len(),
        replaced,
        "run complete"
    );
    Ok(())
}

/// Validate argument pairings and merge config-file defaults.
///
/// Every error raised here precedes any network activity.
fn build_pipeline_config(cli: &Cli, config: &Config) -> Result<PipelineConfig> {
    if cli.sources.len() != cli.formats.len() {
        bail!(
            "must have the same number of --source and --format arguments \
             ({} sources, {} formats)",
            cli.sources.len(),
            cli.formats.len()
        );
    }
    if !cli.policies.is_empty() && cli.policies.len() != cli.destinations.len() {
        bail!(
            "must have the same number of --destination and --policy arguments \
             ({} destinations, {} policies)",
            cli.destinations.len(),
            cli.policies.len()
        );
    }

    let name_server = cli
        .name_server
        .clone()
        .or_else(|| config.name_server.clone())
        .context("name server required: pass --name-server or set it in the config file")?;
    let email = cli
        .email
        .clone()
        .or_else(|| config.email.clone())
        .context("hostmaster email required: pass --email or set it in the config file")?;

    let sources = cli
        .sources
        .iter()
        .zip(&cli.formats)
        .map(|(source_url, tag)| {
            url::Url::parse(source_url)
                .with_context(|| format!("invalid source URL: {source_url}"))?;
            Ok(Source::new(source_url, (*tag).into()))
        })
        .collect::<Result<Vec<_>>>()?;

    let outputs = cli
        .destinations
        .iter()
        .enumerate()
        .map(|(i, dest)| {
            let action = cli
                .policies
                .get(i)
                .copied()
                .map_or(rpz_core::PolicyAction::Nxdomain, Into::into);
            Output::new(dest.clone(), action)
        })
        .collect();

    Ok(PipelineConfig {
        sources,
        outputs,
        name_server,
        email,
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
