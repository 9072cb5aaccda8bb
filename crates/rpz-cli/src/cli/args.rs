//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use rpz_core::{PolicyAction, SourceFormat};
use std::path::PathBuf;

/// Build DNS Response Policy Zone files from remote domain lists.
///
/// Each --source is paired positionally with a --format tag, and each
/// --destination with a --policy action. A run fetches every source,
/// collapses wildcard-covered entries, deduplicates, and atomically
/// publishes every destination whose content changed.
#[derive(Parser, Debug)]
#[command(name = "rpzgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Domain-list source URL (repeat once per source)
    #[arg(short = 's', long = "source", value_name = "URL")]
    pub sources: Vec<String>,

    /// Source format tag, one per --source, in the same order
    #[arg(short = 't', long = "format", value_enum, value_name = "TAG")]
    pub formats: Vec<FormatTag>,

    /// Destination zone file (repeat once per output)
    #[arg(short = 'd', long = "destination", value_name = "PATH", required = true)]
    pub destinations: Vec<PathBuf>,

    /// Policy action, one per --destination; defaults to nxdomain for all
    #[arg(short = 'p', long = "policy", value_enum, value_name = "ACTION")]
    pub policies: Vec<PolicyTag>,

    /// Primary name server for the SOA record
    #[arg(short = 'n', long = "name-server", value_name = "NAME", env = "RPZGEN_NAME_SERVER")]
    pub name_server: Option<String>,

    /// Hostmaster email address for the SOA record
    #[arg(short = 'e', long = "email", value_name = "ADDR", env = "RPZGEN_EMAIL")]
    pub email: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI spelling of [`SourceFormat`].
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatTag {
    /// One domain per line, `#` comments
    Domains,
    /// One domain per line, each entry a wildcard base
    WildcardDomains,
    /// Hosts-file lines of the form `0.0.0.0 <domain>`
    Hosts,
    /// RPZ zone subset, non-wildcard `CNAME .` rules only
    RpzPlain,
    /// RPZ zone subset, `*.`-prefixed `CNAME .` rules only
    RpzWildcard,
}

impl From<FormatTag> for SourceFormat {
    fn from(tag: FormatTag) -> Self {
        match tag {
            FormatTag::Domains => Self::Domains,
            FormatTag::WildcardDomains => Self::WildcardDomains,
            FormatTag::Hosts => Self::Hosts,
            FormatTag::RpzPlain => Self::RpzPlain,
            FormatTag::RpzWildcard => Self::RpzWildcard,
        }
    }
}

/// CLI spelling of [`PolicyAction`].
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PolicyTag {
    /// Answer NXDOMAIN
    Nxdomain,
    /// Answer NODATA
    Nodata,
    /// Answer the 0.0.0.0 sinkhole address
    NullRoute,
}

impl From<PolicyTag> for PolicyAction {
    fn from(tag: PolicyTag) -> Self {
        match tag {
            PolicyTag::Nxdomain => Self::Nxdomain,
            PolicyTag::Nodata => Self::Nodata,
            PolicyTag::NullRoute => Self::NullRoute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paired_sources_and_outputs() {
        let cli = Cli::try_parse_from([
            "rpzgen",
            "-s",
            "http://a.example/list.txt",
            "-t",
            "hosts",
            "-s",
            "http://b.example/wild.txt",
            "-t",
            "wildcard-domains",
            "-d",
            "blocked.rpz",
            "-p",
            "nxdomain",
            "-n",
            "ns1.example.com",
            "-e",
            "hostmaster@example.com",
        ])
        .unwrap();

        assert_eq!(cli.sources.len(), 2);
        assert_eq!(cli.formats.len(), 2);
        assert_eq!(cli.destinations.len(), 1);
        assert_eq!(cli.policies.len(), 1);
    }

    #[test]
    fn destination_is_required() {
        assert!(Cli::try_parse_from(["rpzgen", "-n", "ns", "-e", "a@b.example"]).is_err());
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(Cli::try_parse_from([
            "rpzgen",
            "-s",
            "http://a.example/x",
            "-t",
            "adblock",
            "-d",
            "out.rpz",
        ])
        .is_err());
    }
}
